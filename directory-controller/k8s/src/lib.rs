#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod lookups;
mod snapshot;

pub use self::{
    lookups::{ClusterClient, Error},
    snapshot::snapshot,
};
pub use k8s_openapi::api::{
    core::v1::{Secret, Service},
    networking::v1::Ingress,
};
pub use kube::{api::ResourceExt, Client};
