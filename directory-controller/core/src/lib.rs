#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod build;
mod directory;
pub mod keys;
mod settings;
mod snapshot;

pub use self::{
    build::{build, BuildError, ClusterLookups, DEFAULT_GROUP},
    directory::{Directory, ServiceEntry, Widget},
    settings::{InvalidLinkTarget, LinkTarget, Settings},
    snapshot::{Backend, HttpPath, HttpRule, IngressEntry, PortRef, Rule, TlsEntry},
};
