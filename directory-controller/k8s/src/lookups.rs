//! `ClusterLookups` implemented over the cluster API.

use homeport_directory_controller_core::ClusterLookups;
use k8s_openapi::api::core::v1::{Secret, Service, ServicePort};
use kube::{api::Api, Client};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] kube::Error),

    #[error("secret {namespace}/{name} has no field {key:?}")]
    SecretFieldNotFound {
        namespace: String,
        name: String,
        key: String,
    },

    #[error("service {namespace}/{service} has no port named {port:?}")]
    PortNotFound {
        namespace: String,
        service: String,
        port: String,
    },

    #[error("service {namespace}/{service} has {matches} ports named {port:?}")]
    AmbiguousPort {
        namespace: String,
        service: String,
        port: String,
        matches: usize,
    },

    #[error("service {namespace}/{service} port {port:?} is {value}, outside the u16 range")]
    InvalidPort {
        namespace: String,
        service: String,
        port: String,
        value: i32,
    },
}

/// Secret-field and named-port reads backed by `kube::Client`.
#[derive(Clone)]
pub struct ClusterClient {
    client: Client,
}

// === impl ClusterClient ===

impl std::fmt::Debug for ClusterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterClient").finish_non_exhaustive()
    }
}

impl ClusterClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ClusterLookups for ClusterClient {
    async fn secret_field(
        &self,
        namespace: &str,
        name: &str,
        key: &str,
    ) -> anyhow::Result<Vec<u8>> {
        let secret = Api::<Secret>::namespaced(self.client.clone(), namespace)
            .get(name)
            .await
            .map_err(Error::Api)?;
        let mut data = secret.data.unwrap_or_default();
        let value = data.remove(key).ok_or_else(|| Error::SecretFieldNotFound {
            namespace: namespace.to_string(),
            name: name.to_string(),
            key: key.to_string(),
        })?;
        Ok(value.0)
    }

    async fn named_port(
        &self,
        namespace: &str,
        service: &str,
        port_name: &str,
    ) -> anyhow::Result<u16> {
        let svc = Api::<Service>::namespaced(self.client.clone(), namespace)
            .get(service)
            .await
            .map_err(Error::Api)?;
        let ports = svc.spec.and_then(|spec| spec.ports).unwrap_or_default();
        Ok(match_named_port(namespace, service, port_name, &ports)?)
    }
}

/// Selects the unique port carrying `port_name`; zero or multiple matches
/// fail.
fn match_named_port(
    namespace: &str,
    service: &str,
    port_name: &str,
    ports: &[ServicePort],
) -> Result<u16, Error> {
    let matched: Vec<&ServicePort> = ports
        .iter()
        .filter(|port| port.name.as_deref() == Some(port_name))
        .collect();

    match matched.as_slice() {
        [port] => u16::try_from(port.port).map_err(|_| Error::InvalidPort {
            namespace: namespace.to_string(),
            service: service.to_string(),
            port: port_name.to_string(),
            value: port.port,
        }),
        [] => Err(Error::PortNotFound {
            namespace: namespace.to_string(),
            service: service.to_string(),
            port: port_name.to_string(),
        }),
        _ => Err(Error::AmbiguousPort {
            namespace: namespace.to_string(),
            service: service.to_string(),
            port: port_name.to_string(),
            matches: matched.len(),
        }),
    }
}
