//! Assembles the grouped service directory from an ingress snapshot.

use thiserror::Error;

use crate::{
    directory::{Directory, ServiceEntry, Widget},
    keys,
    settings::Settings,
    snapshot::{HttpPath, IngressEntry, PortRef},
};

/// Group used for ingresses without a group annotation.
pub const DEFAULT_GROUP: &str = "Default";

/// The two cluster reads the engine may perform while resolving widgets.
/// These are its only suspension points; dropping the build future at either
/// await abandons the cycle without producing a partial directory.
#[async_trait::async_trait]
pub trait ClusterLookups {
    /// Reads one field of a secret, as raw bytes.
    async fn secret_field(&self, namespace: &str, name: &str, key: &str)
        -> anyhow::Result<Vec<u8>>;

    /// Resolves a named service port to its number. Fails unless exactly one
    /// port carries the name.
    async fn named_port(
        &self,
        namespace: &str,
        service: &str,
        port_name: &str,
    ) -> anyhow::Result<u16>;
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("ingress {ingress}: widget secret reference {value:?} must be namespace/name/key")]
    MalformedSecretRef { ingress: String, value: String },

    #[error("ingress {ingress}: reading widget secret {value:?}: {source}")]
    SecretRead {
        ingress: String,
        value: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("ingress {ingress}: resolving port {port:?} on service {service:?}: {source}")]
    PortResolve {
        ingress: String,
        service: String,
        port: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Builds the directory for one snapshot, in snapshot order.
///
/// The first failed lookup or malformed widget reference aborts the whole
/// build; retry policy belongs to the caller.
pub async fn build(
    snapshot: &[IngressEntry],
    settings: &Settings,
    lookups: &impl ClusterLookups,
) -> Result<Directory, BuildError> {
    let mut directory = Directory::default();

    for ingress in snapshot {
        let include = ingress
            .annotation(keys::ENABLE)
            .map(str::to_string)
            .unwrap_or_else(|| settings.include_by_default.to_string());
        // Only the literal "false" excludes; any other value, well-formed or
        // not, includes.
        if include.eq_ignore_ascii_case("false") {
            continue;
        }

        let group = ingress.annotation(keys::GROUP).unwrap_or(DEFAULT_GROUP);

        for rule in &ingress.rules {
            let Some(http) = &rule.http else { continue };

            for (path_number, path) in http.paths.iter().enumerate() {
                let scheme = if ingress
                    .tls
                    .iter()
                    .any(|tls| tls.hosts.iter().any(|host| *host == rule.host))
                {
                    "https"
                } else {
                    "http"
                };
                let href = format!("{}://{}{}", scheme, rule.host, path.path);

                let widget = match ingress.annotation(keys::WIDGET_TYPE) {
                    Some(widget_type) if !widget_type.is_empty() => {
                        Some(resolve_widget(ingress, path, widget_type, lookups).await?)
                    }
                    _ => None,
                };

                let target = ingress
                    .annotation(keys::TARGET)
                    .map(str::to_string)
                    .or_else(|| settings.default_target.as_attribute().map(str::to_string));

                // The duplicate-name counter restarts at each rule, so rules
                // sharing a base name can collide; the later rule wins.
                let mut name = ingress
                    .annotation(keys::APP_NAME)
                    .unwrap_or(&ingress.name)
                    .to_string();
                if path_number > 0 {
                    name = format!("{}-{}", name, path_number);
                }

                let entry = ServiceEntry {
                    href,
                    description: ingress.annotation(keys::DESCRIPTION).map(str::to_string),
                    icon: ingress.annotation(keys::ICON).map(str::to_string),
                    healthcheck_url: ingress.annotation(keys::HEALTH_CHECK).map(str::to_string),
                    target,
                    widget,
                };
                directory.insert(group, &name, entry);
            }
        }
    }

    Ok(directory)
}

async fn resolve_widget(
    ingress: &IngressEntry,
    path: &HttpPath,
    widget_type: &str,
    lookups: &impl ClusterLookups,
) -> Result<Widget, BuildError> {
    let api_key = match ingress.annotation(keys::WIDGET_SECRET) {
        Some(reference) => {
            let (namespace, name, key) =
                split_secret_ref(reference).ok_or_else(|| BuildError::MalformedSecretRef {
                    ingress: ingress.name.clone(),
                    value: reference.to_string(),
                })?;
            let bytes = lookups
                .secret_field(namespace, name, key)
                .await
                .map_err(|source| BuildError::SecretRead {
                    ingress: ingress.name.clone(),
                    value: reference.to_string(),
                    source,
                })?;
            Some(String::from_utf8_lossy(&bytes).into_owned())
        }
        None => None,
    };

    let port = match &path.backend.port {
        PortRef::Number(number) => *number,
        PortRef::Name(port_name) => lookups
            .named_port(&ingress.namespace, &path.backend.service, port_name)
            .await
            .map_err(|source| BuildError::PortResolve {
                ingress: ingress.name.clone(),
                service: path.backend.service.clone(),
                port: port_name.clone(),
                source,
            })?,
    };

    Ok(Widget {
        widget_type: widget_type.to_string(),
        internal_url: format!(
            "http://{}.{}.svc.cluster.local:{}",
            path.backend.service, ingress.namespace, port
        ),
        api_key,
    })
}

/// Splits a widget secret reference into exactly three segments.
fn split_secret_ref(reference: &str) -> Option<(&str, &str, &str)> {
    let mut parts = reference.splitn(4, '/');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(namespace), Some(name), Some(key), None) => Some((namespace, name, key)),
        _ => None,
    }
}
