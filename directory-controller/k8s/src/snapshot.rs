//! Lists ingress resources cluster-wide and converts them into the core
//! snapshot model.

use homeport_directory_controller_core::{
    Backend, HttpPath, HttpRule, IngressEntry, PortRef, Rule, TlsEntry,
};
use k8s_openapi::api::networking::v1 as networking;
use kube::{
    api::{Api, ListParams, ResourceExt},
    Client,
};
use tracing::debug;

/// Fetches the full set of ingress resources visible cluster-wide.
pub async fn snapshot(client: Client) -> kube::Result<Vec<IngressEntry>> {
    let ingresses = Api::<networking::Ingress>::all(client)
        .list(&ListParams::default())
        .await?;
    debug!(ingresses = ingresses.items.len(), "Listed ingress resources");
    Ok(ingresses.into_iter().map(into_entry).collect())
}

/// Conversion is total over well-typed resources: optional hosts and paths
/// become empty strings, and paths that do not name a backend service are
/// dropped.
fn into_entry(ingress: networking::Ingress) -> IngressEntry {
    let name = ingress.name_unchecked();
    let namespace = ingress.namespace().unwrap_or_default();
    let annotations = ingress.metadata.annotations.unwrap_or_default();

    let spec = ingress.spec.unwrap_or_default();
    let tls = spec
        .tls
        .unwrap_or_default()
        .into_iter()
        .map(|tls| TlsEntry {
            hosts: tls.hosts.unwrap_or_default(),
        })
        .collect();
    let rules = spec
        .rules
        .unwrap_or_default()
        .into_iter()
        .map(into_rule)
        .collect();

    IngressEntry {
        name,
        namespace,
        annotations,
        tls,
        rules,
    }
}

fn into_rule(rule: networking::IngressRule) -> Rule {
    Rule {
        host: rule.host.unwrap_or_default(),
        http: rule.http.map(|http| HttpRule {
            paths: http.paths.into_iter().filter_map(into_path).collect(),
        }),
    }
}

fn into_path(path: networking::HTTPIngressPath) -> Option<HttpPath> {
    let backend = path.backend.service?;
    Some(HttpPath {
        path: path.path.unwrap_or_default(),
        backend: Backend {
            service: backend.name,
            port: into_port(backend.port),
        },
    })
}

fn into_port(port: Option<networking::ServiceBackendPort>) -> PortRef {
    match port {
        Some(port) => {
            if let Some(number) = port.number.and_then(|number| u16::try_from(number).ok()) {
                PortRef::Number(number)
            } else {
                // A port with neither a number nor a name can only surface
                // during widget resolution, where the empty name fails the
                // lookup.
                PortRef::Name(port.name.unwrap_or_default())
            }
        }
        None => PortRef::Name(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use k8s_openapi::api::networking::v1::{
        HTTPIngressPath, HTTPIngressRuleValue, IngressBackend, IngressRule,
        IngressServiceBackend, IngressSpec, IngressTLS, ServiceBackendPort,
    };
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use maplit::btreemap;

    use super::*;

    fn backend(service: Option<&str>, port: Option<ServiceBackendPort>) -> IngressBackend {
        IngressBackend {
            service: service.map(|name| IngressServiceBackend {
                name: name.to_string(),
                port,
            }),
            ..IngressBackend::default()
        }
    }

    #[test]
    fn converts_a_full_ingress() {
        let ingress = networking::Ingress {
            metadata: ObjectMeta {
                name: Some("my-ingress".to_string()),
                namespace: Some("my-namespace".to_string()),
                annotations: Some(btreemap! {
                    "homeport.dev/group".to_string() => "Ops".to_string(),
                }),
                ..ObjectMeta::default()
            },
            spec: Some(IngressSpec {
                tls: Some(vec![IngressTLS {
                    hosts: Some(vec!["my-host.com".to_string()]),
                    ..IngressTLS::default()
                }]),
                rules: Some(vec![IngressRule {
                    host: Some("my-host.com".to_string()),
                    http: Some(HTTPIngressRuleValue {
                        paths: vec![
                            HTTPIngressPath {
                                path: Some("/my-path".to_string()),
                                path_type: "Prefix".to_string(),
                                backend: backend(
                                    Some("my-service"),
                                    Some(ServiceBackendPort {
                                        number: Some(80),
                                        name: None,
                                    }),
                                ),
                            },
                            HTTPIngressPath {
                                path: Some("/metrics".to_string()),
                                path_type: "Prefix".to_string(),
                                backend: backend(
                                    Some("my-service"),
                                    Some(ServiceBackendPort {
                                        number: None,
                                        name: Some("http-metrics".to_string()),
                                    }),
                                ),
                            },
                        ],
                    }),
                }]),
                ..IngressSpec::default()
            }),
            ..networking::Ingress::default()
        };

        let entry = into_entry(ingress);
        assert_eq!(entry.name, "my-ingress");
        assert_eq!(entry.namespace, "my-namespace");
        assert_eq!(
            entry.annotations.get("homeport.dev/group").map(String::as_str),
            Some("Ops"),
        );
        assert_eq!(entry.tls.len(), 1);
        assert_eq!(entry.tls[0].hosts, vec!["my-host.com".to_string()]);

        let paths = &entry.rules[0].http.as_ref().unwrap().paths;
        assert_eq!(paths[0].path, "/my-path");
        assert_eq!(paths[0].backend.service, "my-service");
        assert_eq!(paths[0].backend.port, PortRef::Number(80));
        assert_eq!(
            paths[1].backend.port,
            PortRef::Name("http-metrics".to_string()),
        );
    }

    #[test]
    fn drops_paths_without_a_service_backend() {
        let rule = IngressRule {
            host: None,
            http: Some(HTTPIngressRuleValue {
                paths: vec![
                    HTTPIngressPath {
                        path: Some("/by-resource".to_string()),
                        path_type: "Prefix".to_string(),
                        backend: backend(None, None),
                    },
                    HTTPIngressPath {
                        path: Some("/by-service".to_string()),
                        path_type: "Prefix".to_string(),
                        backend: backend(
                            Some("my-service"),
                            Some(ServiceBackendPort {
                                number: Some(80),
                                name: None,
                            }),
                        ),
                    },
                ],
            }),
        };

        let converted = into_rule(rule);
        assert_eq!(converted.host, "");
        let paths = &converted.http.unwrap().paths;
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].path, "/by-service");
    }

    #[test]
    fn rules_without_http_blocks_stay_empty() {
        let converted = into_rule(IngressRule {
            host: Some("my-host.com".to_string()),
            http: None,
        });
        assert_eq!(converted.host, "my-host.com");
        assert!(converted.http.is_none());
    }

    #[test]
    fn degenerate_ports_become_empty_names() {
        assert_eq!(into_port(None), PortRef::Name(String::new()));
        assert_eq!(
            into_port(Some(ServiceBackendPort {
                number: None,
                name: None,
            })),
            PortRef::Name(String::new()),
        );
        // Out-of-range numbers fall back to the (absent) name rather than
        // wrapping.
        assert_eq!(
            into_port(Some(ServiceBackendPort {
                number: Some(70_000),
                name: None,
            })),
            PortRef::Name(String::new()),
        );
    }
}
