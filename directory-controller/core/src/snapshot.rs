//! The ingress snapshot model consumed by the build engine.
//!
//! These types are deliberately independent of the cluster API client; the
//! k8s layer converts listed resources into this shape so the engine stays a
//! pure function over owned data plus two narrow lookup capabilities.

use std::collections::BTreeMap;

/// One ingress resource as seen at snapshot time.
#[derive(Clone, Debug, Default)]
pub struct IngressEntry {
    pub name: String,
    pub namespace: String,
    pub annotations: BTreeMap<String, String>,
    pub tls: Vec<TlsEntry>,
    pub rules: Vec<Rule>,
}

/// A TLS stanza naming the hosts it covers.
#[derive(Clone, Debug, Default)]
pub struct TlsEntry {
    pub hosts: Vec<String>,
}

/// A host rule, optionally carrying an HTTP block.
#[derive(Clone, Debug, Default)]
pub struct Rule {
    pub host: String,
    pub http: Option<HttpRule>,
}

/// The ordered paths of a rule's HTTP block.
#[derive(Clone, Debug, Default)]
pub struct HttpRule {
    pub paths: Vec<HttpPath>,
}

#[derive(Clone, Debug)]
pub struct HttpPath {
    pub path: String,
    pub backend: Backend,
}

/// The service a path routes to.
#[derive(Clone, Debug)]
pub struct Backend {
    pub service: String,
    pub port: PortRef,
}

/// A backend port: already numeric, or a name to be resolved against the
/// backend service's spec.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PortRef {
    Number(u16),
    Name(String),
}

// === impl IngressEntry ===

impl IngressEntry {
    /// Looks up a raw annotation value. Absent keys yield `None`; a key that
    /// is present with an empty value yields `Some("")`.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }
}
