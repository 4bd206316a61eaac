//! The grouped service directory produced by a build.

use indexmap::IndexMap;
use serde::Serialize;

/// One externally reachable endpoint derived from an ingress path.
///
/// Serializes in the dashboard's camelCase wire form; absent fields are
/// omitted rather than rendered as nulls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEntry {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthcheck_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget: Option<Widget>,
}

/// A live-status panel embedded in a service entry. `internal_url` always
/// points at the backend's cluster-internal DNS name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    #[serde(rename = "type")]
    pub widget_type: String,
    pub internal_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Group name -> service name -> entry, preserving first-seen order of both
/// levels. Each build produces an independently owned value; there is no
/// ambient registry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directory(IndexMap<String, IndexMap<String, ServiceEntry>>);

// === impl ServiceEntry ===

impl ServiceEntry {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            description: None,
            icon: None,
            healthcheck_url: None,
            target: None,
            widget: None,
        }
    }
}

// === impl Directory ===

impl Directory {
    /// Inserts an entry, overwriting a prior same-named entry in the group.
    pub fn insert(&mut self, group: &str, name: &str, entry: ServiceEntry) {
        self.0
            .entry(group.to_string())
            .or_default()
            .insert(name.to_string(), entry);
    }

    pub fn group(&self, group: &str) -> Option<&IndexMap<String, ServiceEntry>> {
        self.0.get(group)
    }

    pub fn service(&self, group: &str, name: &str) -> Option<&ServiceEntry> {
        self.0.get(group)?.get(name)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &IndexMap<String, ServiceEntry>)> {
        self.0.iter().map(|(group, services)| (group.as_str(), services))
    }

    /// The number of groups.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
