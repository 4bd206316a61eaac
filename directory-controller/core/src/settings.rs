//! Global defaults consumed by the build engine.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Knobs that apply to every ingress without a more specific annotation.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Whether an ingress with no enable annotation is included.
    pub include_by_default: bool,

    /// Link target applied when no target annotation is present.
    pub default_target: LinkTarget,
}

/// An HTML link target, with `Unset` as the "no default configured" sentinel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LinkTarget {
    #[default]
    Unset,
    Blank,
    SelfFrame,
    Top,
}

#[derive(Clone, Debug, Error)]
#[error("invalid link target {0:?}; expected one of unset, _blank, _self, _top")]
pub struct InvalidLinkTarget(String);

// === impl Settings ===

impl Default for Settings {
    fn default() -> Self {
        Self {
            include_by_default: true,
            default_target: LinkTarget::Unset,
        }
    }
}

// === impl LinkTarget ===

impl LinkTarget {
    /// The `target` attribute value, or `None` for the unset sentinel.
    pub fn as_attribute(&self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::Blank => Some("_blank"),
            Self::SelfFrame => Some("_self"),
            Self::Top => Some("_top"),
        }
    }
}

impl FromStr for LinkTarget {
    type Err = InvalidLinkTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unset" => Ok(Self::Unset),
            "_blank" => Ok(Self::Blank),
            "_self" => Ok(Self::SelfFrame),
            "_top" => Ok(Self::Top),
            _ => Err(InvalidLinkTarget(s.to_string())),
        }
    }
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_attribute().unwrap_or("unset"))
    }
}
