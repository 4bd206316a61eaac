//! Annotation keys recognized on ingress resources.
//!
//! All configuration consumed from the cluster flows through these keys;
//! annotations outside this set are ignored.

pub const ENABLE: &str = "homeport.dev/enable";
pub const GROUP: &str = "homeport.dev/group";
pub const WIDGET_TYPE: &str = "homeport.dev/widget_type";
pub const WIDGET_SECRET: &str = "homeport.dev/widget_secret";
pub const TARGET: &str = "homeport.dev/target";
pub const DESCRIPTION: &str = "homeport.dev/description";
pub const ICON: &str = "homeport.dev/icon";
pub const HEALTH_CHECK: &str = "homeport.dev/healthCheck";
pub const APP_NAME: &str = "homeport.dev/appName";
