use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RoutingConfig {
    /// Only paths starting with this prefix are served. Empty allows all.
    #[serde(default)]
    pub path_prefix: String,
}

impl RoutingConfig {
    pub fn allows(&self, path: &str) -> bool {
        path.starts_with(&self.path_prefix)
    }
}
