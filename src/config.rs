use serde::Deserialize;

use crate::{Result, dialect::Dialect};

fn default_url() -> String {
    ":memory:".to_owned()
}

/// Connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DbConfig {
    /// Grammar the connection speaks, `mysql` or `sqlite`.
    #[serde(default)]
    pub driver: Dialect,

    /// Database location. For sqlite a file path.
    /// Default: `:memory:`
    #[serde(default = "default_url")]
    pub url: String,

    /// Prepended to every table name handed to [`crate::Db::table`].
    #[serde(default)]
    pub prefix: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            driver: Dialect::default(),
            url: default_url(),
            prefix: String::new(),
        }
    }
}

impl DbConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
