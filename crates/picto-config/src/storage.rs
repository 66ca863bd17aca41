use serde::Deserialize;

/// Image record storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// `SQLite` connection string; the file is created when missing
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Connection pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// URL recorded for uploads while no object storage is attached
    #[serde(default = "default_placeholder_url")]
    pub placeholder_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            placeholder_url: default_placeholder_url(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://picto.db".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_connections() -> u32 {
    5
}

fn default_placeholder_url() -> String {
    "placeholder-url".to_string()
}
