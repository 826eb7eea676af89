use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Credentials for the operators that require an API key
    pub operator_api_keys: OperatorApiKeys,
    /// Address the HTTP server binds to (default: 0.0.0.0:3000)
    #[serde(default = "Config::default_bind_addr")]
    pub bind_addr: String,
    /// SQLite database file location (default: database/bikes.db)
    #[serde(default = "Config::default_database_path")]
    pub database_path: String,
}

/// JC Decaux and An Rothar Nua both require an API key to be provided.
/// Nextbike and Bleeper Bikes are open APIs.
#[derive(Debug, Clone, Deserialize)]
pub struct OperatorApiKeys {
    pub jc_decaux: String,
    pub an_rothar_nua: String,
}

impl Config {
    fn default_bind_addr() -> String {
        "0.0.0.0:3000".to_string()
    }

    fn default_database_path() -> String {
        "database/bikes.db".to_string()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parses_with_defaults() {
        let yaml = r#"
operator_api_keys:
  jc_decaux: "key-a"
  an_rothar_nua: "key-b"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.operator_api_keys.jc_decaux, "key-a");
        assert_eq!(config.operator_api_keys.an_rothar_nua, "key-b");
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.database_path, "database/bikes.db");
    }

    #[test]
    fn config_overrides_defaults() {
        let yaml = r#"
operator_api_keys:
  jc_decaux: "key-a"
  an_rothar_nua: "key-b"
bind_addr: "127.0.0.1:8080"
database_path: "/tmp/test.db"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.database_path, "/tmp/test.db");
    }

    #[test]
    fn config_rejects_missing_keys() {
        let yaml = "bind_addr: \"0.0.0.0:3000\"\n";
        let result: Result<Config, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }
}
