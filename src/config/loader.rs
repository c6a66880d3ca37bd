//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{PassiveMode, SourceBackend, StockfeedConfig};
use super::secret::secret_string;
use crate::domain::errors::StockfeedError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into StockfeedConfig
/// 4. Applies environment variable overrides (STOCKFEED_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a referenced
/// environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use stockfeed::config::loader::load_config;
///
/// let config = load_config("stockfeed.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<StockfeedConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(StockfeedError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        StockfeedError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: StockfeedConfig = toml::from_str(&contents)
        .map_err(|e| StockfeedError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        StockfeedError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| StockfeedError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(StockfeedError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using STOCKFEED_* prefix
///
/// Environment variables follow the pattern: STOCKFEED_<SECTION>_<KEY>
/// For example: STOCKFEED_TRANSFER_HOST, STOCKFEED_SOURCE_PAGE_SIZE
fn apply_env_overrides(config: &mut StockfeedConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("STOCKFEED_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("STOCKFEED_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Source overrides
    if let Ok(val) = std::env::var("STOCKFEED_SOURCE_BACKEND") {
        config.source.backend = match val.to_lowercase().as_str() {
            "postgresql" => SourceBackend::PostgreSQL,
            "postgrest" => SourceBackend::PostgREST,
            other => {
                return Err(StockfeedError::Configuration(format!(
                    "Invalid STOCKFEED_SOURCE_BACKEND '{other}'. Must be postgresql or postgrest"
                )))
            }
        };
    }
    if let Ok(val) = std::env::var("STOCKFEED_SOURCE_TABLE") {
        config.source.table = val;
    }
    if let Ok(val) = std::env::var("STOCKFEED_SOURCE_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            config.source.page_size = size;
        }
    }

    // Datastore overrides (only if the section is configured)
    if let Some(ref mut pg_config) = config.postgresql {
        if let Ok(val) = std::env::var("STOCKFEED_POSTGRESQL_CONNECTION_STRING") {
            pg_config.connection_string = secret_string(val);
        }
        if let Ok(val) = std::env::var("STOCKFEED_POSTGRESQL_SSL_MODE") {
            pg_config.ssl_mode = val;
        }
    }
    if let Some(ref mut rest_config) = config.postgrest {
        if let Ok(val) = std::env::var("STOCKFEED_POSTGREST_URL") {
            rest_config.url = val;
        }
        if let Ok(val) = std::env::var("STOCKFEED_POSTGREST_API_KEY") {
            rest_config.api_key = Some(secret_string(val));
        }
    }

    // Transform overrides
    if let Ok(val) = std::env::var("STOCKFEED_TRANSFORM_RATIO") {
        if let Ok(ratio) = val.parse() {
            config.transform.ratio = ratio;
        }
    }

    // Artifact overrides
    if let Ok(val) = std::env::var("STOCKFEED_ARTIFACT_LOCAL_DIR") {
        config.artifact.local_dir = val;
    }

    // Transfer overrides
    if let Ok(val) = std::env::var("STOCKFEED_TRANSFER_HOST") {
        config.transfer.host = val;
    }
    if let Ok(val) = std::env::var("STOCKFEED_TRANSFER_PORT") {
        if let Ok(port) = val.parse() {
            config.transfer.port = port;
        }
    }
    if let Ok(val) = std::env::var("STOCKFEED_TRANSFER_USERNAME") {
        config.transfer.username = Some(val);
    }
    if let Ok(val) = std::env::var("STOCKFEED_TRANSFER_PASSWORD") {
        config.transfer.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("STOCKFEED_TRANSFER_REMOTE_DIR") {
        config.transfer.remote_dir = val;
    }
    if let Ok(val) = std::env::var("STOCKFEED_TRANSFER_REMOTE_NAME") {
        config.transfer.remote_name = val;
    }
    if let Ok(val) = std::env::var("STOCKFEED_TRANSFER_SECURE") {
        config.transfer.secure = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("STOCKFEED_TRANSFER_PASSIVE_MODE") {
        config.transfer.passive_mode = match val.to_lowercase().as_str() {
            "extended_passive" | "epsv" => PassiveMode::ExtendedPassive,
            _ => PassiveMode::Passive,
        };
    }

    // Audit overrides
    if let Ok(val) = std::env::var("STOCKFEED_AUDIT_TABLE") {
        config.audit.table = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("STOCKFEED_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("STOCKFEED_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("STOCKFEED_LOADER_TEST_VAR", "test_value");
        let input = "password = \"${STOCKFEED_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("STOCKFEED_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("STOCKFEED_LOADER_MISSING_VAR");
        let input = "password = \"${STOCKFEED_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("STOCKFEED_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("STOCKFEED_LOADER_COMMENTED");
        let input = "# password = \"${STOCKFEED_LOADER_COMMENTED}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[source]
backend = "postgrest"
table = "inventory"
page_size = 250

[postgrest]
url = "https://db.example.co/rest/v1"
api_key = "anon-key"

[transfer]
host = "ftp.partner.example"
remote_dir = "/inbound"
remote_name = "inventory.csv"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.source.backend, SourceBackend::PostgREST);
        assert_eq!(config.source.page_size, 250);
        assert_eq!(config.transform.ratio, 0.8);
        assert_eq!(config.transfer.port, 21);
        assert!(!config.transfer.has_credentials());
    }
}
