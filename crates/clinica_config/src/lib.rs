use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::PathBuf;
use tracing::warn;

pub mod models;
pub use models::*;

/// Marker value replaced by an environment variable named after the key path.
pub const SECRET_FROM_ENV: &str = "secret_from_env";

/// Loads the layered application configuration.
///
/// Sources, later ones overriding earlier ones:
/// 1. `{CONFIG_DIR}/default.*`
/// 2. `{CONFIG_DIR}/{RUN_ENV}.*` (`RUN_ENV` defaults to `debug`)
/// 3. Environment variables prefixed with `CLINICA`, nested with `__`
///    (e.g. `CLINICA__API__BASE_URL`)
///
/// `CONFIG_DIR` defaults to `config` relative to the working directory.
/// Values equal to `"secret_from_env"` are resolved afterwards, see
/// [`apply_env_overrides_from_marker`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "CLINICA".to_string());
    let config_dir = PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    let builder = Config::builder()
        .add_source(File::from(config_dir.join("default")).required(false))
        .add_source(File::from(config_dir.join(&run_env)).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

/// Recursively replaces all "secret_from_env" string values with environment variable values
fn inject_env_secrets(value: &mut Value, lookup: &dyn Fn(&str) -> Option<String>) {
    fn walk(path: Vec<String>, obj: &mut Value, lookup: &dyn Fn(&str) -> Option<String>) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v, lookup);
                }
            }
            Value::String(s) if s == SECRET_FROM_ENV => {
                let env_key = path.join("_").to_uppercase();
                match lookup(&env_key) {
                    Some(env_val) => *obj = Value::String(env_val),
                    None => {
                        warn!("env var {} not found for secret_from_env", env_key);
                        *obj = Value::Null;
                    }
                }
            }
            _ => {}
        }
    }

    walk(vec![], value, lookup);
}

/// Applies environment overrides based on "secret_from_env" markers in serialized config.
///
/// A marker whose variable is missing becomes `null`, so optional secrets
/// (like `api.token`) end up as `None` instead of the literal marker.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    resolve_secrets_with(config, |key| env::var(key).ok())
}

fn resolve_secrets_with<F>(config: AppConfig, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("failed to serialize config: {err}")))?;
    inject_env_secrets(&mut json, &lookup);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("config invalid after secret injection: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// `DOTENV_OVERRIDE` selects the file; otherwise `.env` in the working
/// directory is used. Loading happens at most once per process and a
/// missing file is not an error. Returns the path that was considered.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config(token: Option<&str>) -> AppConfig {
        AppConfig {
            api: ApiConfig {
                base_url: "http://localhost:9000".to_string(),
                tenant_id: "clinic-7".to_string(),
                token: token.map(str::to_string),
                timeout_secs: 30,
            },
            scheduling: SchedulingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_secret_marker_is_replaced_from_lookup() {
        let config = sample_config(Some(SECRET_FROM_ENV));
        let resolved = resolve_secrets_with(config, |key| {
            (key == "API_TOKEN").then(|| "s3cr3t".to_string())
        })
        .unwrap();

        assert_eq!(resolved.api.token.as_deref(), Some("s3cr3t"));
    }

    #[test]
    fn test_missing_secret_becomes_none() {
        let config = sample_config(Some(SECRET_FROM_ENV));
        let resolved = resolve_secrets_with(config, |_| None).unwrap();

        assert_eq!(resolved.api.token, None);
    }

    #[test]
    fn test_plain_values_are_untouched() {
        let config = sample_config(Some("literal-token"));
        let resolved = resolve_secrets_with(config, |_| Some("other".to_string())).unwrap();

        assert_eq!(resolved.api.token.as_deref(), Some("literal-token"));
        assert_eq!(resolved.api.tenant_id, "clinic-7");
    }

    #[test]
    fn test_defaults_apply_when_sections_missing() {
        let json = r#"{ "api": { "base_url": "http://x", "tenant_id": "t" } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.scheduling.debounce_ms, 500);
        assert_eq!(config.scheduling.time_zone, "Europe/Zurich");
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.directory.is_none());
    }
}
