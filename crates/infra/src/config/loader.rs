//! Configuration loader
//!
//! Loads application configuration from a file, then overlays environment
//! variables.
//!
//! ## Loading Strategy
//! 1. If `FZ152_CONFIG` is set, load that file (it must exist)
//! 2. Otherwise probe the standard locations for a config file
//! 3. Otherwise start from defaults
//! 4. Overlay `FZ152_*` environment variables
//! 5. Validate the merged configuration
//!
//! ## Environment Variables
//! - `FZ152_CONFIG`: Explicit config file path
//! - `FZ152_HOST`, `FZ152_PORT`: Listener address
//! - `FZ152_MAX_BODY_BYTES`: Request body limit
//! - `FZ152_LANGUAGE`: Analysis language (only `ru` is served)
//! - `FZ152_SCORE_THRESHOLD`: Minimum result score
//! - `FZ152_PARALLEL`: Fan recognizers out per request (true/false)
//! - `FZ152_NER_ENABLED`: Whether the statistical recognizer runs
//! - `FZ152_NER_LEXICON`: Lexicon file replacing the embedded one
//! - `FZ152_HASH_SALT`: Salt for the `hash` operator
//! - `FZ152_LOG_LEVEL`, `FZ152_LOG_JSON`: Log output
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./fz152.toml`, `./fz152.json`, `./config.toml`, `./config.json`
//! 2. The same names in the parent and grandparent directories
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use fz152_domain::constants::ENV_PREFIX;
use fz152_domain::{AppConfig, Fz152Error, Result};

const CONFIG_FILE_NAMES: &[&str] = &["fz152.toml", "fz152.json", "config.toml", "config.json"];

/// Load configuration with the full fallback strategy
///
/// # Errors
/// Returns `Fz152Error::Config` if:
/// - `FZ152_CONFIG` names a file that does not exist
/// - The file format is invalid
/// - An environment variable has an invalid value
/// - The merged configuration fails validation
pub fn load() -> Result<AppConfig> {
    let mut config = match std::env::var_os(env_key("CONFIG")) {
        Some(path) => load_from_file(Some(PathBuf::from(path)))?,
        None => match probe_config_paths() {
            Some(path) => load_from_file(Some(path))?,
            None => {
                tracing::info!("No configuration file found, using defaults");
                AppConfig::default()
            }
        },
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        language = %config.analyzer.language,
        ner_enabled = config.ner.enabled,
        parallel = config.analyzer.parallel,
        "Configuration loaded"
    );
    Ok(config)
}

/// Defaults overlaid with environment variables only
///
/// # Errors
/// Returns `Fz152Error::Config` for invalid values.
pub fn load_from_env() -> Result<AppConfig> {
    let mut config = AppConfig::default();
    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension). The
/// result is not validated; [`load`] validates after the environment
/// overlay.
///
/// # Errors
/// Returns `Fz152Error::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(Fz152Error::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            Fz152Error::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| Fz152Error::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| Fz152Error::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| Fz152Error::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(Fz152Error::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd.clone());
        roots.push(cwd.join(".."));
        roots.push(cwd.join("../.."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.is_file())
}

/// Overlay `FZ152_*` environment variables onto `config`
///
/// Unset and empty variables leave the current value.
///
/// # Errors
/// Returns `Fz152Error::Config` naming the variable when a value does not
/// parse.
pub fn apply_env_overrides(config: &mut AppConfig) -> Result<()> {
    if let Some(host) = env_var("HOST") {
        config.server.host = host;
    }
    if let Some(port) = env_parse("PORT")? {
        config.server.port = port;
    }
    if let Some(limit) = env_parse("MAX_BODY_BYTES")? {
        config.server.max_body_bytes = limit;
    }

    if let Some(language) = env_var("LANGUAGE") {
        config.analyzer.language = language;
    }
    if let Some(threshold) = env_parse("SCORE_THRESHOLD")? {
        config.analyzer.score_threshold = threshold;
    }
    config.analyzer.parallel = env_bool("PARALLEL", config.analyzer.parallel);

    config.ner.enabled = env_bool("NER_ENABLED", config.ner.enabled);
    if let Some(path) = env_var("NER_LEXICON") {
        config.ner.lexicon_path = Some(PathBuf::from(path));
    }

    if let Some(salt) = env_var("HASH_SALT") {
        config.anonymizer.hash_salt = Some(salt);
    }

    if let Some(level) = env_var("LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("LOG_JSON", config.logging.json);

    Ok(())
}

fn env_key(name: &str) -> String {
    format!("{}{}", ENV_PREFIX, name)
}

/// Non-empty environment variable `FZ152_<name>`
fn env_var(name: &str) -> Option<String> {
    std::env::var(env_key(name)).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(name)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| {
                Fz152Error::Config(format!("Invalid value for {}: {}", env_key(name), e))
            })
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
///
/// # Returns
/// The parsed boolean value, or `default` if not set.
fn env_bool(name: &str, default: bool) -> bool {
    env_var(name)
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: &[&str] = &[
        "FZ152_CONFIG",
        "FZ152_HOST",
        "FZ152_PORT",
        "FZ152_MAX_BODY_BYTES",
        "FZ152_LANGUAGE",
        "FZ152_SCORE_THRESHOLD",
        "FZ152_PARALLEL",
        "FZ152_NER_ENABLED",
        "FZ152_NER_LEXICON",
        "FZ152_HASH_SALT",
        "FZ152_LOG_LEVEL",
        "FZ152_LOG_JSON",
    ];

    fn clear_env() {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
    }

    fn temp_config(contents: &str, extension: &str) -> PathBuf {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        path
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        for value in ["1", "true", "yes", "on", "TRUE"] {
            std::env::set_var("FZ152_TEST_BOOL", value);
            assert!(env_bool("TEST_BOOL", false), "{} should be true", value);
        }
        for value in ["0", "false", "no", "off"] {
            std::env::set_var("FZ152_TEST_BOOL", value);
            assert!(!env_bool("TEST_BOOL", true), "{} should be false", value);
        }

        std::env::remove_var("FZ152_TEST_BOOL");
        assert!(env_bool("TEST_BOOL", true));
        assert!(!env_bool("TEST_BOOL", false));
    }

    /// Validates `load_from_env` behavior for the full overlay scenario.
    ///
    /// Assertions:
    /// - Confirms every variable reaches its config field.
    /// - Confirms untouched fields keep their defaults.
    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("FZ152_HOST", "127.0.0.1");
        std::env::set_var("FZ152_PORT", "9000");
        std::env::set_var("FZ152_SCORE_THRESHOLD", "0.5");
        std::env::set_var("FZ152_PARALLEL", "yes");
        std::env::set_var("FZ152_NER_ENABLED", "false");
        std::env::set_var("FZ152_NER_LEXICON", "/etc/fz152/lexicon.toml");
        std::env::set_var("FZ152_HASH_SALT", "pepper");
        std::env::set_var("FZ152_LOG_LEVEL", "debug");
        std::env::set_var("FZ152_LOG_JSON", "1");

        let result = load_from_env();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert!((config.analyzer.score_threshold - 0.5).abs() < f64::EPSILON);
        assert!(config.analyzer.parallel);
        assert!(!config.ner.enabled);
        assert_eq!(config.ner.lexicon_path, Some(PathBuf::from("/etc/fz152/lexicon.toml")));
        assert_eq!(config.anonymizer.hash_salt.as_deref(), Some("pepper"));
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(config.analyzer.language, "ru");
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("FZ152_PORT", "not-a-number");
        let result = load_from_env();
        clear_env();

        let err = result.unwrap_err();
        assert!(matches!(err, Fz152Error::Config(_)), "Should be a Config error");
        assert!(err.to_string().contains("FZ152_PORT"));
    }

    #[test]
    fn test_load_from_env_fails_validation() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("FZ152_LANGUAGE", "en");
        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(Fz152Error::Config(_))));
    }

    #[test]
    fn test_empty_env_values_ignored() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("FZ152_HOST", "  ");
        let config = load_from_env();
        clear_env();

        assert_eq!(config.unwrap().server.host, "0.0.0.0");
    }

    /// Validates `load` behavior for the explicit file plus overlay scenario.
    ///
    /// Assertions:
    /// - Confirms the file named by `FZ152_CONFIG` is used.
    /// - Confirms environment variables win over file values.
    #[test]
    fn test_load_explicit_file_then_env() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let path = temp_config(
            r#"
[server]
port = 8100

[analyzer]
score_threshold = 0.3

[anonymizer.operators.RU_PASSPORT]
type = "redact"
"#,
            "toml",
        );
        std::env::set_var("FZ152_CONFIG", &path);
        std::env::set_var("FZ152_PORT", "8200");

        let result = load();
        clear_env();
        std::fs::remove_file(&path).ok();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8200);
        assert!((config.analyzer.score_threshold - 0.3).abs() < f64::EPSILON);
        assert!(config.anonymizer.operators.contains_key("RU_PASSPORT"));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("FZ152_CONFIG", "/nonexistent/fz152.toml");
        let result = load();
        clear_env();

        assert!(matches!(result, Err(Fz152Error::Config(_))));
    }

    #[test]
    fn test_load_from_file_json() {
        let path = temp_config(
            r#"{
                "server": { "host": "127.0.0.1", "port": 8080 },
                "ner": { "enabled": false },
                "anonymizer": {
                    "hash_type": "sha512",
                    "operators": { "DEFAULT": { "type": "replace", "new_value": "[hidden]" } }
                }
            }"#,
            "json",
        );

        let result = load_from_file(Some(path.clone()));
        std::fs::remove_file(path).ok();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(!config.ner.enabled);
        assert_eq!(config.anonymizer.hash_type, fz152_domain::HashType::Sha512);
        assert_eq!(config.anonymizer.operators.len(), 1);
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(matches!(result, Err(Fz152Error::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_load_from_file_invalid_toml() {
        let path = temp_config("[server\nport = ", "toml");
        let result = load_from_file(Some(path.clone()));
        std::fs::remove_file(path).ok();
        assert!(result.is_err(), "Should fail with invalid TOML");
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", &PathBuf::from("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_parse_config_without_extension_is_toml() {
        let config = parse_config("[logging]\njson = true\n", &PathBuf::from("fz152")).unwrap();
        assert!(config.logging.json);
    }
}
