//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::AnonymapConfig;
use crate::domain::errors::AnonymapError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "anonymap.toml";

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("Invalid env var pattern")
});

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into AnonymapConfig
/// 4. Applies environment variable overrides (ANONYMAP_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use anonymap::config::loader::load_config;
///
/// let config = load_config("anonymap.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AnonymapConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AnonymapError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        AnonymapError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_str(&contents)
}

/// Loads configuration from TOML text
pub fn load_config_str(contents: &str) -> Result<AnonymapConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: AnonymapConfig = toml::from_str(&contents)
        .map_err(|e| AnonymapError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;
    validate(&config)?;

    Ok(config)
}

/// Loads `path`, falling back to defaults when the default file is absent
///
/// An explicitly requested file that does not exist is still an error.
pub fn load_config_or_default(path: impl AsRef<Path>, explicit: bool) -> Result<AnonymapConfig> {
    let path = path.as_ref();
    if path.exists() || explicit {
        return load_config(path);
    }

    tracing::debug!(
        path = %path.display(),
        "No configuration file found, using defaults"
    );
    let mut config = AnonymapConfig::default();
    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AnonymapConfig) -> Result<()> {
    config.validate().map_err(|e| {
        AnonymapError::Configuration(format!("Configuration validation failed: {e}"))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Every missing variable is reported in a
/// single error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let mut missing_vars: Vec<String> = Vec::new();
    let mut lines = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let processed = ENV_VAR_PATTERN.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        lines.push(processed.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(AnonymapError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn env_bool(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            tracing::warn!(variable = name, value = %value, "Ignoring non-boolean override");
            None
        }
    }
}

fn env_list(name: &str) -> Option<Vec<String>> {
    let value = std::env::var(name).ok()?;
    Some(
        value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

/// Applies environment variable overrides using ANONYMAP_* prefix
///
/// Environment variables follow the pattern: ANONYMAP_<SECTION>_<KEY>
/// For example: ANONYMAP_RECOGNIZER_MODEL, ANONYMAP_EXTRACTION_ENTITY_TYPES.
/// List values are comma-separated.
fn apply_env_overrides(config: &mut AnonymapConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("ANONYMAP_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Recognizer overrides
    if let Ok(val) = std::env::var("ANONYMAP_RECOGNIZER_BACKEND") {
        config.recognizer.backend = val.parse().map_err(AnonymapError::Configuration)?;
    }
    if let Ok(val) = std::env::var("ANONYMAP_RECOGNIZER_MODEL") {
        config.recognizer.model = val;
    }
    if let Some(models) = env_list("ANONYMAP_RECOGNIZER_FALLBACK_MODELS") {
        config.recognizer.fallback_models = models;
    }
    if let Ok(val) = std::env::var("ANONYMAP_RECOGNIZER_COMMAND") {
        config.recognizer.command = Some(val);
    }
    if let Ok(val) = std::env::var("ANONYMAP_RECOGNIZER_PATTERN_LIBRARY") {
        config.recognizer.pattern_library = Some(val.into());
    }

    // Extraction overrides
    if let Some(types) = env_list("ANONYMAP_EXTRACTION_ENTITY_TYPES") {
        config.extraction.entity_types = types;
    }

    // Anonymization overrides
    if let Some(exclusions) = env_list("ANONYMAP_ANONYMIZATION_EXCLUSIONS") {
        config.anonymization.exclusions = exclusions;
    }
    if let Ok(val) = std::env::var("ANONYMAP_ANONYMIZATION_EXCLUSIONS_FILE") {
        config.anonymization.exclusions_file = Some(val.into());
    }

    // Mapping overrides
    if let Some(val) = env_bool("ANONYMAP_MAPPING_HAS_HEADER") {
        config.mapping.has_header = val;
    }
    if let Some(val) = env_bool("ANONYMAP_MAPPING_WRITE_HEADER") {
        config.mapping.write_header = val;
    }

    // Audit overrides
    if let Some(val) = env_bool("ANONYMAP_AUDIT_ENABLED") {
        config.audit.enabled = val;
    }
    if let Ok(val) = std::env::var("ANONYMAP_AUDIT_LOG_PATH") {
        config.audit.log_path = val.into();
    }
    if let Some(val) = env_bool("ANONYMAP_AUDIT_JSON_FORMAT") {
        config.audit.json_format = val;
    }

    // Logging overrides
    if let Some(val) = env_bool("ANONYMAP_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val;
    }
    if let Ok(val) = std::env::var("ANONYMAP_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("ANONYMAP_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_substitute_env_vars() {
        let _guard = ENV_MUTEX.lock().unwrap();
        std::env::set_var("ANONYMAP_TEST_MODEL", "en_core_web_sm");
        let input = "model = \"${ANONYMAP_TEST_MODEL}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "model = \"en_core_web_sm\"");
        std::env::remove_var("ANONYMAP_TEST_MODEL");
    }

    #[test]
    fn test_substitute_env_vars_reports_all_missing() {
        let _guard = ENV_MUTEX.lock().unwrap();
        std::env::remove_var("ANONYMAP_MISSING_ONE");
        std::env::remove_var("ANONYMAP_MISSING_TWO");
        let input = "a = \"${ANONYMAP_MISSING_ONE}\"\nb = \"${ANONYMAP_MISSING_TWO}\"";
        let err = substitute_env_vars(input).unwrap_err().to_string();
        assert!(err.contains("ANONYMAP_MISSING_ONE"));
        assert!(err.contains("ANONYMAP_MISSING_TWO"));
    }

    #[test]
    fn test_comments_are_not_substituted() {
        let input = "# command = \"${ANONYMAP_NEVER_SET}\"";
        assert_eq!(substitute_env_vars(input).unwrap(), input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(AnonymapError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let toml_content = r#"
[application]
log_level = "debug"

[recognizer]
backend = "command"
model = "en_core_web_lg"
command = "spacy-ner"
args = ["--model", "{model}"]

[extraction]
entity_types = ["PERSON", "ORG", "OTHER"]

[anonymization]
exclusions = ["Anonymap"]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.recognizer.command.as_deref(), Some("spacy-ner"));
        assert_eq!(config.recognizer.args, vec!["--model", "{model}"]);
        assert!(config.extraction.label_selection().allows("CARDINAL"));
    }

    #[test]
    fn test_missing_default_file_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_config_or_default("definitely-not-here.toml", false).unwrap();
        assert_eq!(config.recognizer.model, "en_core_web_lg");
        assert!(load_config_or_default("definitely-not-here.toml", true).is_err());
    }
}
