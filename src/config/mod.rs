//! Checker parameters and configuration file loading.
//!
//! [`Parameters`] is the one statically enumerated set of options driving
//! every checker. It is read from a `.transcheck.json` file (camelCase keys,
//! every key optional) and stored in sessions as a flat parameter string
//! (see [`Parameters::to_flat_string`]).

mod flat;
mod patterns;

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

pub use patterns::{PatternItem, SAME, default_patterns};

use crate::charset::Charset;
use crate::error::ConfigError;

pub const CONFIG_FILE_NAME: &str = ".transcheck.json";

/// Placeholder for the project root in path-like parameters.
pub const ROOT_DIR_VAR: &str = "${rootDir}";

// ============================================================
// Value types
// ============================================================

/// Which text units are checked, based on the target approval state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scope {
    #[default]
    All,
    ApprovedOnly,
    NotApprovedOnly,
}

impl Scope {
    pub fn index(self) -> i32 {
        match self {
            Scope::All => 0,
            Scope::ApprovedOnly => 1,
            Scope::NotApprovedOnly => 2,
        }
    }

    pub fn from_index(index: i32) -> Self {
        match index {
            1 => Scope::ApprovedOnly,
            2 => Scope::NotApprovedOnly,
            _ => Scope::All,
        }
    }
}

/// Report file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    #[default]
    Html,
    Tab,
    Xml,
}

impl OutputType {
    pub fn index(self) -> i32 {
        match self {
            OutputType::Html => 0,
            OutputType::Tab => 1,
            OutputType::Xml => 2,
        }
    }

    pub fn from_index(index: i32) -> Self {
        match index {
            1 => OutputType::Tab,
            2 => OutputType::Xml,
            _ => OutputType::Html,
        }
    }
}

/// A parameter holding the path of an external reference file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferencePath(String);

impl ReferencePath {
    pub fn new(path: &str) -> Self {
        Self(path.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The path with `${rootDir}` expanded.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        PathBuf::from(expand_root_dir(&self.0, root))
    }
}

/// Replaces `${rootDir}` with `root`.
pub fn expand_root_dir(value: &str, root: &Path) -> String {
    value.replace(ROOT_DIR_VAR, &root.to_string_lossy())
}

// ============================================================
// Parameters
// ============================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default)]
    pub output_type: OutputType,
    #[serde(default = "default_true")]
    pub auto_open: bool,

    #[serde(default = "default_true", rename = "leadingWS")]
    pub leading_ws: bool,
    #[serde(default = "default_true", rename = "trailingWS")]
    pub trailing_ws: bool,
    #[serde(default = "default_true")]
    pub empty_target: bool,
    #[serde(default = "default_true")]
    pub empty_source: bool,
    #[serde(default = "default_true")]
    pub target_same_as_source: bool,
    #[serde(default = "default_true")]
    pub target_same_as_source_for_same_language: bool,
    #[serde(default = "default_true")]
    pub target_same_as_source_with_codes: bool,
    #[serde(default = "default_true")]
    pub doubled_word: bool,
    #[serde(default = "default_doubled_word_exceptions")]
    pub doubled_word_exceptions: String,

    #[serde(default = "default_true")]
    pub code_difference: bool,
    #[serde(default = "default_true")]
    pub guess_open_close: bool,
    #[serde(default = "default_types_to_ignore")]
    pub types_to_ignore: String,
    #[serde(default)]
    pub extra_codes_allowed: Vec<String>,
    #[serde(default)]
    pub missing_codes_allowed: Vec<String>,

    #[serde(default = "default_true")]
    pub check_patterns: bool,
    #[serde(default = "default_patterns")]
    pub patterns: Vec<PatternItem>,

    #[serde(default = "default_true")]
    pub corrupted_characters: bool,
    #[serde(default = "default_true")]
    pub check_allowed_characters: bool,
    #[serde(default)]
    pub check_characters: bool,
    #[serde(default = "default_charset")]
    pub charset: String,
    #[serde(default)]
    pub extra_chars_allowed: String,

    #[serde(default = "default_true")]
    pub check_max_char_length: bool,
    #[serde(default = "default_length_break")]
    pub max_char_length_break: usize,
    #[serde(default = "default_max_char_length_above")]
    pub max_char_length_above: usize,
    #[serde(default = "default_max_char_length_below")]
    pub max_char_length_below: usize,
    #[serde(default = "default_true")]
    pub check_min_char_length: bool,
    #[serde(default = "default_length_break")]
    pub min_char_length_break: usize,
    #[serde(default = "default_min_char_length_above")]
    pub min_char_length_above: usize,
    #[serde(default = "default_min_char_length_below")]
    pub min_char_length_below: usize,
    #[serde(default)]
    pub check_absolute_max_char_length: bool,
    #[serde(default = "default_absolute_max_char_length")]
    pub absolute_max_char_length: usize,
    #[serde(default = "default_true")]
    pub check_storage_size: bool,

    #[serde(default)]
    pub check_localizables: bool,

    #[serde(default)]
    pub scope: Scope,

    #[serde(default)]
    pub check_terms: bool,
    #[serde(default)]
    pub terms_path: ReferencePath,
    #[serde(default)]
    pub string_mode: bool,
    #[serde(default)]
    pub between_codes: bool,

    #[serde(default)]
    pub check_blacklist: bool,
    #[serde(default)]
    pub blacklist_path: ReferencePath,
    #[serde(default)]
    pub allow_blacklist_sub: bool,
    #[serde(default)]
    pub blacklist_src: bool,

    #[serde(default, rename = "checkWithLT")]
    pub check_with_lt: bool,
    #[serde(default = "default_server_url", rename = "serverURL")]
    pub server_url: String,
    #[serde(default)]
    pub lt_bilingual_mode: bool,
    #[serde(default)]
    pub lt_username: String,
    #[serde(default)]
    pub lt_api_key: String,

    #[serde(default = "default_true")]
    pub save_session: bool,
    #[serde(default = "default_session_path")]
    pub session_path: String,
    #[serde(default = "default_true")]
    pub show_full_path: bool,
}

fn default_true() -> bool {
    true
}

fn default_output_path() -> String {
    format!("{}/qa-report.html", ROOT_DIR_VAR)
}

fn default_session_path() -> String {
    format!("{}/qa-session.qcs", ROOT_DIR_VAR)
}

fn default_doubled_word_exceptions() -> String {
    "sie;vous;nous".to_string()
}

fn default_types_to_ignore() -> String {
    "mrk;x-df-s;".to_string()
}

fn default_charset() -> String {
    "ISO-8859-1".to_string()
}

fn default_length_break() -> usize {
    20
}

fn default_max_char_length_above() -> usize {
    200
}

fn default_max_char_length_below() -> usize {
    350
}

fn default_min_char_length_above() -> usize {
    45
}

fn default_min_char_length_below() -> usize {
    30
}

fn default_absolute_max_char_length() -> usize {
    255
}

fn default_server_url() -> String {
    "http://localhost:8081/".to_string()
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            output_type: OutputType::Html,
            auto_open: true,
            leading_ws: true,
            trailing_ws: true,
            empty_target: true,
            empty_source: true,
            target_same_as_source: true,
            target_same_as_source_for_same_language: true,
            target_same_as_source_with_codes: true,
            doubled_word: true,
            doubled_word_exceptions: default_doubled_word_exceptions(),
            code_difference: true,
            guess_open_close: true,
            types_to_ignore: default_types_to_ignore(),
            extra_codes_allowed: Vec::new(),
            missing_codes_allowed: Vec::new(),
            check_patterns: true,
            patterns: default_patterns(),
            corrupted_characters: true,
            check_allowed_characters: true,
            check_characters: false,
            charset: default_charset(),
            extra_chars_allowed: String::new(),
            check_max_char_length: true,
            max_char_length_break: default_length_break(),
            max_char_length_above: default_max_char_length_above(),
            max_char_length_below: default_max_char_length_below(),
            check_min_char_length: true,
            min_char_length_break: default_length_break(),
            min_char_length_above: default_min_char_length_above(),
            min_char_length_below: default_min_char_length_below(),
            check_absolute_max_char_length: false,
            absolute_max_char_length: default_absolute_max_char_length(),
            check_storage_size: true,
            check_localizables: false,
            scope: Scope::All,
            check_terms: false,
            terms_path: ReferencePath::default(),
            string_mode: false,
            between_codes: false,
            check_blacklist: false,
            blacklist_path: ReferencePath::default(),
            allow_blacklist_sub: false,
            blacklist_src: false,
            check_with_lt: false,
            server_url: default_server_url(),
            lt_bilingual_mode: false,
            lt_username: String::new(),
            lt_api_key: String::new(),
            save_session: true,
            session_path: default_session_path(),
            show_full_path: true,
        }
    }
}

impl Parameters {
    /// Validate configuration values.
    ///
    /// Returns an error for regexes that do not compile, an unknown charset,
    /// or a missing reference file path for an enabled reference check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.check_characters {
            if !self.charset.trim().is_empty() {
                Charset::for_name(&self.charset)?;
            }
            if !self.extra_chars_allowed.is_empty() {
                compile_regex(&self.extra_chars_allowed, "'extraCharsAllowed'")?;
            }
        }

        if self.check_patterns {
            for (index, item) in self.patterns.iter().enumerate() {
                if item.source_is_same() && item.target_is_same() {
                    return Err(ConfigError::InvalidValue {
                        key: format!("patterns[{}]", index),
                        message: "source and target cannot both be <same>".to_string(),
                    });
                }
                for side in [item.source.as_str(), item.target.as_str()] {
                    if side != SAME {
                        compile_fancy_regex(side, &format!("pattern '{}'", item.description))?;
                    }
                }
            }
        }

        for (key, path) in self.reference_paths() {
            if path.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "a file path is required when the check is enabled".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Reference file parameters whose checks are enabled.
    pub fn reference_paths(&self) -> Vec<(&'static str, &ReferencePath)> {
        let mut paths = Vec::new();
        if self.check_terms {
            paths.push(("termsPath", &self.terms_path));
        }
        if self.check_blacklist {
            paths.push(("blacklistPath", &self.blacklist_path));
        }
        paths
    }
}

/// Compiles a regex with the plain engine, mapping errors to [`ConfigError`].
pub fn compile_regex(pattern: &str, context: &str) -> Result<regex::Regex, ConfigError> {
    regex::Regex::new(pattern).map_err(|e| ConfigError::InvalidRegex {
        context: context.to_string(),
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Compiles a regex that may use backreferences or look-around.
pub fn compile_fancy_regex(pattern: &str, context: &str) -> Result<fancy_regex::Regex, ConfigError> {
    fancy_regex::Regex::new(pattern).map_err(|e| ConfigError::InvalidRegex {
        context: context.to_string(),
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

// ============================================================
// Configuration files
// ============================================================

pub fn default_config_json() -> anyhow::Result<String> {
    use anyhow::Context;

    let parameters = Parameters::default();
    serde_json::to_string_pretty(&parameters).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub parameters: Parameters,
    /// True if parameters were loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> anyhow::Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => Ok(ConfigLoadResult {
            parameters: load_config_file(&path)?,
            from_file: true,
        }),
        None => Ok(ConfigLoadResult {
            parameters: Parameters::default(),
            from_file: false,
        }),
    }
}

pub fn load_config_file(path: &Path) -> anyhow::Result<Parameters> {
    use anyhow::Context;

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    let parameters: Parameters = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;
    parameters
        .validate()
        .with_context(|| format!("Invalid config file: {:?}", path))?;
    Ok(parameters)
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::issues::DisplaySeverity;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_parameters() {
        let params = Parameters::default();
        assert!(params.leading_ws);
        assert!(!params.check_characters);
        assert_eq!(params.charset, "ISO-8859-1");
        assert_eq!(params.patterns.len(), 8);
        assert_eq!(params.types_to_ignore, "mrk;x-df-s;");
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "leadingWS": false,
              "serverURL": "http://lt:8010/",
              "scope": "approvedOnly",
              "outputType": "xml",
              "maxCharLengthBreak": 9
          }"#;
        let params: Parameters = serde_json::from_str(json).unwrap();
        assert!(!params.leading_ws);
        assert_eq!(params.server_url, "http://lt:8010/");
        assert_eq!(params.scope, Scope::ApprovedOnly);
        assert_eq!(params.output_type, OutputType::Xml);
        assert_eq!(params.max_char_length_break, 9);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let params: Parameters = serde_json::from_str(r#"{ "doubledWord": false }"#).unwrap();
        assert!(!params.doubled_word);
        assert_eq!(params.patterns, default_patterns());
        assert_eq!(params.max_char_length_below, 350);
    }

    #[test]
    fn test_custom_patterns() {
        let json = r#"{ "patterns": [ { "source": "\\d+", "target": "<same>", "severity": "high" } ] }"#;
        let params: Parameters = serde_json::from_str(json).unwrap();
        assert_eq!(params.patterns.len(), 1);
        assert!(params.patterns[0].from_source);
        assert!(params.patterns[0].enabled);
        assert_eq!(params.patterns[0].severity, DisplaySeverity::High);
    }

    #[test]
    fn test_validate_invalid_pattern() {
        let params = Parameters {
            patterns: vec![PatternItem::new("[unclosed", SAME, true, DisplaySeverity::Low, "bad")],
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("[unclosed"));
    }

    #[test]
    fn test_validate_unknown_charset() {
        let params = Parameters {
            check_characters: true,
            charset: "klingon-8".to_string(),
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(ConfigError::UnknownCharset(_))));
    }

    #[test]
    fn test_validate_requires_reference_path() {
        let params = Parameters {
            check_terms: true,
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("termsPath"));
    }

    #[test]
    fn test_reference_path_resolve() {
        let path = ReferencePath::new("${rootDir}/terms.tsv");
        assert_eq!(path.resolve(Path::new("/work")), PathBuf::from("/work/terms.tsv"));
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("docs").join("fr");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        assert_eq!(find_config_file(&sub_dir), Some(config_path));
    }

    #[test]
    fn test_find_config_stops_at_git_root() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        assert!(find_config_file(dir.path()).is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "emptyTarget": false }"#,
        )
        .unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(result.from_file);
        assert!(!result.parameters.empty_target);
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file);
        assert_eq!(result.parameters, Parameters::default());
    }

    #[test]
    fn test_load_config_with_invalid_pattern_fails() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "patterns": [ { "source": "(", "target": "<same>" } ] }"#,
        )
        .unwrap();

        assert!(load_config(dir.path()).is_err());
    }

    #[test]
    fn test_default_config_json_uses_wire_names() {
        let json = default_config_json().unwrap();
        assert!(json.contains("\"leadingWS\""));
        assert!(json.contains("\"serverURL\""));
        assert!(json.contains("\"checkWithLT\""));
        let parsed: Parameters = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Parameters::default());
    }
}
