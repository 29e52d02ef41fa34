// src/config.rs
//! `codesense.toml` configuration.

use crate::error::{CodesenseError, Result};
use crate::orchestrator::{SuggestOptions, DEFAULT_MAX_SUGGESTIONS, DEFAULT_MIN_CONFIDENCE};
use crate::syntax::{BuildOptions, Dialect, GrammarFeature, ModuleMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "codesense.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestConfig {
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
            min_confidence: default_min_confidence(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseConfig {
    /// Omitted means inferred from the source text.
    #[serde(default)]
    pub dialect: Option<Dialect>,
    #[serde(default)]
    pub module_mode: ModuleMode,
    #[serde(default)]
    pub features: Vec<GrammarFeature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Directory names skipped while walking.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude: default_exclude(),
        }
    }
}

const fn default_max_suggestions() -> usize {
    DEFAULT_MAX_SUGGESTIONS
}

const fn default_min_confidence() -> f64 {
    DEFAULT_MIN_CONFIDENCE
}

fn default_extensions() -> Vec<String> {
    ["ts", "tsx", "js", "jsx", "mjs", "cjs"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

fn default_exclude() -> Vec<String> {
    ["node_modules", "dist", "build", ".git", "target"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub suggest: SuggestConfig,
    #[serde(default)]
    pub parse: ParseConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
}

impl Config {
    /// Reads `codesense.toml` from the working directory. A missing file
    /// means defaults; an unreadable one is logged and also means defaults.
    #[must_use]
    pub fn load() -> Self {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring {CONFIG_FILE}");
                Self::default()
            }
        }
    }

    /// Reads a config file.
    ///
    /// # Errors
    /// Returns `CodesenseError::Io` if the file cannot be read and
    /// `CodesenseError::Config` if it is not valid TOML for this schema.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| CodesenseError::Io {
            source,
            path: path.to_path_buf(),
        })?;
        Self::parse(&content).map_err(|e| CodesenseError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parses config text.
    ///
    /// # Errors
    /// Returns `CodesenseError::Toml` for malformed TOML and
    /// `CodesenseError::Setting` when `min_confidence` is outside `[0, 1]`.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        if !(0.0..=1.0).contains(&config.suggest.min_confidence) {
            return Err(CodesenseError::Setting {
                key: "min_confidence",
                message: format!(
                    "must be between 0 and 1, got {}",
                    config.suggest.min_confidence
                ),
            });
        }
        Ok(config)
    }

    #[must_use]
    pub fn build_options(&self) -> BuildOptions {
        let mut options = BuildOptions::default().with_module_mode(self.parse.module_mode);
        if let Some(dialect) = self.parse.dialect {
            options = options.with_dialect(dialect);
        }
        for feature in &self.parse.features {
            options = options.with_feature(*feature);
        }
        options
    }

    #[must_use]
    pub fn suggest_options(&self) -> SuggestOptions {
        SuggestOptions {
            max_suggestions: self.suggest.max_suggestions,
            min_confidence: self.suggest.min_confidence,
            build: self.build_options(),
            ..SuggestOptions::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.suggest.max_suggestions, 5);
        assert!(config.corpus.exclude.contains(&"node_modules".to_string()));
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::parse(
            "[suggest]\nmax_suggestions = 10\n\n[parse]\ndialect = \"untyped\"\nmodule_mode = \"script\"\nfeatures = [\"jsx\"]\n",
        )
        .unwrap();
        assert_eq!(config.suggest.max_suggestions, 10);
        assert!((config.suggest.min_confidence - 0.5).abs() < f64::EPSILON);

        let build = config.build_options();
        assert_eq!(build.dialect, Some(Dialect::Untyped));
        assert_eq!(build.module_mode, ModuleMode::Script);
        assert!(build.has_feature(GrammarFeature::Jsx));
    }

    #[test]
    fn rejects_out_of_range_confidence() {
        let err = Config::parse("[suggest]\nmin_confidence = 1.5\n").unwrap_err();
        assert!(matches!(
            err,
            CodesenseError::Setting {
                key: "min_confidence",
                ..
            }
        ));
    }

    #[test]
    fn rejects_unknown_dialect() {
        let err = Config::parse("[parse]\ndialect = \"rust\"\n").unwrap_err();
        assert!(matches!(err, CodesenseError::Toml(_)));
    }
}
