use std::fs;
use std::path::Path;

use logiscan_engine::{
    AnalyzerOptions, Domain, DEFAULT_MAX_SAMPLES, DEFAULT_PREVIEW_LIMIT, DEFAULT_TRUTHY_EPSILON,
};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "logiscan.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogiscanConfig {
    pub default_min: f64,
    pub default_max: f64,
    pub default_step: f64,
    pub max_samples: usize,
    pub preview_limit: usize,
    pub truthy_epsilon: f64,
    pub strict_predicates: bool,
}

impl Default for LogiscanConfig {
    fn default() -> Self {
        Self {
            default_min: -10.0,
            default_max: 10.0,
            default_step: 1.0,
            max_samples: DEFAULT_MAX_SAMPLES,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            truthy_epsilon: DEFAULT_TRUTHY_EPSILON,
            strict_predicates: true,
        }
    }
}

impl LogiscanConfig {
    /// Load `path`, or `logiscan.toml` in the working directory.
    ///
    /// A missing default file is silent. Anything else that goes wrong is
    /// logged and the defaults are used.
    pub fn load(path: Option<&Path>) -> Self {
        let explicit = path.is_some();
        let path = path.unwrap_or_else(|| Path::new(CONFIG_FILE));
        if !explicit && !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), "loaded config");
                    config
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read config file, using defaults");
                Self::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn analyzer_options(&self) -> AnalyzerOptions {
        AnalyzerOptions {
            max_samples: self.max_samples,
            truthy_epsilon: self.truthy_epsilon,
            strict_predicates: self.strict_predicates,
        }
    }

    /// The configured domain with any command-line overrides applied.
    pub fn domain(&self, min: Option<f64>, max: Option<f64>, step: Option<f64>) -> Domain {
        Domain::new(
            min.unwrap_or(self.default_min),
            max.unwrap_or(self.default_max),
            step.unwrap_or(self.default_step),
        )
    }
}
