//! Named agent profiles: bundles of seat-policy parameters.
//! Loaded from TOML at runtime for the CLIs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::games::avalon::agents::AgentParams;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("profile '{name}' not found (available: {available:?})")]
    NotFound { name: String, available: Vec<String> },

    #[error("profile '{name}': {field} must be within [0, 1], got {value}")]
    OutOfRange {
        name: String,
        field: &'static str,
        value: f64,
    },

    #[error("profile '{name}': unknown strategy type '{strategy_type}'")]
    UnknownStrategy { name: String, strategy_type: String },
}

/// A named agent profile. Unset fields fall back to `AgentParams::default()`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AgentProfile {
    pub description: Option<String>,
    #[serde(default = "default_strategy_type")]
    pub strategy_type: String,

    pub approve_probability: Option<f64>,
    pub evil_fail_probability: Option<f64>,
    pub good_fail_probability: Option<f64>,
    pub assassin_uses_knowledge: Option<bool>,
}

fn default_strategy_type() -> String {
    "random".into()
}

/// Which profile the CLIs use when none is named.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DefaultsConfig {
    pub profile: Option<String>,
}

/// Top-level TOML file structure.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProfilesFile {
    #[serde(default)]
    pub profiles: HashMap<String, AgentProfile>,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl AgentProfile {
    /// Convert to AgentParams, using defaults for any unspecified fields.
    pub fn to_agent_params(&self, name: &str) -> Result<AgentParams, ProfileError> {
        if self.strategy_type != "random" {
            return Err(ProfileError::UnknownStrategy {
                name: name.to_string(),
                strategy_type: self.strategy_type.clone(),
            });
        }

        let d = AgentParams::default();
        let params = AgentParams {
            approve_probability: self.approve_probability.unwrap_or(d.approve_probability),
            evil_fail_probability: self.evil_fail_probability.unwrap_or(d.evil_fail_probability),
            good_fail_probability: self.good_fail_probability.unwrap_or(d.good_fail_probability),
            assassin_uses_knowledge: self.assassin_uses_knowledge.unwrap_or(d.assassin_uses_knowledge),
        };

        for (field, value) in [
            ("approve_probability", params.approve_probability),
            ("evil_fail_probability", params.evil_fail_probability),
            ("good_fail_probability", params.good_fail_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ProfileError::OutOfRange {
                    name: name.to_string(),
                    field,
                    value,
                });
            }
        }
        Ok(params)
    }
}

impl ProfilesFile {
    /// Resolve a profile by name, or the configured default when `name` is `None`.
    /// With neither, built-in parameters are used.
    pub fn resolve(&self, name: Option<&str>) -> Result<(String, AgentParams), ProfileError> {
        let Some(name) = name.or(self.defaults.profile.as_deref()) else {
            return Ok(("default".to_string(), AgentParams::default()));
        };
        let profile = self.profiles.get(name).ok_or_else(|| {
            let mut available: Vec<String> = self.profiles.keys().cloned().collect();
            available.sort();
            ProfileError::NotFound {
                name: name.to_string(),
                available,
            }
        })?;
        Ok((name.to_string(), profile.to_agent_params(name)?))
    }
}

/// Load profiles from a TOML file at the given path.
pub fn load_profiles(path: &Path) -> Result<ProfilesFile, ProfileError> {
    let content = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ProfileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Try to load profiles from well-known paths, returning a default if none found.
pub fn load_default_profiles() -> ProfilesFile {
    let candidates = [
        "agent_profiles.toml",
        "../agent_profiles.toml",
        "/etc/avalon/agent_profiles.toml",
    ];
    for path in &candidates {
        let p = Path::new(path);
        if p.exists() {
            match load_profiles(p) {
                Ok(profiles) => {
                    tracing::info!(path = %p.display(), count = profiles.profiles.len(), "loaded agent profiles");
                    return profiles;
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "failed to load agent profiles");
                }
            }
        }
    }
    tracing::info!("no agent_profiles.toml found, using built-in defaults");
    ProfilesFile::default()
}
