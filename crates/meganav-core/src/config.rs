#![forbid(unsafe_code)]

//! Navigation configuration.
//!
//! # Env Var Contract
//!
//! - `MEGANAV_DESKTOP_MIN_WIDTH` - desktop media query threshold in px (default 900)
//! - `MEGANAV_PANEL_PREFIX` - prefix for generated panel ids (default `thirdMenu-`)
//! - `MEGANAV_OPEN_LABEL` - hamburger `aria-label` while collapsed
//! - `MEGANAV_CLOSE_LABEL` - hamburger `aria-label` while expanded
//!
//! The panel prefix must not contain whitespace or start with a reserved
//! node-id prefix (`nav-section-`, `nav-link-`, `nav-hamburger`).
//!
//! Invalid values fail open: the default is kept and the problem is reported
//! (and logged when the `tracing` feature is on).

use std::env;
use std::fmt;

/// Default desktop threshold, matching `(min-width: 900px)`.
pub const DEFAULT_DESKTOP_MIN_WIDTH: u32 = 900;
/// Default prefix for generated third-level panel ids.
pub const DEFAULT_PANEL_ID_PREFIX: &str = "thirdMenu-";
/// Node-id prefixes generated for other nav elements.
const RESERVED_ID_PREFIXES: [&str; 3] = ["nav-section-", "nav-link-", "nav-hamburger"];

/// Configuration for building and driving a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavConfig {
    /// Viewport width (px) at and above which the desktop layout applies.
    pub desktop_min_width: u32,
    /// Prefix for panel ids; the 1-based sequence number is appended.
    pub panel_id_prefix: String,
    /// Hamburger label while the mobile nav is collapsed.
    pub open_label: String,
    /// Hamburger label while the mobile nav is expanded.
    pub close_label: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            desktop_min_width: DEFAULT_DESKTOP_MIN_WIDTH,
            panel_id_prefix: DEFAULT_PANEL_ID_PREFIX.to_string(),
            open_label: "Open navigation".to_string(),
            close_label: "Close navigation".to_string(),
        }
    }
}

/// A rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The value could not be parsed for the named variable.
    Invalid {
        /// Environment variable name.
        var: &'static str,
        /// The offending value.
        value: String,
    },
    /// The value was present but empty.
    Empty(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { var, value } => write!(f, "invalid value for {var}: {value:?}"),
            Self::Empty(var) => write!(f, "{var} is set but empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl NavConfig {
    /// Read configuration from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let (config, _) = Self::from_lookup(|key| env::var(key).ok());
        config
    }

    /// Read configuration through `lookup`, returning any rejected values.
    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<ConfigError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut errors = Vec::new();

        if let Some(raw) = lookup("MEGANAV_DESKTOP_MIN_WIDTH") {
            match raw.trim().parse::<u32>() {
                Ok(width) if width > 0 => config.desktop_min_width = width,
                _ => errors.push(ConfigError::Invalid {
                    var: "MEGANAV_DESKTOP_MIN_WIDTH",
                    value: raw,
                }),
            }
        }
        let mut prefix = config.panel_id_prefix.clone();
        read_label(&lookup, "MEGANAV_PANEL_PREFIX", &mut prefix, &mut errors);
        if is_valid_panel_prefix(&prefix) {
            config.panel_id_prefix = prefix;
        } else {
            errors.push(ConfigError::Invalid {
                var: "MEGANAV_PANEL_PREFIX",
                value: prefix,
            });
        }
        read_label(&lookup, "MEGANAV_OPEN_LABEL", &mut config.open_label, &mut errors);
        read_label(&lookup, "MEGANAV_CLOSE_LABEL", &mut config.close_label, &mut errors);

        #[cfg(feature = "tracing")]
        for error in &errors {
            tracing::warn!(%error, "ignoring navigation config value");
        }

        (config, errors)
    }

    /// Panel id for the `n`-th panel of a render (1-based).
    #[must_use]
    pub fn panel_id(&self, n: usize) -> String {
        format!("{}{n}", self.panel_id_prefix)
    }
}

fn is_valid_panel_prefix(prefix: &str) -> bool {
    !prefix.chars().any(char::is_whitespace)
        && !RESERVED_ID_PREFIXES.iter().any(|reserved| prefix.starts_with(reserved))
}

fn read_label<F>(lookup: &F, var: &'static str, slot: &mut String, errors: &mut Vec<ConfigError>)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(var) {
        if raw.trim().is_empty() {
            errors.push(ConfigError::Empty(var));
        } else {
            *slot = raw;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = NavConfig::default();
        assert_eq!(config.desktop_min_width, 900);
        assert_eq!(config.panel_id(1), "thirdMenu-1");
        assert_eq!(config.open_label, "Open navigation");
    }

    #[test]
    fn env_overrides_apply() {
        let (config, errors) = NavConfig::from_lookup(lookup(&[
            ("MEGANAV_DESKTOP_MIN_WIDTH", "1024"),
            ("MEGANAV_PANEL_PREFIX", "panel-"),
        ]));
        assert!(errors.is_empty());
        assert_eq!(config.desktop_min_width, 1024);
        assert_eq!(config.panel_id(3), "panel-3");
    }

    #[test]
    fn invalid_values_fail_open() {
        let (config, errors) = NavConfig::from_lookup(lookup(&[
            ("MEGANAV_DESKTOP_MIN_WIDTH", "wide"),
            ("MEGANAV_OPEN_LABEL", "  "),
        ]));
        assert_eq!(config, NavConfig::default());
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1], ConfigError::Empty("MEGANAV_OPEN_LABEL"));
        assert!(errors[0].to_string().contains("MEGANAV_DESKTOP_MIN_WIDTH"));
    }

    #[test]
    fn zero_width_is_rejected() {
        let (config, errors) =
            NavConfig::from_lookup(lookup(&[("MEGANAV_DESKTOP_MIN_WIDTH", "0")]));
        assert_eq!(config.desktop_min_width, DEFAULT_DESKTOP_MIN_WIDTH);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn reserved_or_spaced_prefixes_are_rejected() {
        for bad in ["nav-section-", "nav-link-x", "nav-hamburger", "third menu-"] {
            let (config, errors) = NavConfig::from_lookup(lookup(&[("MEGANAV_PANEL_PREFIX", bad)]));
            assert_eq!(config.panel_id_prefix, DEFAULT_PANEL_ID_PREFIX, "{bad}");
            assert_eq!(
                errors,
                vec![ConfigError::Invalid {
                    var: "MEGANAV_PANEL_PREFIX",
                    value: bad.to_string(),
                }]
            );
        }
        let (config, errors) = NavConfig::from_lookup(lookup(&[("MEGANAV_PANEL_PREFIX", "nav-panel-")]));
        assert!(errors.is_empty());
        assert_eq!(config.panel_id(2), "nav-panel-2");
    }

    #[test]
    fn from_env_reads_process_environment() {
        // Only reads; the variables may or may not be set in the test process.
        let (expected, _) = NavConfig::from_lookup(|key| env::var(key).ok());
        assert_eq!(NavConfig::from_env(), expected);
    }
}
