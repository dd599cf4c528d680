//! CLI configuration via environment variables
//!
//! SPROLA uses environment variables for optional configuration.
//! Command-line flags always take precedence over these values.

use std::env;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Default to JSON diagnostic output (SPROLA_DIAGNOSTICS=json)
    pub default_json: bool,
    /// Disable colored output (SPROLA_NO_COLOR=1 or NO_COLOR=1)
    pub no_color: bool,
    /// Entry function name (SPROLA_ENTRY=main)
    pub entry: Option<String>,
    /// Call depth limit (SPROLA_MAX_CALL_DEPTH=256)
    pub max_call_depth: Option<usize>,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_call_depth = lookup("SPROLA_MAX_CALL_DEPTH").and_then(|raw| {
            match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => Some(depth),
                _ => {
                    log::warn!("ignoring invalid SPROLA_MAX_CALL_DEPTH value '{}'", raw);
                    None
                }
            }
        });

        Self {
            default_json: lookup("SPROLA_DIAGNOSTICS")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
            no_color: lookup("SPROLA_NO_COLOR").is_some() || lookup("NO_COLOR").is_some(),
            entry: lookup("SPROLA_ENTRY").filter(|name| !name.trim().is_empty()),
            max_call_depth,
        }
    }
}
