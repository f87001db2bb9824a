//! Engine configuration.
//!
//! Switches for the optional engine layers. Every switch defaults to on; turning
//! one off is meant for benchmarking a tier in isolation or for falling back to
//! the slowest, simplest behavior while debugging a game definition.

use serde::{Deserialize, Serialize};

/// Engine-wide feature switches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Try the bitboard sliding fast path (tier 1) before the other resolvers.
    pub sliding_fast_path: bool,

    /// Try the compiled pattern resolver (tier 2) before the legacy visitor.
    pub compiled_patterns: bool,

    /// Honor exclusivity groups during dispatch.
    /// When off, every entry compiles without a group.
    pub exclusivity_groups: bool,

    /// Record path resolution outcomes in the engine's metrics.
    pub path_metrics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sliding_fast_path: true,
            compiled_patterns: true,
            exclusivity_groups: true,
            path_metrics: true,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the legacy visitor resolves paths.
    #[must_use]
    pub fn legacy_only() -> Self {
        Self::default()
            .with_sliding_fast_path(false)
            .with_compiled_patterns(false)
    }

    #[must_use]
    pub fn with_sliding_fast_path(mut self, enabled: bool) -> Self {
        self.sliding_fast_path = enabled;
        self
    }

    #[must_use]
    pub fn with_compiled_patterns(mut self, enabled: bool) -> Self {
        self.compiled_patterns = enabled;
        self
    }

    #[must_use]
    pub fn with_exclusivity_groups(mut self, enabled: bool) -> Self {
        self.exclusivity_groups = enabled;
        self
    }

    #[must_use]
    pub fn with_path_metrics(mut self, enabled: bool) -> Self {
        self.path_metrics = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_everything() {
        let config = EngineConfig::default();
        assert!(config.sliding_fast_path);
        assert!(config.compiled_patterns);
        assert!(config.exclusivity_groups);
        assert!(config.path_metrics);
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::new()
            .with_exclusivity_groups(false)
            .with_path_metrics(false);
        assert!(!config.exclusivity_groups);
        assert!(!config.path_metrics);
        assert!(config.sliding_fast_path);

        let legacy = EngineConfig::legacy_only();
        assert!(!legacy.sliding_fast_path);
        assert!(!legacy.compiled_patterns);
    }

    #[test]
    fn test_serialization() {
        let config = EngineConfig::default().with_compiled_patterns(false);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
