//! Miner configuration (YAML schema v1)
//!
//! ```yaml
//! version: 1
//! cache_root: /var/cache/bughunter
//! cache_enabled: true
//! detectors: [DeleteStatement, InsertStatement, ModifyStatement, WrapStatement]
//! pools: [guard, call-arg]
//! fix_filter:
//!   skip_header_fixes: true
//!   skip_multi_file_fixes: true
//! ```
//!
//! `detectors` and `pools` default to everything when omitted.

use super::error::{ConfigError, ConfigResult};
use crate::features::cache::CacheLayout;
use crate::features::donor_pool::PoolName;
use crate::features::repair_actions::ActionKind;
use crate::pipeline::{dependency_closure, DetectorDag};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SUPPORTED_VERSIONS: [u32; 1] = [1];

fn default_true() -> bool {
    true
}

/// Which fixes are skipped before any mining
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixFilter {
    /// Fixes touching a header file
    #[serde(default = "default_true")]
    pub skip_header_fixes: bool,

    /// Fixes touching more than one source file
    #[serde(default = "default_true")]
    pub skip_multi_file_fixes: bool,
}

impl Default for FixFilter {
    fn default() -> Self {
        Self {
            skip_header_fixes: true,
            skip_multi_file_fixes: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MinerConfig {
    /// Schema version (always 1 for v1)
    pub version: u32,

    /// Root of the `artefacts/` cache tree
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_root: Option<PathBuf>,

    /// Caches are used only when enabled and a root is set
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Enabled detector categories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detectors: Option<Vec<ActionKind>>,

    /// Donor pools to build
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pools: Option<Vec<PoolName>>,

    #[serde(default)]
    pub fix_filter: FixFilter,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            cache_root: None,
            cache_enabled: true,
            detectors: None,
            pools: None,
            fix_filter: FixFilter::default(),
        }
    }
}

impl MinerConfig {
    /// Load and validate a YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        if value.get("version").is_none() {
            return Err(ConfigError::MissingVersion);
        }

        let config: MinerConfig = serde_yaml::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn with_cache_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.cache_root = Some(root.into());
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        if let Some(detectors) = &self.detectors {
            if detectors.is_empty() {
                return Err(ConfigError::Validation(
                    "'detectors' must list at least one category; omit it to enable all".into(),
                ));
            }
            let missing: Vec<&str> = dependency_closure(detectors)
                .into_iter()
                .filter(|kind| !detectors.contains(kind))
                .map(|kind| kind.name())
                .collect();
            if !missing.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "'detectors' is missing prerequisite categories: {}",
                    missing.join(", ")
                )));
            }
            DetectorDag::build(detectors).map_err(|e| ConfigError::Validation(e.to_string()))?;
        }

        if let Some(pools) = &self.pools {
            if pools.is_empty() {
                return Err(ConfigError::Validation(
                    "'pools' must list at least one pool; omit it to build all".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn detector_kinds(&self) -> Vec<ActionKind> {
        self.detectors
            .clone()
            .unwrap_or_else(|| ActionKind::ALL.to_vec())
    }

    pub fn pool_names(&self) -> Vec<PoolName> {
        self.pools.clone().unwrap_or_else(|| PoolName::ALL.to_vec())
    }

    /// Cache layout, if caching is on
    pub fn cache_layout(&self) -> Option<CacheLayout> {
        match (&self.cache_root, self.cache_enabled) {
            (Some(root), true) => Some(CacheLayout::new(root.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_yaml_loading() {
        let yaml_content = r#"
version: 1
cache_root: /tmp/bughunter
detectors: [ModifyStatement, ModifyAssignment, ReplaceAssignmentRHS]
pools: [guard, call-arg]
fix_filter:
  skip_header_fixes: false
"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let config = MinerConfig::from_yaml(temp_file.path()).unwrap();
        assert_eq!(
            config.detector_kinds(),
            vec![
                ActionKind::ModifyStatement,
                ActionKind::ModifyAssignment,
                ActionKind::ReplaceAssignmentRhs
            ]
        );
        assert_eq!(config.pool_names(), vec![PoolName::Guard, PoolName::CallArg]);
        assert!(!config.fix_filter.skip_header_fixes);
        assert!(config.fix_filter.skip_multi_file_fixes);
        assert_eq!(
            config.cache_layout().map(|l| l.root().to_path_buf()),
            Some(PathBuf::from("/tmp/bughunter"))
        );
    }

    #[test]
    fn test_yaml_missing_version() {
        let result = MinerConfig::from_yaml_str("cache_enabled: false\n");
        assert!(matches!(result, Err(ConfigError::MissingVersion)));
    }

    #[test]
    fn test_unsupported_version() {
        let result = MinerConfig::from_yaml_str("version: 2\n");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = MinerConfig::from_yaml_str("version: 1\nthreads: 4\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_detector_subset_must_be_closed() {
        let result = MinerConfig::from_yaml_str("version: 1\ndetectors: [InsertCallArg]\n");
        match result {
            Err(ConfigError::Validation(msg)) => assert!(
                msg.ends_with("ModifyStatement, ModifyCall, ModifyCallArgs"),
                "{}",
                msg
            ),
            other => panic!("expected a validation error, got {:?}", other),
        }

        let closed = "version: 1\n\
                      detectors: [ModifyStatement, ModifyCall, ModifyCallArgs, InsertCallArg]\n";
        assert!(MinerConfig::from_yaml_str(closed).is_ok());

        let result = MinerConfig::from_yaml_str("version: 1\ndetectors: []\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_defaults_enable_everything() {
        let config = MinerConfig::from_yaml_str("version: 1\n").unwrap();
        assert_eq!(config, MinerConfig::default());
        assert_eq!(config.detector_kinds().len(), 25);
        assert_eq!(config.pool_names().len(), 13);
        assert!(config.cache_layout().is_none());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = MinerConfig {
            pools: Some(vec![PoolName::ForAfter]),
            ..MinerConfig::default()
        }
        .with_cache_root("/srv/cache");

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("for-after"));
        assert_eq!(MinerConfig::from_yaml_str(&yaml).unwrap(), config);
    }
}
