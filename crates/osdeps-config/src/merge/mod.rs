//! Configuration layering, discovery and environment overrides
//!
//! Layers, lowest priority first:
//! 1. built-in ignore lists
//! 2. global config (`<config dir>/osdeps/config.toml`)
//! 3. project config (`--config` or the nearest `osdeps.toml`)
//! 4. `OSDEPS_IGNORE_<OS>` environment variables
//! 5. `--no-filter` on the command line

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use osdeps_core::error::OsdepsError;
use tracing::{debug, info};

use crate::{ignore::IgnoreList, toml::OsdepsToml, ConfigResult, ScanConfig};

/// File name searched for when no explicit config path is given
pub const PROJECT_CONFIG_FILE: &str = "osdeps.toml";

/// Prefix of environment variables that extend an OS ignore list
pub const ENV_IGNORE_PREFIX: &str = "OSDEPS_IGNORE_";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Directory to start project config discovery from
    cwd: Utf8PathBuf,
}

/// Configuration layering and merging
pub struct ConfigLayering;

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Built-in defaults only
    Defaults,
    /// Global config file
    Global(Utf8PathBuf),
    /// Project osdeps.toml file
    Project(Utf8PathBuf),
    /// Environment variable
    Environment(String),
    /// CLI flag
    CommandLine,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(cwd: Utf8PathBuf) -> Self {
        Self { cwd }
    }

    /// Build the effective configuration for one run
    pub fn load(
        &self,
        explicit: Option<&Utf8Path>,
        target_os: &str,
        no_filter: bool,
    ) -> ConfigResult<ScanConfig> {
        let global = self.load_global_config()?;
        let project = self.load_project_config(explicit)?;

        let mut sources = vec![ConfigSource::Defaults];
        if let Some((_, source)) = &global {
            sources.push(source.clone());
        }
        if let Some((_, source)) = &project {
            sources.push(source.clone());
        }

        let env_overrides = ConfigLayering::collect_env_overrides();
        sources.extend(env_overrides.keys().cloned().map(ConfigSource::Environment));
        if no_filter {
            sources.push(ConfigSource::CommandLine);
        }
        debug!("Configuration sources: {:?}", sources);

        Ok(ConfigLayering::merge_configs(
            global.map(|(config, _)| config),
            project.map(|(config, _)| config),
            &env_overrides,
            target_os,
            no_filter,
        ))
    }

    /// Load project configuration
    ///
    /// An explicit path must exist; otherwise the nearest osdeps.toml is used
    /// when one is found.
    pub fn load_project_config(
        &self,
        explicit: Option<&Utf8Path>,
    ) -> ConfigResult<Option<(OsdepsToml, ConfigSource)>> {
        let path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(OsdepsError::ConfigValidation {
                        field: "config".to_string(),
                        reason: format!("Config file {} does not exist", path),
                    });
                }
                path.to_path_buf()
            },
            None => match self.resolve_config_path(PROJECT_CONFIG_FILE) {
                Some(path) => path,
                None => return Ok(None),
            },
        };

        info!("Loading configuration from {}", path);
        let config = crate::toml::load_from_file(&path)?;
        Ok(Some((config, ConfigSource::Project(path))))
    }

    /// Find a configuration file (walks up the directory tree)
    pub fn resolve_config_path(&self, filename: &str) -> Option<Utf8PathBuf> {
        let mut current = Some(self.cwd.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(filename);
            if config_path.is_file() {
                return Some(config_path);
            }
            current = dir.parent();
        }

        None
    }

    /// Load global configuration
    pub fn load_global_config(&self) -> ConfigResult<Option<(OsdepsToml, ConfigSource)>> {
        let Some(config_dir) = dirs::config_dir() else {
            debug!("Could not determine config directory, skipping global config");
            return Ok(None);
        };

        let global_config_path = Utf8PathBuf::try_from(config_dir)
            .map_err(|e| OsdepsError::ConfigValidation {
                field: "config_dir".to_string(),
                reason: format!("Invalid config directory path: {}", e),
            })?
            .join("osdeps")
            .join("config.toml");

        if global_config_path.is_file() {
            let config = crate::toml::load_from_file(&global_config_path)?;
            Ok(Some((config, ConfigSource::Global(global_config_path))))
        } else {
            Ok(None)
        }
    }
}

impl ConfigLayering {
    /// Merge configuration layers on top of the built-in ignore lists
    pub fn merge_configs(
        global_config: Option<OsdepsToml>,
        project_config: Option<OsdepsToml>,
        env_overrides: &BTreeMap<String, String>,
        target_os: &str,
        no_filter: bool,
    ) -> ScanConfig {
        let mut ignore_lists = IgnoreList::defaults();

        for layer in [global_config, project_config].into_iter().flatten() {
            Self::apply_file_layer(&mut ignore_lists, layer);
        }

        Self::apply_env_overrides(&mut ignore_lists, env_overrides);

        // CLI flag overrides (highest priority)
        if no_filter {
            info!("Filtering disabled, clearing ignore list for '{}'", target_os);
            ignore_lists.clear(target_os);
        }

        ScanConfig { ignore_lists }
    }

    fn apply_file_layer(ignore_lists: &mut IgnoreList, layer: OsdepsToml) {
        for (os, entries) in layer.ignore_lists {
            if layer.replace_defaults {
                ignore_lists.replace(&os, entries);
            } else {
                ignore_lists.extend(&os, entries);
            }
        }
    }

    /// Apply `OSDEPS_IGNORE_<OS>` overrides (comma-separated, appended)
    fn apply_env_overrides(ignore_lists: &mut IgnoreList, overrides: &BTreeMap<String, String>) {
        for (key, value) in overrides {
            let Some(os) = key.strip_prefix(ENV_IGNORE_PREFIX) else {
                continue;
            };
            if os.is_empty() {
                continue;
            }

            let entries = value
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string);
            ignore_lists.extend(&os.to_ascii_lowercase(), entries);
        }
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> BTreeMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_IGNORE_PREFIX))
            .collect()
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Disabling filtering always leaves the active OS with an empty list,
        /// whatever the lower layers contributed.
        #[test]
        fn no_filter_always_empties_active_list(
            entries in prop::collection::vec("[a-z]{1,8}\\.so(\\.[0-9])?", 0..10),
            replace in any::<bool>(),
        ) {
            let project = OsdepsToml {
                replace_defaults: replace,
                ignore_lists: BTreeMap::from([("linux".to_string(), entries)]),
            };
            let config = ConfigLayering::merge_configs(
                None,
                Some(project),
                &BTreeMap::new(),
                "linux",
                true,
            );
            prop_assert_eq!(config.ignore_lists.for_os("linux").map(|s| s.len()), Some(0));
        }
    }
}
