/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::path::Path;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Configuration for the mediator
///
/// Loaded from TOML files in XDG-compliant directories. Every section and field is
/// optional; missing values take their defaults.
///
/// ```toml
/// [behavior]
/// log_dispatch_failures = true
/// trace_pipeline = false
///
/// [limits]
/// initial_handler_capacity = 64
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediatorConfig {
    /// Behavioral configuration switches
    pub behavior: BehaviorConfig,
    /// Registry pre-allocation
    pub limits: LimitsConfig,
}

/// Behavioral configuration switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Emit an `error!` through the context logger when a request has no handler or
    /// is sent with the wrong response type
    pub log_dispatch_failures: bool,
    /// Emit a `trace!` for every pipeline stage and every event listener
    pub trace_pipeline: bool,
}

/// Registry pre-allocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Initial capacity of the handler registry
    pub initial_handler_capacity: usize,
    /// Initial capacity of the behaviour list
    pub initial_behaviour_capacity: usize,
    /// Initial capacity of the event registry, in distinct event types
    pub initial_event_type_capacity: usize,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            log_dispatch_failures: true,
            trace_pipeline: true,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            initial_handler_capacity: 16,
            initial_behaviour_capacity: 8,
            initial_event_type_capacity: 16,
        }
    }
}

impl MediatorConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if `text` is not valid TOML or a field has the wrong type.
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from XDG-compliant locations
    ///
    /// Looks for `acton-mediator/config.toml` under `$XDG_CONFIG_HOME` and then the
    /// `$XDG_CONFIG_DIRS` search path.
    ///
    /// If no configuration file is found, returns the default configuration.
    /// If a configuration file exists but is malformed, logs an error and uses defaults.
    #[must_use]
    pub fn load() -> Self {
        let xdg_dirs = match xdg::BaseDirectories::with_prefix("acton-mediator") {
            Ok(dirs) => dirs,
            Err(e) => {
                error!("Failed to initialize XDG directories: {}", e);
                return Self::default();
            }
        };

        match xdg_dirs.find_config_file("config.toml") {
            Some(path) => Self::load_from(path),
            None => {
                info!("No configuration file found, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit file, falling back to defaults on error.
    #[must_use]
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to read configuration file {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match Self::from_toml_str(&text) {
            Ok(config) => {
                info!("Successfully loaded configuration");
                config
            }
            Err(e) => {
                error!("Failed to parse configuration file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

lazy_static! {
    /// Global configuration instance loaded from XDG-compliant locations
    pub static ref CONFIG: MediatorConfig = MediatorConfig::load();
}
