//! # Settings
//!
//! Interner limits and fragment filtering, loaded once per board from TOML:
//!
//! ```toml
//! [interner]
//! first_allocatable_id = 200
//! id_space_limit = 65536
//! max_constituents = 16
//!
//! [filter]
//! min_voxel_count = 1000
//! max_fragment_count = 500
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::ids::{MaskId, ID_SPACE_SIZE};
use crate::registry::RegistryFilter;

/// Limits of one mask interner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InternerConfig {
    /// First id composites may use. Must exceed every single-mask id.
    pub first_allocatable_id: u16,
    /// One past the last allocatable id. At most [`ID_SPACE_SIZE`].
    pub id_space_limit: u32,
    /// Largest constituent set a composite may represent. `None` is unbounded.
    pub max_constituents: Option<usize>,
}

impl Default for InternerConfig {
    fn default() -> Self {
        Self {
            first_allocatable_id: 1,
            id_space_limit: ID_SPACE_SIZE,
            max_constituents: None,
        }
    }
}

impl InternerConfig {
    /// Config allocating composites from `first` upward.
    #[must_use]
    pub fn starting_at(first: MaskId) -> Self {
        Self {
            first_allocatable_id: first.raw(),
            ..Self::default()
        }
    }

    /// Board defaults: full 16-bit id space, at most 16 overlapping masks per voxel.
    #[must_use]
    pub fn production() -> Self {
        Self {
            max_constituents: Some(16),
            ..Self::default()
        }
    }

    /// Checks the config for values the interner cannot honor.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.id_space_limit > ID_SPACE_SIZE {
            return Err(ConfigError::Invalid {
                field: "id_space_limit",
                reason: format!("{} exceeds the 16-bit id space ({ID_SPACE_SIZE})", self.id_space_limit),
            });
        }
        if self.first_allocatable_id == 0 {
            return Err(ConfigError::Invalid {
                field: "first_allocatable_id",
                reason: "id 0 is the empty voxel".to_string(),
            });
        }
        if u32::from(self.first_allocatable_id) >= self.id_space_limit {
            return Err(ConfigError::Invalid {
                field: "first_allocatable_id",
                reason: format!(
                    "{} leaves no room below id_space_limit {}",
                    self.first_allocatable_id, self.id_space_limit
                ),
            });
        }
        if let Some(max) = self.max_constituents {
            if max < 2 {
                return Err(ConfigError::Invalid {
                    field: "max_constituents",
                    reason: format!("{max} cannot hold a single overlap"),
                });
            }
        }
        Ok(())
    }
}

/// Full settings file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxmaskSettings {
    /// Interner limits.
    pub interner: InternerConfig,
    /// Fragment filter applied to the registry before scanning.
    pub filter: RegistryFilter,
}

impl VoxmaskSettings {
    /// Board defaults.
    #[must_use]
    pub fn production() -> Self {
        Self {
            interner: InternerConfig::production(),
            filter: RegistryFilter::NONE,
        }
    }

    /// Parses and validates settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.interner.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates a settings file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
