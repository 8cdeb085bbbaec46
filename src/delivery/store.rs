//! File-backed store delivery configuration at ~/.storefront/delivery.json.
//!
//! Every field is optional on disk so half-finished store setups still load.
//! Incomplete entries are reported as warnings, never rejected.

use super::types::{DeliveryConfig, DeliveryError, DeliveryMode};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Something a store owner probably still has to fill in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    BandMissingGeometry { area_id: String },
    BandMissingFee { area_id: String },
    BandsNotAscending { area_id: String },
    AreaMissingFee { area_id: String },
    /// The active mode has nothing configured.
    NoAreasForMode(DeliveryMode),
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BandMissingGeometry { area_id } => {
                write!(f, "band '{}' has no origin or radius and will never match", area_id)
            }
            Self::BandMissingFee { area_id } => {
                write!(f, "band '{}' has no fee and will never be quoted", area_id)
            }
            Self::BandsNotAscending { area_id } => write!(
                f,
                "band '{}' has a smaller radius than a band before it; first match in list order wins",
                area_id
            ),
            Self::AreaMissingFee { area_id } => {
                write!(f, "area '{}' has no fee and will never be quoted", area_id)
            }
            Self::NoAreasForMode(mode) => write!(f, "no delivery areas configured for {} mode", mode),
        }
    }
}

pub struct DeliveryConfigStore;

impl DeliveryConfigStore {
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".storefront")
            .join("delivery.json")
    }

    /// Load a configuration and log any warnings about it.
    pub fn load_from(path: &Path) -> Result<DeliveryConfig, DeliveryError> {
        let data = fs::read_to_string(path).map_err(|source| DeliveryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: DeliveryConfig = serde_json::from_str(&data).map_err(|source| DeliveryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        for warning in config_warnings(&config) {
            tracing::warn!(store = %config.store_id, "{}", warning);
        }
        tracing::debug!(
            path = %path.display(),
            mode = %config.mode,
            bands = config.bands.len(),
            named_areas = config.named_areas.len(),
            "loaded delivery configuration"
        );
        Ok(config)
    }

    pub fn save_to(path: &Path, config: &DeliveryConfig) -> Result<(), DeliveryError> {
        let io_err = |source: std::io::Error| DeliveryError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(config).map_err(|source| DeliveryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)
    }
}

/// Inspect a configuration for entries that can never produce a quote.
///
/// Bands are checked after store-origin inheritance.
pub fn config_warnings(config: &DeliveryConfig) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    let bands = config.effective_bands();
    let mut widest: Option<f64> = None;
    for band in &bands {
        if band.geometry().is_none() {
            warnings.push(ConfigWarning::BandMissingGeometry { area_id: band.area_id.clone() });
        }
        if band.fee_in_cents.is_none() {
            warnings.push(ConfigWarning::BandMissingFee { area_id: band.area_id.clone() });
        }
        if let Some((_, radius)) = band.geometry() {
            if widest.is_some_and(|w| radius < w) {
                warnings.push(ConfigWarning::BandsNotAscending { area_id: band.area_id.clone() });
            }
            widest = Some(widest.map_or(radius, |w| w.max(radius)));
        }
    }

    for area in &config.named_areas {
        if area.fee_in_cents.is_none() {
            warnings.push(ConfigWarning::AreaMissingFee { area_id: area.area_id.clone() });
        }
    }

    let empty = match config.mode {
        DeliveryMode::Radius => config.bands.is_empty(),
        DeliveryMode::Neighborhood => config.named_areas.is_empty(),
    };
    if empty {
        warnings.push(ConfigWarning::NoAreasForMode(config.mode));
    }

    warnings
}
