//! Runtime configuration.
//!
//! [`Settings`] is read once from the environment at startup.
//! [`RepairExtras`] holds the flat fees added on top of a repair
//! bundle; the catalog directory may override them via `extras.json`.

use crate::error::ConfigError;
use crate::models::{CourierTier, DeliveryMethod, RepairParams};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const CATALOG_DIR_VAR: &str = "QUOTE_CATALOG_DIR";
pub const BIND_ADDR_VAR: &str = "QUOTE_BIND_ADDR";

const DEFAULT_CATALOG_DIR: &str = "catalog";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding one price catalog JSON file per device.
    pub catalog_dir: PathBuf,
    pub bind_addr: SocketAddr,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let catalog_dir = lookup(CATALOG_DIR_VAR).unwrap_or_else(|| DEFAULT_CATALOG_DIR.to_string());
        let addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = addr
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr { value: addr, source })?;
        Ok(Settings {
            catalog_dir: PathBuf::from(catalog_dir),
            bind_addr,
        })
    }
}

/// Flat fees added after the bundle discount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RepairExtras {
    /// Hydrogel screen protector fitted with the repair.
    pub hydrogel_fee: f64,
    /// Courier pickup within Brussels.
    pub brussels_courier_fee: f64,
}

impl Default for RepairExtras {
    fn default() -> Self {
        Self {
            hydrogel_fee: 15.0,
            brussels_courier_fee: 15.0,
        }
    }
}

impl RepairExtras {
    /// Total flat fees owed by this request.
    pub fn surcharge(&self, params: &RepairParams) -> f64 {
        let mut total = 0.0;
        if params.has_hydrogel {
            total += self.hydrogel_fee;
        }
        if params.delivery_method == Some(DeliveryMethod::Courier)
            && params.courier_tier == Some(CourierTier::Brussels)
        {
            total += self.brussels_courier_fee;
        }
        total
    }
}
