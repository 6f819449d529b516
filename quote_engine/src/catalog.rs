//! Price catalog seam.
//!
//! The calculators never fetch prices themselves.  Callers resolve the
//! device in a [`PriceCatalog`] first and pass the resulting snapshot
//! into [`crate::buyback`] or [`crate::repair`].  [`CatalogSnapshot`] is
//! the in-memory implementation, loaded from a directory with one JSON
//! file per device:
//!
//! ```json
//! {
//!   "brand": "Apple",
//!   "model": "iPhone 13",
//!   "deviceType": "smartphone",
//!   "buyback": [{ "storage": "128GB", "condition": "like-new", "price": 400 }],
//!   "repair": { "screen_generic": 100, "screen_oled": 150, "battery": 50 }
//! }
//! ```

use crate::config::RepairExtras;
use crate::models::DeviceRef;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Optional fee overrides stored next to the device files.
pub const EXTRAS_FILE: &str = "extras.json";

/// Condition tiers published by the catalog sync.  The calculators
/// only read [`ConditionTier::LikeNew`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionTier {
    New,
    LikeNew,
    Good,
    Fair,
    Damaged,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuybackRecord {
    pub storage: String,
    pub condition: ConditionTier,
    pub price: f64,
}

impl BuybackRecord {
    pub fn like_new(storage: impl Into<String>, price: f64) -> Self {
        Self {
            storage: storage.into(),
            condition: ConditionTier::LikeNew,
            price,
        }
    }
}

/// Repair prices for one device, keyed by issue id.  Screens are
/// split into `screen_generic`, `screen_oled` and `screen_original`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepairPriceTable(HashMap<String, f64>);

impl RepairPriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when the catalog has no entry; `Some(0.0)` is a listed
    /// price of zero.
    pub fn get(&self, issue: &str) -> Option<f64> {
        self.0.get(issue).copied()
    }

    pub fn insert(&mut self, issue: impl Into<String>, price: f64) -> Option<f64> {
        self.0.insert(issue.into(), price)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for RepairPriceTable {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// `0` and `NaN` are treated as "no price".
pub(crate) fn is_unset(price: f64) -> bool {
    price == 0.0 || price.is_nan()
}

/// Normalised catalog key: device type, brand and model, trimmed and
/// lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceKey {
    pub device_type: String,
    pub brand: String,
    pub model: String,
}

impl From<&DeviceRef> for DeviceKey {
    fn from(device: &DeviceRef) -> Self {
        let norm = |s: &str| s.trim().to_lowercase();
        Self {
            device_type: norm(&device.device_type),
            brand: norm(&device.brand),
            model: norm(&device.model),
        }
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.device_type, self.brand, self.model)
    }
}

/// Source of catalog snapshots for a device.
///
/// Implementations must be thread-safe (`Send + Sync`): batches are
/// priced concurrently against a shared catalog.
pub trait PriceCatalog: Send + Sync {
    fn buyback_records(&self, device: &DeviceRef) -> Option<&[BuybackRecord]>;
    fn repair_prices(&self, device: &DeviceRef) -> Option<&RepairPriceTable>;
}

/// Everything the catalog knows about one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceEntry {
    #[serde(flatten)]
    pub device: DeviceRef,
    #[serde(default)]
    pub buyback: Vec<BuybackRecord>,
    #[serde(default)]
    pub repair: RepairPriceTable,
}

impl DeviceEntry {
    pub fn key(&self) -> DeviceKey {
        DeviceKey::from(&self.device)
    }
}

/// In-memory catalog, read-only once built.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    devices: HashMap<DeviceKey, DeviceEntry>,
}

impl CatalogSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device.  Returns `false`, leaving the existing entry in
    /// place, if the device is already present.
    pub fn insert(&mut self, entry: DeviceEntry) -> bool {
        let key = entry.key();
        if self.devices.contains_key(&key) {
            return false;
        }
        self.devices.insert(key, entry);
        true
    }

    pub fn get(&self, device: &DeviceRef) -> Option<&DeviceEntry> {
        self.devices.get(&DeviceKey::from(device))
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl PriceCatalog for CatalogSnapshot {
    fn buyback_records(&self, device: &DeviceRef) -> Option<&[BuybackRecord]> {
        self.get(device).map(|entry| entry.buyback.as_slice())
    }

    fn repair_prices(&self, device: &DeviceRef) -> Option<&RepairPriceTable> {
        self.get(device).map(|entry| &entry.repair)
    }
}

/// Load every device file in `path` into a snapshot.
///
/// Files are read in name order.  A file that fails to parse is
/// skipped with a warning, as is a second file for an already loaded
/// device.  `extras.json` is not a device file and is ignored here;
/// see [`load_extras`].
pub fn load_catalog_from_dir(path: &Path) -> Result<CatalogSnapshot> {
    if !path.is_dir() {
        bail!("price catalog directory {} does not exist", path.display());
    }
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(path)
        .with_context(|| format!("reading catalog directory {}", path.display()))?
    {
        let entry = entry?;
        let file = entry.path();
        let is_json = file.extension().is_some_and(|ext| ext == "json");
        let is_extras = file.file_name().is_some_and(|name| name == EXTRAS_FILE);
        if entry.file_type()?.is_file() && is_json && !is_extras {
            files.push(file);
        }
    }
    files.sort();

    let mut snapshot = CatalogSnapshot::new();
    for file in files {
        let data = std::fs::read_to_string(&file)
            .with_context(|| format!("reading catalog file {}", file.display()))?;
        match serde_json::from_str::<DeviceEntry>(&data) {
            Ok(entry) => {
                let key = entry.key();
                if !snapshot.insert(entry) {
                    warn!(file = %file.display(), device = %key, "duplicate catalog entry skipped");
                }
            }
            Err(err) => {
                warn!(file = %file.display(), error = %err, "failed to parse catalog file");
            }
        }
    }
    info!(dir = %path.display(), devices = snapshot.len(), "price catalog loaded");
    Ok(snapshot)
}

/// Read fee overrides from `extras.json` in `path`, falling back to
/// the defaults when the file is absent.
pub fn load_extras(path: &Path) -> Result<RepairExtras> {
    let file = path.join(EXTRAS_FILE);
    if !file.is_file() {
        return Ok(RepairExtras::default());
    }
    let data = std::fs::read_to_string(&file)
        .with_context(|| format!("reading {}", file.display()))?;
    let extras = serde_json::from_str(&data)
        .with_context(|| format!("parsing {}", file.display()))?;
    Ok(extras)
}
