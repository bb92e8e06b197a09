//! Equipment catalog
//!
//! Static lookup of price, standard size and initial orientation per model
//! file. Models missing from the catalog are still placeable.

use std::collections::HashMap;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::components::Transform;
use crate::error::CatalogError;

/// Target size for models without a catalog entry
pub const DEFAULT_TARGET_SIZE: f32 = 1.0;

/// One catalog line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub model: String,
    pub price: u64,
    /// Largest bounding-box dimension after placement
    #[serde(default = "default_target_size")]
    pub target_size: f32,
    /// Euler angles in radians applied before placement
    #[serde(default)]
    pub rotation: Option<[f32; 3]>,
}

fn default_target_size() -> f32 {
    DEFAULT_TARGET_SIZE
}

impl CatalogEntry {
    pub fn new(model: impl Into<String>, price: u64, target_size: f32) -> Self {
        Self {
            model: model.into(),
            price,
            target_size,
            rotation: None,
        }
    }

    pub fn with_rotation(mut self, euler: [f32; 3]) -> Self {
        self.rotation = Some(euler);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_model: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog; model names must be unique and sizes positive
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut by_model = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if !(entry.target_size > 0.0 && entry.target_size.is_finite()) {
                return Err(CatalogError::InvalidSize {
                    model: entry.model.clone(),
                    size: entry.target_size,
                });
            }
            if by_model.insert(entry.model.clone(), i).is_some() {
                return Err(CatalogError::Duplicate(entry.model.clone()));
            }
        }
        Ok(Self { entries, by_model })
    }

    /// Parse a JSON array of entries
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    pub fn get(&self, model: &str) -> Option<&CatalogEntry> {
        self.by_model.get(model).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, model: &str) -> bool {
        self.by_model.contains_key(model)
    }

    /// Price of a model, 0 when unknown
    pub fn price_of(&self, model: &str) -> u64 {
        self.get(model).map_or(0, |e| e.price)
    }

    /// Standard size of a model, 1.0 when unknown
    pub fn target_size_of(&self, model: &str) -> f32 {
        self.get(model).map_or(DEFAULT_TARGET_SIZE, |e| e.target_size)
    }

    pub fn base_rotation_of(&self, model: &str) -> Quat {
        self.get(model)
            .and_then(|e| e.rotation)
            .map_or(Quat::IDENTITY, |r| Transform::euler_rotation(Vec3::from_array(r)))
    }

    /// Model names in catalog order
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.model.as_str())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let entries = vec![
            CatalogEntry::new("swing.glb", 5000, 1.0),
            CatalogEntry::new("lgk_314.glb", 10000, 2.0),
            CatalogEntry::new("msk_201.glb", 15000, 3.0),
            CatalogEntry::new("bench.glb", 3000, 2.0)
                .with_rotation([std::f32::consts::FRAC_PI_2, 0.0, 0.0]),
            CatalogEntry::new("msk_105.glb", 4000, 1.5),
            CatalogEntry::new("lgk_11.glb", 6000, 1.2),
            CatalogEntry::new("lgp_112.glb", 7000, 2.5),
            CatalogEntry::new("lgd_3.glb", 11000, 3.0),
        ];
        Self::new(entries).expect("built-in catalog is valid")
    }
}
