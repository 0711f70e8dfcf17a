//! Search facets for the listing page: bedroom count -> floor -> price lists.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::Result;
use crate::feed::models::FloorPlan;

pub mod folds;

/// A facet bucket key. `All` is the synthetic `"*"` bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FacetKey {
    All,
    Value(String),
}

impl FacetKey {
    pub fn value(value: impl ToString) -> Self {
        FacetKey::Value(value.to_string())
    }
}

impl fmt::Display for FacetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetKey::All => f.write_str("*"),
            FacetKey::Value(value) => f.write_str(value),
        }
    }
}

impl From<&str> for FacetKey {
    fn from(raw: &str) -> Self {
        match raw {
            "*" => FacetKey::All,
            other => FacetKey::Value(other.to_string()),
        }
    }
}

impl Serialize for FacetKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FacetKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(FacetKey::from(raw.as_str()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min_prices: Vec<i64>,
    pub max_prices: Vec<i64>,
}

pub type FacetTree = IndexMap<FacetKey, IndexMap<FacetKey, PriceRange>>;

/// The facet tree, built once from `Adapter::floorplans` output.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    tree: FacetTree,
    serialized: String,
}

impl SearchOptions {
    pub fn new(floorplans: &IndexMap<String, FloorPlan>) -> Result<Self> {
        let bedrooms = folds::bucket_by_bedrooms(floorplans);
        let floors = folds::fan_out_by_floor(bedrooms);
        let tree = folds::aggregate_prices(floors);
        let serialized = serde_json::to_string(&tree)?;

        debug!(bedroom_buckets = tree.len(), "Search options built");

        Ok(Self { tree, serialized })
    }

    pub fn structured_list(&self) -> &FacetTree {
        &self.tree
    }

    /// Compact JSON form of `structured_list`.
    pub fn serialized_list(&self) -> &str {
        &self.serialized
    }

    pub fn leaf(&self, bedrooms: &FacetKey, floor: &FacetKey) -> Option<&PriceRange> {
        self.tree.get(bedrooms)?.get(floor)
    }

    pub fn parse_serialized(json: &str) -> Result<FacetTree> {
        Ok(serde_json::from_str(json)?)
    }
}
