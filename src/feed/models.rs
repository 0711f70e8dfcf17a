use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorPlan {
    pub floorplan_id: String,
    pub unit_number: String,
    pub image_url: String,
    pub bedrooms_count: u32,
    pub bedroom_type: String,
    pub square_feet: i64,
    pub min_price: i64,
    pub max_price: i64,
    pub description: String,
    /// Comma-joined floor numbers of the surviving units, filled in by
    /// `Adapter::floorplans`. Empty on the raw catalog.
    #[serde(default)]
    pub floors: String,
}

impl FloorPlan {
    pub fn floor_tokens(&self) -> impl Iterator<Item = &str> {
        self.floors.split(',')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub unit_ext_id: String,
    pub floorplan_id: String,
    pub unit_id: String,
    pub bedrooms_count: u32,
    pub bathroom_type: String,
    pub bedroom_type: String,
    pub floor_number: String,
    pub unit_number: String,
    pub price: i64,
    /// Grouped for display, e.g. `1,250`.
    pub square_feet: String,
    pub image_url: String,
    pub apply_online_url: String,
    pub amenity_list: String,
    pub floorplan_description: String,
    pub availability_status: String,
    pub date_available: String,
}

/// Surviving units per floor plan, both levels in feed order.
pub type UnitsByFloorPlan = IndexMap<String, Vec<Unit>>;
