pub mod adapter;
pub mod config;
pub mod error;
pub mod feed;
pub mod search;

pub use adapter::{Adapter, FilterRules};
pub use error::{FeedError, Result};
pub use feed::models::{FloorPlan, Unit, UnitsByFloorPlan};
pub use search::{FacetKey, FacetTree, PriceRange, SearchOptions};
