//! The three passes that turn a floor-plan catalog into a `FacetTree`.
//! Each pass consumes the previous structure and returns a new one.

use indexmap::IndexMap;

use super::{FacetKey, FacetTree, PriceRange};
use crate::feed::models::FloorPlan;

/// Floor plans keyed by id, in catalog order.
pub type FloorPlanSet<'a> = IndexMap<&'a str, &'a FloorPlan>;

pub type BedroomBuckets<'a> = IndexMap<FacetKey, FloorPlanSet<'a>>;

pub type FloorBuckets<'a> = IndexMap<FacetKey, IndexMap<FacetKey, FloorPlanSet<'a>>>;

/// Buckets floor plans by bedroom count and appends the `"*"` bucket, which
/// holds every floor plan once.
pub fn bucket_by_bedrooms(floorplans: &IndexMap<String, FloorPlan>) -> BedroomBuckets<'_> {
    let mut buckets = BedroomBuckets::new();

    for (id, floorplan) in floorplans {
        buckets
            .entry(FacetKey::value(floorplan.bedrooms_count))
            .or_default()
            .insert(id.as_str(), floorplan);
    }

    let mut all = FloorPlanSet::new();
    for bucket in buckets.values() {
        for (id, floorplan) in bucket {
            all.entry(*id).or_insert(*floorplan);
        }
    }
    buckets.insert(FacetKey::All, all);

    buckets
}

/// Places each floor plan under every floor it spans, plus `"*"`, inside
/// its bedroom bucket.
pub fn fan_out_by_floor(buckets: BedroomBuckets<'_>) -> FloorBuckets<'_> {
    let mut fanned = FloorBuckets::new();

    for (bedrooms, floorplans) in buckets {
        for (id, floorplan) in floorplans {
            let floors = fanned.entry(bedrooms.clone()).or_default();

            for floor in floorplan.floor_tokens() {
                floors
                    .entry(FacetKey::value(floor))
                    .or_default()
                    .insert(id, floorplan);
            }
            floors.entry(FacetKey::All).or_default().insert(id, floorplan);
        }
    }

    fanned
}

/// Collapses every leaf into its sorted min and max price lists.
pub fn aggregate_prices(buckets: FloorBuckets<'_>) -> FacetTree {
    buckets
        .into_iter()
        .map(|(bedrooms, floors)| {
            let floors: IndexMap<FacetKey, PriceRange> = floors
                .into_iter()
                .map(|(floor, floorplans)| (floor, price_range(floorplans.values().copied())))
                .collect();
            (bedrooms, floors)
        })
        .collect()
}

fn price_range<'a>(floorplans: impl Iterator<Item = &'a FloorPlan>) -> PriceRange {
    let (mut min_prices, mut max_prices): (Vec<i64>, Vec<i64>) = floorplans
        .map(|floorplan| (floorplan.min_price, floorplan.max_price))
        .unzip();

    min_prices.sort_unstable();
    max_prices.sort_unstable();

    PriceRange {
        min_prices,
        max_prices,
    }
}
