//! Turns the raw feed tree into the floor-plan / unit catalogs and applies
//! the business filters.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{FeedError, Result};
use crate::feed::models::{FloorPlan, Unit, UnitsByFloorPlan};
use crate::feed::parser::FeedNode;

pub mod filters;

pub use filters::FilterRules;

static NUMERIC_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid unit id regex"));
static DEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)den").expect("valid den regex"));

#[derive(Debug, Clone)]
pub struct Adapter {
    floorplans: IndexMap<String, FloorPlan>,
    units: IndexMap<String, Unit>,
    units_grouped: UnitsByFloorPlan,
}

impl Adapter {
    pub fn from_document<N: FeedNode>(document: &N) -> Result<Self> {
        Self::from_document_at(document, Utc::now(), &FilterRules::default())
    }

    /// Builds the catalogs, filtering units as of `now`.
    pub fn from_document_at<N: FeedNode>(
        document: &N,
        now: DateTime<Utc>,
        rules: &FilterRules,
    ) -> Result<Self> {
        let properties = properties(document);

        let images = parse_floorplan_images(&properties)?;
        let floorplans = parse_floorplans(&properties, &images)?;
        let parsed = parse_units(&properties, &floorplans, &images)?;
        let parsed_count = parsed.len();

        let units = filters::apply(parsed, now, rules)?;
        let units_grouped = group_by_floorplan(&units);

        info!(
            floorplans = floorplans.len(),
            parsed_units = parsed_count,
            surviving_units = units.len(),
            "Feed adapted"
        );

        Ok(Self {
            floorplans,
            units,
            units_grouped,
        })
    }

    /// Floor plans with at least one surviving unit, each carrying the
    /// floors those units sit on.
    pub fn floorplans(&self) -> IndexMap<String, FloorPlan> {
        self.units_grouped
            .iter()
            .filter_map(|(floorplan_id, units)| {
                let mut floorplan = self.floorplans.get(floorplan_id)?.clone();
                floorplan.floors = available_floors(units);
                Some((floorplan_id.clone(), floorplan))
            })
            .collect()
    }

    /// Every parsed floor plan, including ones with no surviving unit and
    /// with `floors` left empty. Use `floorplans` for anything rendered.
    pub fn all_floorplans(&self) -> &IndexMap<String, FloorPlan> {
        &self.floorplans
    }

    pub fn units(&self) -> &IndexMap<String, Unit> {
        &self.units
    }

    pub fn units_by_floorplan(&self) -> &UnitsByFloorPlan {
        &self.units_grouped
    }
}

fn properties<N: FeedNode>(document: &N) -> Vec<&N> {
    if document.tag() == "Property" {
        vec![document]
    } else {
        document.children_of("Property").collect()
    }
}

fn parse_floorplan_images<N: FeedNode>(properties: &[&N]) -> Result<HashMap<String, String>> {
    let mut images = HashMap::new();

    for property in properties {
        for file in property.children_of("File") {
            let id = parse_int("File@id", required_attr(file, "id")?)?;
            let src = file.child("Src").map(|src| src.text()).unwrap_or_default();
            images.insert(id.to_string(), src.to_string());
        }
    }

    Ok(images)
}

fn parse_floorplans<N: FeedNode>(
    properties: &[&N],
    images: &HashMap<String, String>,
) -> Result<IndexMap<String, FloorPlan>> {
    let mut floorplans = IndexMap::new();

    for property in properties {
        for node in property.children_of("Floorplan") {
            let floorplan = parse_floorplan(node, images)?;
            floorplans.insert(floorplan.floorplan_id.clone(), floorplan);
        }
    }

    Ok(floorplans)
}

fn parse_floorplan<N: FeedNode>(node: &N, images: &HashMap<String, String>) -> Result<FloorPlan> {
    let floorplan_id = required_attr(node, "id")?.trim().to_string();
    let name = required_text(node, "Name")?;

    let bedrooms_count = room_count(node, "bedroom")?;
    let bathroom_count = room_count(node, "bathroom")?;

    let square_feet = match node.child("SquareFeet").and_then(|sq| sq.attribute("min")) {
        Some(min) => parse_int("SquareFeet@min", min)?,
        None => 0,
    };

    let rent = required_child(node, "MarketRent")?;
    let min_price = parse_int("MarketRent@min", required_attr(rent, "min")?)?;
    let max_price = parse_int("MarketRent@max", required_attr(rent, "max")?)?;

    let image_url = match images.get(&floorplan_id) {
        Some(url) => url.clone(),
        None => {
            warn!(floorplan_id = %floorplan_id, "No image recorded for floor plan");
            String::new()
        }
    };

    Ok(FloorPlan {
        unit_number: unit_number(name)?,
        image_url,
        bedrooms_count,
        bedroom_type: bedroom_label(bedrooms_count, name),
        square_feet,
        min_price,
        max_price,
        description: format!("{name} - {bedrooms_count} bedroom, {bathroom_count} bathroom"),
        floors: String::new(),
        floorplan_id,
    })
}

fn parse_units<N: FeedNode>(
    properties: &[&N],
    floorplans: &IndexMap<String, FloorPlan>,
    images: &HashMap<String, String>,
) -> Result<IndexMap<String, Unit>> {
    let mut units = IndexMap::new();

    for property in properties {
        for node in property.children_of("ILS_Unit") {
            let unit_id = node.child("UnitID").map(|id| id.text()).unwrap_or_default();
            if !NUMERIC_ID.is_match(unit_id) {
                debug!(unit_id, "Skipping unit with non-numeric id");
                continue;
            }

            let unit = parse_unit(node, unit_id, floorplans, images)?;
            // Re-inserting an existing ExtId keeps its slot, last record wins.
            units.insert(unit.unit_ext_id.clone(), unit);
        }
    }

    Ok(units)
}

fn parse_unit<N: FeedNode>(
    node: &N,
    unit_id: &str,
    floorplans: &IndexMap<String, FloorPlan>,
    images: &HashMap<String, String>,
) -> Result<Unit> {
    let unit_ext_id = required_text(node, "ExtId")?.to_string();
    let floorplan_id = parse_int("FloorplanID", required_text(node, "FloorplanID")?)?.to_string();

    let Some(floorplan) = floorplans.get(&floorplan_id) else {
        return Err(FeedError::UnknownFloorplan {
            unit_ext_id,
            floorplan_id,
        });
    };

    let image_url = images.get(&floorplan_id).cloned().unwrap_or_else(|| {
        debug!(unit_ext_id = %unit_ext_id, floorplan_id = %floorplan_id, "Unit has no floor plan image");
        String::new()
    });

    let bathrooms_count = optional_count(node, "UnitBathrooms")?;

    Ok(Unit {
        floorplan_id,
        unit_id: unit_id.to_string(),
        bedrooms_count: optional_count(node, "UnitBedrooms")?,
        bathroom_type: bathroom_label(bathrooms_count),
        bedroom_type: floorplan.bedroom_type.clone(),
        floor_number: floor_number(unit_id).to_string(),
        unit_number: floorplan.unit_number.clone(),
        price: parse_int("UnitRent", required_text(node, "UnitRent")?)?,
        square_feet: group_thousands(optional_int(node, "MinSquareFeet")?),
        image_url,
        apply_online_url: optional_text(node, "ApplyOnlineURL"),
        amenity_list: optional_text(node, "UnitAmenityList"),
        floorplan_description: floorplan.description.clone(),
        availability_status: required_text(node, "UnitLeasedStatusDescription")?.to_string(),
        date_available: optional_text(node, "DateAvailable"),
        unit_ext_id,
    })
}

fn group_by_floorplan(units: &IndexMap<String, Unit>) -> UnitsByFloorPlan {
    let mut grouped = UnitsByFloorPlan::new();
    for unit in units.values() {
        grouped
            .entry(unit.floorplan_id.clone())
            .or_default()
            .push(unit.clone());
    }
    grouped
}

fn available_floors(units: &[Unit]) -> String {
    let mut floors: Vec<&str> = Vec::new();
    for unit in units {
        if !floors.contains(&unit.floor_number.as_str()) {
            floors.push(&unit.floor_number);
        }
    }
    floors.join(",")
}

/// `Studio`, `1 bedroom`, `2 bedrooms`, with ` + DEN` when the plan name
/// mentions a den.
pub fn bedroom_label(count: u32, floorplan_name: &str) -> String {
    let label = match count {
        0 => "Studio".to_string(),
        1 => "1 bedroom".to_string(),
        n => format!("{n} bedrooms"),
    };

    if DEN.is_match(floorplan_name) {
        format!("{label} + DEN")
    } else {
        label
    }
}

pub fn bathroom_label(count: u32) -> String {
    if count > 1 {
        format!("{count} bathrooms")
    } else {
        format!("{count} bathroom")
    }
}

/// Floor encoded in the unit id: `1204` -> `12`, `305` -> `3`.
/// Only holds for feeds that number units as floor + two-digit suffix.
pub fn floor_number(unit_id: &str) -> &str {
    if unit_id.len() == 4 {
        &unit_id[..2]
    } else {
        &unit_id[..unit_id.len().min(1)]
    }
}

fn unit_number(floorplan_name: &str) -> Result<String> {
    floorplan_name
        .split_once('-')
        .map(|(_, unit_number)| unit_number.to_string())
        .ok_or_else(|| FeedError::MalformedFloorplanName {
            name: floorplan_name.to_string(),
        })
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

fn room_count<N: FeedNode>(floorplan: &N, room_type: &str) -> Result<u32> {
    let room = floorplan
        .find("Room", "type", room_type)
        .next()
        .ok_or_else(|| FeedError::MissingElement {
            parent: "Floorplan".to_string(),
            element: format!("Room[@type='{room_type}']"),
        })?;

    to_count("Room/Count", required_text(room, "Count")?)
}

fn required_child<'a, N: FeedNode>(node: &'a N, tag: &str) -> Result<&'a N> {
    node.child(tag).ok_or_else(|| FeedError::MissingElement {
        parent: node.tag().to_string(),
        element: tag.to_string(),
    })
}

fn required_text<'a, N: FeedNode>(node: &'a N, tag: &str) -> Result<&'a str> {
    required_child(node, tag).map(|child| child.text())
}

fn required_attr<'a, N: FeedNode>(node: &'a N, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| FeedError::MissingAttribute {
        element: node.tag().to_string(),
        attribute: name.to_string(),
    })
}

fn optional_text<N: FeedNode>(node: &N, tag: &str) -> String {
    node.child(tag)
        .map(|child| child.text().to_string())
        .unwrap_or_default()
}

fn optional_int<N: FeedNode>(node: &N, tag: &str) -> Result<i64> {
    match node.child(tag).map(|child| child.text()) {
        Some(raw) if !raw.is_empty() => parse_int(tag, raw),
        _ => Ok(0),
    }
}

fn optional_count<N: FeedNode>(node: &N, tag: &str) -> Result<u32> {
    match node.child(tag).map(|child| child.text()) {
        Some(raw) if !raw.is_empty() => to_count(tag, raw),
        _ => Ok(0),
    }
}

fn to_count(element: &str, raw: &str) -> Result<u32> {
    u32::try_from(parse_int(element, raw)?).map_err(|_| FeedError::InvalidNumber {
        element: element.to_string(),
        value: raw.to_string(),
    })
}

/// Integer text, tolerating a fractional part (`"1100.00"` -> 1100).
fn parse_int(element: &str, raw: &str) -> Result<i64> {
    let trimmed = raw.trim();

    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(value);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value.trunc() as i64),
        _ => Err(FeedError::InvalidNumber {
            element: element.to_string(),
            value: raw.to_string(),
        }),
    }
}
