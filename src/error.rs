use thiserror::Error;

pub type Result<T> = std::result::Result<T, FeedError>;

/// Everything that can stop a pipeline run. Filtered-out units are not errors.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to parse feed xml: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("feed ended before <{element}> was closed")]
    Truncated { element: String },

    #[error("<{parent}> is missing required element <{element}>")]
    MissingElement { parent: String, element: String },

    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute { element: String, attribute: String },

    #[error("<{element}> has non-numeric value {value:?}")]
    InvalidNumber { element: String, value: String },

    #[error("floor plan name {name:?} has no '-' separator before the unit number")]
    MalformedFloorplanName { name: String },

    #[error("unit {unit_ext_id} references unknown floor plan {floorplan_id}")]
    UnknownFloorplan {
        unit_ext_id: String,
        floorplan_id: String,
    },

    #[error("unit {unit_ext_id} has unparseable DateAvailable {value:?}")]
    InvalidDate { unit_ext_id: String, value: String },

    #[error("failed to read feed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to fetch feed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to (de)serialize json: {0}")]
    Json(#[from] serde_json::Error),
}
