use std::time::Duration;

use tracing::{debug, info};

use crate::error::Result;
use crate::feed::parser::XmlElement;

pub mod fetcher;
pub mod models;
pub mod parser;
pub mod service;

/// Loads the feed from a local path or an http(s) URL and parses it.
pub async fn load_feed(source: &str, timeout: Duration) -> Result<XmlElement> {
    let xml = if fetcher::is_remote(source) {
        debug!(url = source, "Fetching remote feed");
        let client = fetcher::build_client(timeout)?;
        fetcher::fetch_xml(&client, source).await?
    } else {
        debug!(path = source, "Reading feed from disk");
        fetcher::read_xml(source).await?
    };

    info!(bytes = xml.len(), "Feed loaded");

    parser::parse_document(&xml)
}
