use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tokio::fs;

use crate::error::Result;

pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .user_agent("floorplan-feed/0.1")
        .timeout(timeout)
        .build()?;

    Ok(client)
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

pub async fn fetch_xml(client: &Client, url: &str) -> Result<String> {
    let res = client.get(url).send().await?.error_for_status()?;
    Ok(res.text().await?)
}

pub async fn read_xml(path: impl AsRef<Path>) -> Result<String> {
    Ok(fs::read_to_string(path).await?)
}
