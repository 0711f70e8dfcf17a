use chrono::Utc;
use indexmap::IndexMap;
use tokio::fs;
use tracing::info;

use crate::{
    adapter::Adapter,
    config::Config,
    feed,
    feed::models::FloorPlan,
    search::SearchOptions,
};

pub struct PipelineOutput {
    pub floorplans: IndexMap<String, FloorPlan>,
    pub search_options: SearchOptions,
}

pub struct PipelineService {
    cfg: Config,
}

impl PipelineService {
    pub fn new(cfg: Config) -> Self {
        Self { cfg }
    }

    /// Load -> parse -> filter -> group -> build facets.
    pub async fn run(&self) -> anyhow::Result<PipelineOutput> {
        info!(source = %self.cfg.feed_source, "Loading feed");
        let document = feed::load_feed(&self.cfg.feed_source, self.cfg.http_timeout).await?;

        let adapter = Adapter::from_document_at(&document, Utc::now(), &self.cfg.filter_rules())?;
        let floorplans = adapter.floorplans();
        let search_options = SearchOptions::new(&floorplans)?;

        info!(
            floorplans = floorplans.len(),
            catalog_floorplans = adapter.all_floorplans().len(),
            units = adapter.units().len(),
            "Pipeline finished"
        );

        Ok(PipelineOutput {
            floorplans,
            search_options,
        })
    }

    /// Writes both views into `OUTPUT_DIR`, or prints them when unset.
    pub async fn emit(&self, output: &PipelineOutput) -> anyhow::Result<()> {
        let catalog = serde_json::to_string_pretty(&output.floorplans)?;
        let facets = output.search_options.serialized_list();

        match &self.cfg.output_dir {
            Some(dir) => {
                fs::create_dir_all(dir).await?;
                fs::write(dir.join("floorplans.json"), catalog).await?;
                fs::write(dir.join("search_options.json"), facets).await?;
                info!(dir = %dir.display(), "Output written");
            }
            None => {
                println!("{catalog}");
                println!("{facets}");
            }
        }

        Ok(())
    }
}
