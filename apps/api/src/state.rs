use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::tailoring::pipeline::TailoringPipeline;
use crate::templates::extractor::TextExtractor;
use crate::templates::store::TemplateStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: TemplateStore,
    pub pipeline: TailoringPipeline,
    /// Shared with the pipeline; the status probe calls it directly.
    pub generator: Arc<dyn TextGenerator>,
    pub extractor: Arc<dyn TextExtractor>,
}

impl AppState {
    pub fn new(
        config: Config,
        generator: Arc<dyn TextGenerator>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        let store = TemplateStore::new(config.storage_root.clone());
        let pipeline = TailoringPipeline::new(store.clone(), generator.clone(), config.keyword_top_k);
        Self {
            config,
            store,
            pipeline,
            generator,
            extractor,
        }
    }
}
