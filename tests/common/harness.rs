use std::sync::Arc;

use docscore::storage::{ArchiveLayout, BlobIndexStore, CacheIndexEntry, IndexStore};
use docscore::{
    ARCHIVE_LAYOUT_VERSION, Config, Dimension, MemoryBlobStore, MockModelInvoker,
    ProcessedContent, QualityPipeline, SessionIdentity,
};

use super::fixtures::{assessment, prompt_marker};

pub const BUCKET: &str = "docscore-working";
pub const TABLE: &str = "processed-urls";

/// In-memory stores plus a scripted model, wired like production.
pub struct TestHarness {
    pub blobs: MemoryBlobStore,
    pub index: Arc<BlobIndexStore>,
    pub model: Arc<MockModelInvoker>,
    pub pipeline: QualityPipeline,
}

pub struct HarnessConfig {
    pub caching: bool,
    pub model: MockModelInvoker,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            caching: true,
            model: MockModelInvoker::new(),
        }
    }
}

impl HarnessConfig {
    pub fn with_scores(scores: [u32; 5]) -> Self {
        let mut model = MockModelInvoker::new();
        for (dimension, score) in Dimension::ALL.into_iter().zip(scores) {
            model = model.respond_when(prompt_marker(dimension), assessment(score));
        }
        Self {
            caching: true,
            model,
        }
    }

    pub fn without_cache(mut self) -> Self {
        self.caching = false;
        self
    }
}

pub fn build_harness(cfg: HarnessConfig) -> TestHarness {
    let blobs = MemoryBlobStore::new();
    let index = Arc::new(BlobIndexStore::new(Arc::new(blobs.clone())));
    let model = Arc::new(cfg.model);

    let config = Config {
        index_table: cfg.caching.then(|| TABLE.to_string()),
        ..Config::with_bucket(BUCKET)
    };

    let pipeline = QualityPipeline::new(
        &config,
        Arc::new(blobs.clone()),
        cfg.caching.then(|| index.clone() as Arc<dyn IndexStore>),
        model.clone(),
    )
    .expect("pipeline should build");

    TestHarness {
        blobs,
        index,
        model,
        pipeline,
    }
}

impl TestHarness {
    /// Stores `content` for `session` the way the upstream stage does, and
    /// records an index entry pointing at it.
    pub async fn seed_upstream(&self, session: &SessionIdentity, content: &ProcessedContent) {
        let layout = ArchiveLayout::V1;
        let key = layout.content_key(session);
        self.blobs.insert(
            BUCKET,
            &key,
            serde_json::to_vec_pretty(content).expect("content serializes"),
        );

        let entry = CacheIndexEntry::new(
            content.normalized_url(),
            content.contextual_setting(),
            format!("gs://{BUCKET}/{key}"),
        )
        .with_layout_version(ARCHIVE_LAYOUT_VERSION)
        .with_session(session.clone());
        self.index.put(TABLE, &entry).await.expect("index put");
    }

    /// Stores `content` for `session` without touching the index.
    pub fn seed_content(&self, session: &SessionIdentity, content: &ProcessedContent) {
        self.blobs.insert(
            BUCKET,
            &ArchiveLayout::V1.content_key(session),
            serde_json::to_vec(content).expect("content serializes"),
        );
    }

    pub fn session_results(&self, session: &SessionIdentity) -> Option<Vec<u8>> {
        self.blobs
            .object(BUCKET, &ArchiveLayout::V1.results_key(session))
    }
}
