//! Transformation persistence
//!
//! Transformers record each derived artifact through this trait as soon as
//! the artifact's bytes are durable, so a crash mid-pipeline never leaves
//! an unrecorded blob with a recorded sibling missing.

use async_trait::async_trait;
use medialib_core::{File, Transformation};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Durable record of transformations, keyed by owning file.
#[async_trait]
pub trait TransformationStore: Send + Sync {
    async fn save(&self, file: &File, transformation: &Transformation) -> anyhow::Result<()>;
}

/// In-memory store used in tests and single-process setups.
#[derive(Default)]
pub struct MemoryTransformationStore {
    records: Mutex<HashMap<Uuid, Vec<Transformation>>>,
}

impl MemoryTransformationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved_for(&self, file_id: Uuid) -> Vec<Transformation> {
        self.records
            .lock()
            .unwrap()
            .get(&file_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl TransformationStore for MemoryTransformationStore {
    async fn save(&self, file: &File, transformation: &Transformation) -> anyhow::Result<()> {
        self.records
            .lock()
            .unwrap()
            .entry(file.id)
            .or_default()
            .push(transformation.clone());
        Ok(())
    }
}
