use super::{apply_image, DocumentId, DocumentStore, RegionFilter, TargetDocument};
use crate::error::{PhotoLinkError, Result};
use photo_link_common::ImageAttribution;
use serde_json::Value;

/// メモリ上の文書ストア
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Vec<Value>,
    writes: usize,
}

impl MemoryStore {
    pub fn new(documents: Vec<Value>) -> Self {
        Self { documents, writes: 0 }
    }

    pub fn documents(&self) -> &[Value] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<Value> {
        self.documents
    }

    /// `set_image` が成功した回数
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Value> {
        self.documents.iter().find(|doc| id.matches(doc))
    }
}

impl DocumentStore for MemoryStore {
    fn find_targets(&self, filter: &RegionFilter) -> Result<Vec<TargetDocument>> {
        let mut targets = Vec::new();
        for doc in self.documents.iter().filter(|doc| filter.matches(doc)) {
            match TargetDocument::from_value(doc) {
                Some(target) => targets.push(target),
                None => log::warn!("識別子のない文書を読み飛ばします"),
            }
        }
        Ok(targets)
    }

    fn set_image(&mut self, id: &DocumentId, url: &str, attribution: &ImageAttribution) -> Result<()> {
        let doc = self
            .documents
            .iter_mut()
            .find(|doc| id.matches(doc))
            .ok_or_else(|| PhotoLinkError::DocumentNotFound(id.to_string()))?;

        apply_image(doc, url, attribution)?;
        self.writes += 1;
        Ok(())
    }
}
