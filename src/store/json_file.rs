//! JSONファイルの文書ストア
//!
//! mongoexport の出力（JSON配列 / 1行1文書）をそのまま読み書きする。

use super::{DocumentId, DocumentStore, MemoryStore, RegionFilter, TargetDocument};
use crate::error::{PhotoLinkError, Result};
use photo_link_common::ImageAttribution;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// ファイルの書式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    /// `[ {...}, {...} ]`
    Array,
    /// 1行に1文書（JSON Lines）
    Lines,
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    format: StoreFormat,
    inner: MemoryStore,
    dirty: bool,
}

impl JsonFileStore {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PhotoLinkError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let (format, documents) = parse_documents(&content)?;

        Ok(Self {
            path: path.to_path_buf(),
            format,
            inner: MemoryStore::new(documents),
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> StoreFormat {
        self.format
    }

    pub fn documents(&self) -> &[Value] {
        self.inner.documents()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 変更があればファイルに書き戻す（一時ファイル + rename）
    ///
    /// 書き込んだ場合は `true`。
    pub fn flush(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }

        let content = serialize_documents(self.inner.documents(), self.format)?;
        let tmp_path = temp_path(&self.path);
        std::fs::write(&tmp_path, content)?;
        std::fs::rename(&tmp_path, &self.path)?;

        self.dirty = false;
        Ok(true)
    }
}

impl DocumentStore for JsonFileStore {
    fn find_targets(&self, filter: &RegionFilter) -> Result<Vec<TargetDocument>> {
        self.inner.find_targets(filter)
    }

    fn set_image(&mut self, id: &DocumentId, url: &str, attribution: &ImageAttribution) -> Result<()> {
        self.inner.set_image(id, url, attribution)?;
        self.dirty = true;
        Ok(())
    }
}

fn parse_documents(content: &str) -> Result<(StoreFormat, Vec<Value>)> {
    let trimmed = content.trim_start_matches('\u{feff}').trim();

    if trimmed.is_empty() {
        return Ok((StoreFormat::Array, Vec::new()));
    }

    if trimmed.starts_with('[') {
        let documents: Vec<Value> = serde_json::from_str(trimmed)?;
        return Ok((StoreFormat::Array, documents));
    }

    let mut documents = Vec::new();
    for (i, line) in trimmed.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let doc: Value = serde_json::from_str(line)
            .map_err(|e| PhotoLinkError::Store(format!("{}行目: {}", i + 1, e)))?;
        documents.push(doc);
    }
    Ok((StoreFormat::Lines, documents))
}

fn serialize_documents(documents: &[Value], format: StoreFormat) -> Result<String> {
    match format {
        StoreFormat::Array => Ok(serde_json::to_string_pretty(documents)?),
        StoreFormat::Lines => {
            let mut out = String::new();
            for doc in documents {
                out.push_str(&serde_json::to_string(doc)?);
                out.push('\n');
            }
            Ok(out)
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "store.json".into());
    path.with_file_name(format!(".{}.tmp", name))
}
