//! 文書ストア
//!
//! 照合処理はこのトレイト越しに対象文書を読み、画像を書き込む。
//! 接続はグローバルに持たず、呼び出し側が生成して渡す。

pub mod document;
pub mod filter;
pub mod json_file;
pub mod memory;

pub use document::{DocumentId, TargetDocument};
pub use filter::RegionFilter;
pub use json_file::{JsonFileStore, StoreFormat};
pub use memory::MemoryStore;

use crate::error::{PhotoLinkError, Result};
use photo_link_common::ImageAttribution;
use serde_json::Value;

/// 画像クレジットを書き込むフィールド名
pub const ATTRIBUTION_FIELD: &str = "image_attribution";

pub trait DocumentStore {
    /// 絞り込み条件に合う対象文書を返す
    fn find_targets(&self, filter: &RegionFilter) -> Result<Vec<TargetDocument>>;

    /// `image` と画像クレジットの2項目だけを1回の更新で設定する
    fn set_image(&mut self, id: &DocumentId, url: &str, attribution: &ImageAttribution) -> Result<()>;
}

/// 文書に画像とクレジットを設定する（他の項目は変更しない）
pub(crate) fn apply_image(doc: &mut Value, url: &str, attribution: &ImageAttribution) -> Result<()> {
    let attribution = serde_json::to_value(attribution)?;
    let map = doc
        .as_object_mut()
        .ok_or_else(|| PhotoLinkError::Store("文書がオブジェクトではありません".into()))?;

    map.insert("image".into(), Value::String(url.to_string()));
    map.insert(ATTRIBUTION_FIELD.into(), attribution);
    Ok(())
}
