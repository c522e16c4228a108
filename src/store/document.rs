//! POI文書の読み取りビュー
//!
//! 文書はスキーマが揺れるため、欠けた構造は空文字として扱い失敗させない。

use photo_link_common::{canonicalize, join_norm};
use serde_json::Value;

/// 表示名として探す言語（優先順）
const LABEL_LANGUAGES: &[&str] = &["fr", "fr-FR", "en"];

/// 文書の識別子
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentId {
    /// `@id`（外部の自然キー）
    External(String),
    /// `_id`（ストア固有のキー）
    Native(String),
}

impl DocumentId {
    /// 書き込みに使う識別子を選ぶ
    ///
    /// URL形式の `@id` → `_id` → `@id` の順。
    pub fn select(external: Option<&str>, native: Option<&str>) -> Option<Self> {
        let external = external.map(str::trim).filter(|s| !s.is_empty());
        let native = native.map(str::trim).filter(|s| !s.is_empty());

        match (external, native) {
            (Some(e), _) if is_url_shaped(e) => Some(DocumentId::External(e.to_string())),
            (_, Some(n)) => Some(DocumentId::Native(n.to_string())),
            (Some(e), None) => Some(DocumentId::External(e.to_string())),
            (None, None) => None,
        }
    }

    /// 文書から識別子を取り出す
    pub fn from_document(doc: &Value) -> Option<Self> {
        let external = doc.get("@id").and_then(Value::as_str);
        let native = doc.get("_id").and_then(native_id);
        Self::select(external, native.as_deref())
    }

    pub fn as_str(&self) -> &str {
        match self {
            DocumentId::External(s) | DocumentId::Native(s) => s,
        }
    }

    /// この識別子が指す文書か
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            DocumentId::External(id) => doc
                .get("@id")
                .and_then(Value::as_str)
                .map_or(false, |e| e.trim() == id),
            DocumentId::Native(id) => doc
                .get("_id")
                .and_then(native_id)
                .map_or(false, |n| n.trim() == id),
        }
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn is_url_shaped(id: &str) -> bool {
    id.starts_with("http") || id.contains('/')
}

/// `_id` の値（文字列・`{"$oid": ...}`・数値）
fn native_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("$oid").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// 照合対象の文書
#[derive(Debug, Clone, PartialEq)]
pub struct TargetDocument {
    pub id: DocumentId,
    pub display_name: String,
    pub locality: String,
    /// 既存の画像URL（なければ空）
    pub image: String,
}

impl TargetDocument {
    /// 生の文書から必要な項目だけを取り出す（識別子がなければ `None`）
    pub fn from_value(doc: &Value) -> Option<Self> {
        Some(Self {
            id: DocumentId::from_document(doc)?,
            display_name: display_name(doc),
            locality: locality(doc),
            image: doc.get("image").map(first_string).unwrap_or_default(),
        })
    }

    pub fn has_image(&self) -> bool {
        !self.image.trim().is_empty()
    }

    pub fn name_norm(&self) -> String {
        canonicalize(&self.display_name)
    }

    pub fn locality_norm(&self) -> String {
        canonicalize(&self.locality)
    }

    /// 候補抽出用の "名称 所在地" 正規形
    pub fn joint_norm(&self) -> String {
        join_norm(&self.name_norm(), &self.locality_norm())
    }
}

/// `rdfs:label` の言語別ラベル → 文字列ラベル → `name`
fn display_name(doc: &Value) -> String {
    match doc.get("rdfs:label") {
        Some(Value::Object(labels)) => {
            for lang in LABEL_LANGUAGES {
                if let Some(label) = labels.get(*lang).map(first_string).filter(|s| !s.is_empty()) {
                    return label;
                }
            }
        }
        Some(label @ Value::String(_)) => {
            let label = first_string(label);
            if !label.is_empty() {
                return label;
            }
        }
        _ => {}
    }

    doc.get("name").map(first_string).unwrap_or_default()
}

/// `isLocatedAt[0].schema:address[0].schema:addressLocality`
fn locality(doc: &Value) -> String {
    first_element(doc.get("isLocatedAt"))
        .and_then(|place| first_element(place.get("schema:address")))
        .and_then(|address| address.get("schema:addressLocality"))
        .map(first_string)
        .unwrap_or_default()
}

/// 配列なら先頭要素、オブジェクトならそのもの
fn first_element(value: Option<&Value>) -> Option<&Value> {
    match value? {
        Value::Array(items) => items.first(),
        v @ Value::Object(_) => Some(v),
        _ => None,
    }
}

/// 文字列、または配列の先頭の文字列（前後空白除去）
fn first_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items.first().map(first_string).unwrap_or_default(),
        _ => String::new(),
    }
}
