//! 地域による対象文書の絞り込み
//!
//! 地域名の置き場所が文書の世代で異なるため、複数のパスのどれかで一致すれば対象とする。
//! 途中の配列は要素ごとに辿る（MongoDBのドット記法と同じ扱い）。

use serde_json::Value;

/// 地域名を探すパス
pub const REGION_PATHS: &[&str] = &[
    "hasBeenCreatedBy.schema:address.hasAddressCity.isPartOfDepartment.isPartOfRegion.rdfs:label.fr",
    "isLocatedAt.schema:address.isPartOfDepartment.isPartOfRegion.rdfs:label.fr",
    "region",
    "_regions",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionFilter {
    region: Option<String>,
}

impl RegionFilter {
    /// 絞り込みなし
    pub fn all() -> Self {
        Self { region: None }
    }

    /// 地域名で絞り込む（空文字なら全件）
    pub fn region(name: &str) -> Self {
        let name = name.trim();
        Self {
            region: (!name.is_empty()).then(|| name.to_string()),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn matches(&self, doc: &Value) -> bool {
        let region = match &self.region {
            Some(r) => r,
            None => return true,
        };

        REGION_PATHS.iter().any(|path| {
            let segments: Vec<&str> = path.split('.').collect();
            let mut found = Vec::new();
            collect_at(doc, &segments, &mut found);
            found.iter().any(|v| value_equals(v, region))
        })
    }
}

fn collect_at<'a>(value: &'a Value, segments: &[&str], out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_at(item, segments, out);
            }
        }
        _ => match segments.split_first() {
            None => out.push(value),
            Some((key, rest)) => {
                if let Some(child) = value.get(*key) {
                    collect_at(child, rest, out);
                }
            }
        },
    }
}

fn value_equals(value: &Value, expected: &str) -> bool {
    value.as_str().map_or(false, |s| s == expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ARA: &str = "Auvergne-Rhône-Alpes";

    #[test]
    fn test_all_matches_everything() {
        assert!(RegionFilter::all().matches(&json!({})));
        assert!(RegionFilter::region("  ").matches(&json!({})));
        assert_eq!(RegionFilter::region("").label(), None);
    }

    #[test]
    fn test_created_by_path() {
        let doc = json!({
            "hasBeenCreatedBy": [{
                "schema:address": [{
                    "hasAddressCity": {
                        "isPartOfDepartment": [{
                            "isPartOfRegion": [{ "rdfs:label": { "fr": [ARA] } }]
                        }]
                    }
                }]
            }]
        });
        assert!(RegionFilter::region(ARA).matches(&doc));
        assert!(!RegionFilter::region("Bretagne").matches(&doc));
    }

    #[test]
    fn test_located_at_path() {
        let doc = json!({
            "isLocatedAt": [{
                "schema:address": [{
                    "isPartOfDepartment": { "isPartOfRegion": { "rdfs:label": { "fr": ARA } } }
                }]
            }]
        });
        assert!(RegionFilter::region(ARA).matches(&doc));
    }

    #[test]
    fn test_flat_region_fields() {
        assert!(RegionFilter::region(ARA).matches(&json!({ "region": ARA })));
        assert!(RegionFilter::region(ARA).matches(&json!({ "_regions": ["Occitanie", ARA] })));
        assert!(!RegionFilter::region(ARA).matches(&json!({ "_regions": ["Occitanie"] })));
        assert!(!RegionFilter::region(ARA).matches(&json!({ "name": ARA })));
    }
}
