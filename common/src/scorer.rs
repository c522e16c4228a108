//! 複合スコアリングモジュール
//!
//! 写真1件とPOI文書（正規化済みの名称・所在地）から0〜100の信頼度を計算する。
//!
//! ## 判定順序
//! 1. 都市ゲート: 両方の都市が明記されていて類似度70未満なら0
//! 2. 完全一致: 正規化タイトルが一致し、都市が空か一致なら100
//! 3. あいまい一致: `0.80 * joint + 0.20 * title`（上限100）

use crate::similarity::{partial_ratio, token_set_ratio, weighted_ratio};
use crate::types::PhotoRecord;
use serde_json::{json, Value};

/// 都市ゲートの最低類似度
pub const CITY_GATE_MIN: f64 = 70.0;

/// "タイトル 都市" 結合比較の重み
pub const JOINT_WEIGHT: f64 = 0.80;

/// タイトル単独比較の重み
pub const TITLE_WEIGHT: f64 = 0.20;

/// スコアの内訳
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreBreakdown {
    /// 都市ゲートで棄却
    CityMismatch { city_sim: f64 },
    /// 完全一致
    Exact,
    /// あいまい一致
    Fuzzy { joint: f64, title: f64 },
}

impl ScoreBreakdown {
    /// トレース出力用のJSON表現
    pub fn to_json(&self) -> Value {
        match self {
            ScoreBreakdown::CityMismatch { city_sim } => {
                json!({ "reason": "city_mismatch", "city_sim": city_sim })
            }
            ScoreBreakdown::Exact => json!({ "exact": 100.0 }),
            ScoreBreakdown::Fuzzy { joint, title } => json!({ "joint": joint, "title": title }),
        }
    }
}

impl std::fmt::Display for ScoreBreakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// スコアと内訳
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// 写真1件と対象の正規化名称・所在地を比較する
pub fn composite_score(photo: &PhotoRecord, target_name_norm: &str, target_locality_norm: &str) -> ScoreResult {
    score_norms(photo.title_norm(), photo.city_norm(), target_name_norm, target_locality_norm)
}

/// 正規化済みの文字列同士で `composite_score` と同じ判定を行う
pub fn score_norms(
    photo_title_norm: &str,
    photo_city_norm: &str,
    target_name_norm: &str,
    target_locality_norm: &str,
) -> ScoreResult {
    // 1) 都市ゲート: 明記された2つの都市が違えばタイトルに関わらず棄却
    if !photo_city_norm.is_empty() && !target_locality_norm.is_empty() {
        let city_sim = weighted_ratio(photo_city_norm, target_locality_norm);
        if city_sim < CITY_GATE_MIN {
            return ScoreResult {
                score: 0.0,
                breakdown: ScoreBreakdown::CityMismatch { city_sim },
            };
        }
    }

    // 2) 完全一致
    if is_exact_match(photo_title_norm, photo_city_norm, target_name_norm, target_locality_norm) {
        return ScoreResult {
            score: 100.0,
            breakdown: ScoreBreakdown::Exact,
        };
    }

    // 3) あいまい一致
    let joint = joint_score(photo_title_norm, photo_city_norm, target_name_norm, target_locality_norm);
    let title = title_score(photo_title_norm, target_name_norm);

    ScoreResult {
        score: combine(joint, title),
        breakdown: ScoreBreakdown::Fuzzy { joint, title },
    }
}

/// joint/title から最終スコアを求める
pub fn combine(joint: f64, title: f64) -> f64 {
    (JOINT_WEIGHT * joint + TITLE_WEIGHT * title).min(100.0)
}

/// 候補抽出時の高速スコアと詳細スコアの大きい方（上限100）
pub fn blend_with_prefilter(score: f64, fast_score: f64) -> f64 {
    score.max(fast_score).min(100.0)
}

fn is_exact_match(photo_title: &str, photo_city: &str, target_name: &str, target_locality: &str) -> bool {
    if photo_title != target_name {
        return false;
    }
    photo_city.is_empty() || photo_city == target_locality
}

fn joint_score(photo_title: &str, photo_city: &str, target_name: &str, target_locality: &str) -> f64 {
    let a = format!("{} {}", photo_title, photo_city);
    let b = format!("{} {}", target_name, target_locality);
    let (a, b) = (a.trim(), b.trim());
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    weighted_ratio(a, b)
}

/// 3種類の指標の最大値（語順・部分一致・長さ差のどれかに強い）
fn title_score(a: &str, b: &str) -> f64 {
    weighted_ratio(a, b)
        .max(token_set_ratio(a, b))
        .max(partial_ratio(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonicalize;

    fn score(photo_title: &str, photo_city: &str, name: &str, locality: &str) -> ScoreResult {
        let photo = PhotoRecord::new("photo.jpg", photo_title, photo_city, "credit", "");
        composite_score(&photo, &canonicalize(name), &canonicalize(locality))
    }

    #[test]
    fn test_city_gate_rejects_identical_titles() {
        let result = score("Musée des Beaux-Arts", "Lyon", "Musée des Beaux-Arts", "Brest");
        assert_eq!(result.score, 0.0);
        assert!(matches!(result.breakdown, ScoreBreakdown::CityMismatch { city_sim } if city_sim < CITY_GATE_MIN));
    }

    #[test]
    fn test_city_gate_skipped_when_one_city_missing() {
        let result = score("Musée des Beaux-Arts", "Lyon", "Musée des Beaux-Arts", "");
        // 写真側に都市があり対象側が空 → 完全一致の条件を満たさないのであいまい一致
        assert!(matches!(result.breakdown, ScoreBreakdown::Fuzzy { .. }));
        assert!(result.score > 0.0);

        let result = score("Musée des Beaux-Arts", "", "Musée des Beaux-Arts", "Brest");
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn test_exact_match_without_cities() {
        let result = score("Château de Chambord", "", "chateau de chambord", "");
        assert_eq!(result.score, 100.0);
        assert_eq!(result.breakdown, ScoreBreakdown::Exact);
    }

    #[test]
    fn test_exact_match_with_same_city() {
        // St-Ours は "saint ours"、Saint-Ours は "saint-ours" になり完全一致にはならない
        let result = score("Vulcania", "Saint-Ours", "VULCANIA", "St-Ours");
        assert!(matches!(result.breakdown, ScoreBreakdown::Fuzzy { .. }));
        assert!(result.score > 90.0);

        let result = score("Vulcania", "Saint-Ours", "VULCANIA", "Saint-Ours");
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn test_score_norms_matches_composite() {
        let photo = PhotoRecord::new("a.jpg", "Vulcania", "Saint-Ours", "credit", "");
        assert_eq!(
            composite_score(&photo, "parc vulcania", "saint-ours"),
            score_norms("vulcania", "saint-ours", "parc vulcania", "saint-ours")
        );
    }

    #[test]
    fn test_combine_formula() {
        assert_eq!(combine(80.0, 60.0), 76.0);
        assert_eq!(combine(100.0, 100.0), 100.0);
        assert_eq!(combine(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_fuzzy_breakdown_consistent() {
        let result = score("Lac d'Annecy", "Annecy", "Le lac d'Annecy", "Annecy");
        match result.breakdown {
            ScoreBreakdown::Fuzzy { joint, title } => {
                assert!((result.score - combine(joint, title)).abs() < 1e-9);
                assert!(result.score > 80.0);
            }
            other => panic!("unexpected breakdown: {:?}", other),
        }
    }

    #[test]
    fn test_score_bounded() {
        let pairs = [
            ("Vulcania", "", "Parc Vulcania", ""),
            ("", "", "Vulcania", ""),
            ("Vulcania", "Saint-Ours", "", ""),
            ("Gorges de l'Ardèche", "Vallon-Pont-d'Arc", "Gorges de l'Ardeche", "Vallon Pont d'Arc"),
        ];
        for (t, c, n, l) in pairs {
            let result = score(t, c, n, l);
            assert!((0.0..=100.0).contains(&result.score), "{:?}", result);
        }
    }

    #[test]
    fn test_blend_with_prefilter() {
        assert_eq!(blend_with_prefilter(70.0, 90.0), 90.0);
        assert_eq!(blend_with_prefilter(95.0, 90.0), 95.0);
        assert_eq!(blend_with_prefilter(100.0, 100.0), 100.0);
    }

    #[test]
    fn test_breakdown_json() {
        let json = ScoreBreakdown::Fuzzy { joint: 80.0, title: 60.0 }.to_json();
        assert_eq!(json["joint"], 80.0);
        assert_eq!(json["title"], 60.0);
        let json = ScoreBreakdown::CityMismatch { city_sim: 12.5 }.to_json();
        assert_eq!(json["reason"], "city_mismatch");
        assert_eq!(ScoreBreakdown::Exact.to_string(), r#"{"exact":100.0}"#);
    }
}
