//! 採否の判定と文書への書き込み

use super::candidates::Shortlisted;
use crate::store::{DocumentStore, TargetDocument};
use photo_link_common::{
    blend_with_prefilter, composite_score, ImageAttribution, MatchAction, MatchTrace, PhotoRecord,
    ScoreBreakdown,
};

/// 照合1回分の設定
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOptions {
    /// 画像の公開URLの基点
    pub base_url: String,
    /// クレジットの出典名
    pub origin: String,
    pub min_score: f64,
    pub top_k: usize,
    /// 既存の画像を上書きする
    pub force: bool,
    /// 判定だけ行い書き込まない
    pub dry_run: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            base_url: "/static/img/phototheque".into(),
            origin: "Photothèque Auvergne-Rhône-Alpes Tourisme".into(),
            min_score: 85.0,
            top_k: 1,
            force: false,
            dry_run: false,
        }
    }
}

/// 対象1件と写真1件の組（照合中だけ存在する）
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub photo_index: usize,
    /// 最終スコア（詳細スコアと絞り込みスコアの大きい方）
    pub score: f64,
    pub fast_score: f64,
    pub breakdown: ScoreBreakdown,
}

/// 候補を詳細スコアで並べ、閾値以上を上位 `top_k` 件まで残す
pub fn select(
    target: &TargetDocument,
    shortlist: &[Shortlisted],
    photos: &[PhotoRecord],
    options: &MatchOptions,
) -> Vec<MatchCandidate> {
    let name_norm = target.name_norm();
    let locality_norm = target.locality_norm();

    let mut scored: Vec<MatchCandidate> = shortlist
        .iter()
        .filter_map(|s| {
            let photo = photos.get(s.index)?;
            let result = composite_score(photo, &name_norm, &locality_norm);
            // 都市ゲートで棄却された組は絞り込みスコアで救わない
            let score = match result.breakdown {
                ScoreBreakdown::CityMismatch { .. } => result.score,
                _ => blend_with_prefilter(result.score, s.fast_score),
            };
            Some(MatchCandidate {
                photo_index: s.index,
                score,
                fast_score: s.fast_score,
                breakdown: result.breakdown,
            })
        })
        .collect();

    // 安定ソートなので同点は絞り込み順のまま
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    scored
        .into_iter()
        .filter(|c| c.score >= options.min_score)
        .take(options.top_k)
        .collect()
}

/// 公開URL（基点の末尾 "/" は1つにまとめる）
pub fn public_url(base_url: &str, filename: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), filename)
}

/// 写真から画像クレジットを作る
pub fn build_attribution(photo: &PhotoRecord, origin: &str) -> ImageAttribution {
    ImageAttribution {
        origin: origin.to_string(),
        source: String::new(),
        creator: photo.credit.clone(),
        license: String::new(),
        license_url: String::new(),
        reference: photo.filename_declared.clone(),
        filename: photo.resolved_filename().unwrap_or_default().to_string(),
        rights_end: photo.rights_end.clone(),
    }
}

/// 採用した組ごとに書き込みを行い、トレースを返す
///
/// 既存の画像は `force` がなければ残す。書き込みの失敗はその行だけ `failed` とする。
pub fn apply<S: DocumentStore + ?Sized>(
    store: &mut S,
    target: &TargetDocument,
    kept: &[MatchCandidate],
    photos: &[PhotoRecord],
    options: &MatchOptions,
) -> Vec<MatchTrace> {
    let mut traces = Vec::with_capacity(kept.len());

    for candidate in kept {
        let photo = match photos.get(candidate.photo_index) {
            Some(p) => p,
            None => continue,
        };
        let file_name = photo.resolved_filename().unwrap_or_default();
        let url = public_url(&options.base_url, file_name);

        let (action, image_url) = if target.has_image() && !options.force {
            (MatchAction::SkipHasImage, target.image.clone())
        } else {
            let attribution = build_attribution(photo, &options.origin);
            if options.dry_run {
                log::debug!("（ドライラン）{} ← {} {:?}", target.id, url, attribution);
                (MatchAction::Update, url)
            } else {
                match store.set_image(&target.id, &url, &attribution) {
                    Ok(()) => (MatchAction::Update, url),
                    Err(e) => {
                        log::error!("書き込みに失敗しました（{}）: {}", target.id, e);
                        (MatchAction::Failed, url)
                    }
                }
            }
        };

        traces.push(MatchTrace {
            object_id: target.id.to_string(),
            object_name: target.display_name.clone(),
            object_locality: target.locality.clone(),
            photo_title: photo.title().to_string(),
            photo_city: photo.city().to_string(),
            photo_file: file_name.to_string(),
            score: candidate.score,
            action,
            image_url,
            credit: photo.credit.clone(),
            rights_end: photo.rights_end.clone(),
            breakdown: candidate.breakdown.to_string(),
        });
    }

    traces
}
