//! 写真と対象文書の照合パイプライン
//!
//! 対象文書を1件ずつ順に処理する。
//! 1. 候補抽出（`candidates`）
//! 2. 詳細スコアリングと採否（`policy::select`）
//! 3. 書き込みとトレース（`policy::apply`）

pub mod candidates;
pub mod policy;

pub use candidates::{CandidateGenerator, Shortlisted, CANDIDATE_LIMIT};
pub use policy::{apply, build_attribution, public_url, select, MatchCandidate, MatchOptions};

use crate::config::validate_thresholds;
use crate::error::Result;
use crate::store::{DocumentStore, RegionFilter};
use indicatif::{ProgressBar, ProgressStyle};
use photo_link_common::{MatchAction, MatchTrace, PhotoRecord};

/// 照合1回分の結果
#[derive(Debug, Clone, Default)]
pub struct MatchReport {
    /// 処理した対象文書の数
    pub targets: usize,
    pub traces: Vec<MatchTrace>,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    /// 採用された写真がなかった対象文書の数
    pub unmatched: usize,
}

impl MatchReport {
    fn record(&mut self, traces: Vec<MatchTrace>) {
        if traces.is_empty() {
            self.unmatched += 1;
        }
        for trace in &traces {
            match trace.action {
                MatchAction::Update => self.updated += 1,
                MatchAction::SkipHasImage => self.skipped += 1,
                MatchAction::Failed => self.failed += 1,
            }
        }
        self.traces.extend(traces);
    }
}

/// 対象文書を読み込み、照合して書き込む
///
/// `show_progress` が false なら進捗バーを出さない。
pub fn run_matching<S: DocumentStore + ?Sized>(
    photos: &[PhotoRecord],
    store: &mut S,
    filter: &RegionFilter,
    options: &MatchOptions,
    show_progress: bool,
) -> Result<MatchReport> {
    validate_thresholds(options.min_score, options.top_k)?;

    let targets = store.find_targets(filter)?;
    let generator = CandidateGenerator::new(photos);
    log::debug!("対象文書 {}件 / 照合可能な写真 {}件", targets.len(), generator.len());

    let progress = if show_progress {
        let bar = ProgressBar::new(targets.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut report = MatchReport {
        targets: targets.len(),
        ..Default::default()
    };

    for target in &targets {
        progress.set_message(target.display_name.clone());

        let shortlist = generator.shortlist(&target.joint_norm());
        let kept = select(target, &shortlist, photos, options);
        let traces = apply(store, target, &kept, photos, options);
        report.record(traces);

        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PhotoLinkError;
    use crate::store::MemoryStore;
    use serde_json::json;
    use std::path::PathBuf;

    fn photo(file: &str, title: &str, city: &str) -> PhotoRecord {
        let mut p = PhotoRecord::new(file, title, city, "OT Murol", "");
        p.mark_resolved(Some(PathBuf::from(format!("/photos/{}", file)))).unwrap();
        p
    }

    fn doc(id: &str, name: &str, city: &str) -> serde_json::Value {
        json!({
            "@id": id,
            "rdfs:label": { "fr": name },
            "isLocatedAt": [{ "schema:address": [{ "schema:addressLocality": city }] }]
        })
    }

    #[test]
    fn test_run_matching_counts() {
        let photos = vec![
            photo("murol.jpg", "Château de Murol", "Murol"),
            photo("pavin.jpg", "Lac Pavin", "Besse-et-Saint-Anastaise"),
        ];
        let mut store = MemoryStore::new(vec![
            doc("https://x/murol", "Château de Murol", "Murol"),
            doc("https://x/vulcania", "Vulcania", "Saint-Ours"),
        ]);

        let report =
            run_matching(&photos, &mut store, &RegionFilter::all(), &MatchOptions::default(), false)
                .unwrap();

        assert_eq!(report.targets, 2);
        assert_eq!(report.updated, 1);
        assert_eq!(report.unmatched, 1);
        assert_eq!(report.traces.len(), 1);
        assert_eq!(report.traces[0].object_id, "https://x/murol");
        assert_eq!(report.traces[0].photo_file, "murol.jpg");
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_run_matching_rejects_invalid_options() {
        let mut store = MemoryStore::default();
        let options = MatchOptions { top_k: 0, ..MatchOptions::default() };
        let result = run_matching(&[], &mut store, &RegionFilter::all(), &options, false);
        assert!(matches!(result, Err(PhotoLinkError::Config(_))));
    }

    #[test]
    fn test_run_matching_skips_unresolved_photos() {
        let photos = vec![PhotoRecord::new("absent.jpg", "Château de Murol", "Murol", "c", "")];
        let mut store = MemoryStore::new(vec![doc("https://x/murol", "Château de Murol", "Murol")]);

        let report =
            run_matching(&photos, &mut store, &RegionFilter::all(), &MatchOptions::default(), false)
                .unwrap();
        assert!(report.traces.is_empty());
        assert_eq!(report.unmatched, 1);
    }
}
