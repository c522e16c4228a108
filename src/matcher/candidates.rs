//! 候補写真の絞り込み
//!
//! 対象1件ごとに全カタログを重み付き類似度だけで並べ、上位を詳細スコアリングに回す。
//! 都市ゲートや完全一致の判定はしないので、ここでの順位で採否を決めてはいけない。

use photo_link_common::similarity::weighted_ratio;
use photo_link_common::PhotoRecord;
use rayon::prelude::*;

/// 詳細スコアリングに回す最大件数
pub const CANDIDATE_LIMIT: usize = 20;

/// 絞り込みで残った写真
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shortlisted {
    /// カタログ内の位置
    pub index: usize,
    pub fast_score: f64,
}

pub struct CandidateGenerator {
    /// (カタログ内の位置, "タイトル 都市" 正規形)
    entries: Vec<(usize, String)>,
    limit: usize,
}

impl CandidateGenerator {
    /// ファイルが見つかった写真だけを対象にする
    pub fn new(photos: &[PhotoRecord]) -> Self {
        let entries = photos
            .iter()
            .enumerate()
            .filter(|(_, p)| p.file_found())
            .map(|(i, p)| (i, p.joint_norm().to_string()))
            .collect();

        Self {
            entries,
            limit: CANDIDATE_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// 照合可能な写真の件数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 対象の "名称 所在地" 正規形に近い順に最大 `limit` 件を返す
    ///
    /// 同点はカタログ順。
    pub fn shortlist(&self, query_joint: &str) -> Vec<Shortlisted> {
        if query_joint.trim().is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<Shortlisted> = self
            .entries
            .par_iter()
            .map(|(index, joint)| Shortlisted {
                index: *index,
                fast_score: weighted_ratio(query_joint, joint),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.fast_score
                .total_cmp(&a.fast_score)
                .then_with(|| a.index.cmp(&b.index))
        });
        scored.truncate(self.limit);
        scored
    }
}
