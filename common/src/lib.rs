//! Photo Link Common Library
//!
//! 写真カタログとPOI文書の照合コア（正規化・類似度・スコアリング）。
//! I/Oを持たないため、CLI以外のフロントエンドからも利用できる。

pub mod error;
pub mod normalizer;
pub mod scorer;
pub mod similarity;
pub mod types;

pub use error::{Error, Result};
pub use normalizer::{canonicalize, department_code, join_norm};
pub use scorer::{blend_with_prefilter, composite_score, score_norms, ScoreBreakdown, ScoreResult};
pub use types::{ImageAttribution, MatchAction, MatchTrace, PhotoRecord};
