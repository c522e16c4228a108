//! 照合で使う型定義
//!
//! - PhotoRecord: フォトテーク（Excel）の1行
//! - ImageAttribution: 文書に書き込む画像クレジット
//! - MatchAction / MatchTrace: 採用した照合の監査ログ1行

use crate::error::{Error, Result};
use crate::normalizer::{canonicalize, department_code, join_norm};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// フォトテークの写真1件
///
/// 正規化フィールドは `new` でのみ生成され、後から編集できない。
/// ファイル解決の結果は `mark_resolved` で一度だけ設定される。
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    /// カタログに記載されたファイル名（ディスク上と一致するとは限らない）
    pub filename_declared: String,
    /// 正規形の元（`new` でのみ設定）
    title: String,
    city: String,
    /// クレジット（必須だが空でも読み込む）
    pub credit: String,
    /// 権利終了日（自由記述）
    pub rights_end: String,

    title_norm: String,
    city_norm: String,
    department: String,
    joint_norm: String,

    resolved_path: Option<PathBuf>,
    resolved_filename: Option<String>,
    file_found: bool,
    #[serde(skip)]
    resolved: bool,
}

impl PhotoRecord {
    pub fn new(
        filename_declared: impl Into<String>,
        title: impl Into<String>,
        city: impl Into<String>,
        credit: impl Into<String>,
        rights_end: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let city = city.into();
        let title_norm = canonicalize(&title);
        let city_norm = canonicalize(&city);
        let department = department_code(&title);
        let joint_norm = join_norm(&title_norm, &city_norm);

        Self {
            filename_declared: filename_declared.into(),
            title,
            city,
            credit: credit.into(),
            rights_end: rights_end.into(),
            title_norm,
            city_norm,
            department,
            joint_norm,
            resolved_path: None,
            resolved_filename: None,
            file_found: false,
            resolved: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn title_norm(&self) -> &str {
        &self.title_norm
    }

    pub fn city_norm(&self) -> &str {
        &self.city_norm
    }

    /// タイトル末尾などの "(63)" から取った県番号
    pub fn department(&self) -> &str {
        &self.department
    }

    /// 候補抽出用の "タイトル 都市" 正規形
    pub fn joint_norm(&self) -> &str {
        &self.joint_norm
    }

    pub fn resolved_path(&self) -> Option<&Path> {
        self.resolved_path.as_deref()
    }

    pub fn resolved_filename(&self) -> Option<&str> {
        self.resolved_filename.as_deref()
    }

    pub fn file_found(&self) -> bool {
        self.file_found
    }

    /// ファイル解決の結果を設定する（一度だけ）
    ///
    /// `path` が `None` なら見つからなかったことを記録する。
    pub fn mark_resolved(&mut self, path: Option<PathBuf>) -> Result<()> {
        if self.resolved {
            return Err(Error::AlreadyResolved(self.filename_declared.clone()));
        }
        self.resolved = true;

        if let Some(path) = path {
            self.resolved_filename = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string());
            self.resolved_path = Some(path);
            self.file_found = true;
        }

        Ok(())
    }

    /// クレジットが空（データ品質の警告対象）
    pub fn missing_credit(&self) -> bool {
        self.credit.trim().is_empty()
    }
}

/// 文書に書き込む画像クレジット
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttribution {
    pub origin: String,
    pub source: String,
    pub creator: String,
    pub license: String,
    pub license_url: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub filename: String,
    pub rights_end: String,
}

/// 採用した照合に対して取った処理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchAction {
    /// 画像を書き込んだ（ドライラン時は書き込み予定）
    Update,
    /// 既に画像があるので書き込まなかった
    SkipHasImage,
    /// 書き込みに失敗した
    Failed,
}

impl MatchAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchAction::Update => "update",
            MatchAction::SkipHasImage => "skip_has_image",
            MatchAction::Failed => "failed",
        }
    }
}

impl std::fmt::Display for MatchAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 照合トレース（1行 = 採用された1件）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchTrace {
    pub object_id: String,
    pub object_name: String,
    pub object_locality: String,
    pub photo_title: String,
    pub photo_city: String,
    pub photo_file: String,
    pub score: f64,
    pub action: MatchAction,
    /// update時は新しいURL、skip時は既存の画像URL
    pub image_url: String,
    pub credit: String,
    pub rights_end: String,
    /// スコア内訳（JSON文字列）
    pub breakdown: String,
}

impl MatchTrace {
    /// トレース出力の列名（出力順）
    pub const COLUMNS: [&'static str; 12] = [
        "object_id",
        "object_name",
        "object_locality",
        "photo_title",
        "photo_city",
        "photo_file",
        "score",
        "action",
        "image_url",
        "credit",
        "rights_end",
        "breakdown",
    ];

    /// 列順に並べた文字列値
    pub fn values(&self) -> [String; 12] {
        [
            self.object_id.clone(),
            self.object_name.clone(),
            self.object_locality.clone(),
            self.photo_title.clone(),
            self.photo_city.clone(),
            self.photo_file.clone(),
            self.score.to_string(),
            self.action.to_string(),
            self.image_url.clone(),
            self.credit.clone(),
            self.rights_end.clone(),
            self.breakdown.clone(),
        ]
    }
}
