use crate::error::{PhotoLinkError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 照合の既定設定（~/.config/photo-link/config.json）
///
/// CLI引数で指定された値が常に優先される。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 画像を展開したフォルダ
    pub images_dir: PathBuf,
    /// 画像フォルダに対応する公開URL
    pub base_url: String,
    /// 文書ストア（JSON / JSON Lines）
    pub store_path: PathBuf,
    /// 対象文書を絞り込む地域名（空なら全件）
    pub region: String,
    /// 採用する最低スコア
    pub min_score: f64,
    /// 文書あたりの最大採用数
    pub top_k: usize,
    /// クレジットの出典名
    pub origin: String,
    /// トレース出力先
    pub trace_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from("static/img/phototheque"),
            base_url: "/static/img/phototheque".into(),
            store_path: PathBuf::from("objects.json"),
            region: "Auvergne-Rhône-Alpes".into(),
            min_score: 85.0,
            top_k: 1,
            origin: "Photothèque Auvergne-Rhône-Alpes Tourisme".into(),
            trace_path: PathBuf::from("matches_out.csv"),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PhotoLinkError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("photo-link").join("config.json"))
    }

    /// 値の範囲チェック
    pub fn validate(&self) -> Result<()> {
        validate_thresholds(self.min_score, self.top_k)
    }

    pub fn set_base_url(&mut self, base_url: String) -> Result<()> {
        self.base_url = base_url;
        self.save()
    }

    pub fn set_min_score(&mut self, min_score: f64) -> Result<()> {
        self.min_score = min_score;
        self.save()
    }
}

/// 最低スコアと採用数の範囲チェック
pub fn validate_thresholds(min_score: f64, top_k: usize) -> Result<()> {
    if !(0.0..=100.0).contains(&min_score) {
        return Err(PhotoLinkError::Config(format!(
            "min_score は0〜100で指定してください: {}",
            min_score
        )));
    }
    if top_k == 0 {
        return Err(PhotoLinkError::Config("topk は1以上で指定してください".into()));
    }
    Ok(())
}
