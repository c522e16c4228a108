//! 画像フォルダの索引とファイル名解決
//!
//! カタログに書かれたファイル名は拡張子の欠落・接尾辞・誤字を含むため、
//! 次の順で実ファイルを探す。
//! 1. ベース名の完全一致（大文字小文字を無視）
//! 2. 拡張子を除いた名前の前方一致
//! 3. 重み付き類似度 >= 90 の最良候補

use crate::error::{PhotoLinkError, Result};
use photo_link_common::similarity::weighted_ratio;
use photo_link_common::PhotoRecord;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "tif", "tiff"];

/// あいまい一致で採用する最低類似度
pub const FUZZY_FILENAME_MIN: f64 = 90.0;

/// 解決に使った規則
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolveRule {
    Exact,
    Prefix,
    Fuzzy(f64),
}

/// 解決結果
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub rule: ResolveRule,
    pub path: PathBuf,
    pub file_name: String,
}

/// 画像ファイルの索引（小文字ベース名 → パス）
#[derive(Debug, Clone, Default)]
pub struct ImageIndex {
    by_lower_name: BTreeMap<String, PathBuf>,
}

impl ImageIndex {
    /// フォルダを再帰的に走査して索引を作る
    pub fn build(folder: &Path) -> Result<Self> {
        if !folder.is_dir() {
            return Err(PhotoLinkError::FolderNotFound(folder.display().to_string()));
        }

        let mut index = Self::default();

        for entry in WalkDir::new(folder)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            if is_image_file(entry.path()) {
                index.insert(entry.into_path());
            }
        }

        Ok(index)
    }

    /// パス一覧から索引を作る（同名ファイルは後勝ち）
    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut index = Self::default();
        for path in paths {
            if is_image_file(&path) {
                index.insert(path);
            }
        }
        index
    }

    fn insert(&mut self, path: PathBuf) {
        if let Some(name) = path.file_name() {
            let lower = name.to_string_lossy().to_lowercase();
            if let Some(previous) = self.by_lower_name.insert(lower, path) {
                log::debug!("同名ファイルを上書き: {}", previous.display());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.by_lower_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_lower_name.is_empty()
    }

    /// カタログのファイル名を実ファイルに解決する
    pub fn resolve(&self, declared: &str) -> Option<Resolution> {
        let base = base_name(declared).to_lowercase();
        if base.is_empty() {
            return None;
        }
        let stem = strip_extension(&base);

        // 1) 完全一致
        if let Some(path) = self.by_lower_name.get(&base) {
            return Some(self.resolution(ResolveRule::Exact, path));
        }

        // 2) 前方一致（拡張子なし・接尾辞付き）
        if !stem.is_empty() {
            if let Some((_, path)) = self
                .by_lower_name
                .iter()
                .find(|(name, _)| strip_extension(name).starts_with(stem))
            {
                return Some(self.resolution(ResolveRule::Prefix, path));
            }
        }

        // 3) あいまい一致（拡張子の違いは無視）
        let mut best: Option<(f64, &PathBuf)> = None;
        for (name, path) in &self.by_lower_name {
            let score = weighted_ratio(stem, strip_extension(name));
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, path));
            }
        }

        match best {
            Some((score, path)) if score >= FUZZY_FILENAME_MIN => {
                Some(self.resolution(ResolveRule::Fuzzy(score), path))
            }
            _ => None,
        }
    }

    fn resolution(&self, rule: ResolveRule, path: &Path) -> Resolution {
        Resolution {
            rule,
            path: path.to_path_buf(),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
        }
    }
}

/// 解決の集計
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveStats {
    pub total: usize,
    pub exact: usize,
    pub prefix: usize,
    pub fuzzy: usize,
    /// 見つからなかったカタログ上のファイル名
    pub missing: Vec<String>,
}

impl ResolveStats {
    pub fn found(&self) -> usize {
        self.exact + self.prefix + self.fuzzy
    }
}

/// カタログ全件のファイルを解決し、`PhotoRecord` に結果を記録する
pub fn resolve_catalog(records: &mut [PhotoRecord], index: &ImageIndex) -> Result<ResolveStats> {
    let mut stats = ResolveStats {
        total: records.len(),
        ..Default::default()
    };

    for record in records.iter_mut() {
        let resolution = index.resolve(&record.filename_declared);

        match &resolution {
            Some(r) => {
                log::debug!("{} → {} ({:?})", record.filename_declared, r.file_name, r.rule);
                match r.rule {
                    ResolveRule::Exact => stats.exact += 1,
                    ResolveRule::Prefix => stats.prefix += 1,
                    ResolveRule::Fuzzy(_) => stats.fuzzy += 1,
                }
            }
            None => stats.missing.push(record.filename_declared.clone()),
        }

        record.mark_resolved(resolution.map(|r| r.path))?;
    }

    Ok(stats)
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| is_image_extension(&ext.to_string_lossy()))
        .unwrap_or(false)
}

/// 対応する画像拡張子か（大文字小文字を無視）
pub fn is_image_extension(ext: &str) -> bool {
    let ext = ext.to_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// パス区切り（/ と \）を除いたファイル名
fn base_name(declared: &str) -> &str {
    let trimmed = declared.trim();
    trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed)
}

/// 最後の "." 以降を除く（先頭の "." は拡張子とみなさない）
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) if i > 0 => &name[..i],
        _ => name,
    }
}
