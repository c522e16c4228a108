//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Already resolved: {0}")]
    AlreadyResolved(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
