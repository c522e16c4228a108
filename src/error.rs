use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoLinkError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("カタログの必須列が見つかりません: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("カタログ読み込みエラー: {0}")]
    CatalogRead(String),

    #[error("文書が見つかりません: {0}")]
    DocumentNotFound(String),

    #[error("文書ストアエラー: {0}")]
    Store(String),

    #[error("トレース出力エラー: {0}")]
    TraceExport(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] photo_link_common::Error),
}

impl PhotoLinkError {
    /// 実行前に中断すべき設定系のエラーか
    pub fn is_fatal_config(&self) -> bool {
        matches!(self, PhotoLinkError::Config(_) | PhotoLinkError::MissingColumns(_))
    }
}

impl From<calamine::Error> for PhotoLinkError {
    fn from(e: calamine::Error) -> Self {
        PhotoLinkError::CatalogRead(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for PhotoLinkError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        PhotoLinkError::TraceExport(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PhotoLinkError>;
