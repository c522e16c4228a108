//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use photo_link::catalog;
use photo_link::error::PhotoLinkError;
use photo_link::scanner::ImageIndex;
use photo_link::store::JsonFileStore;
use std::path::Path;
use tempfile::tempdir;

/// 存在しない画像フォルダ
#[test]
fn test_index_nonexistent_folder() {
    let result = ImageIndex::build(Path::new("/nonexistent/path/12345"));
    assert!(matches!(result, Err(PhotoLinkError::FolderNotFound(_))));
}

/// 画像のないフォルダは空の索引
#[test]
fn test_index_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("test.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let index = ImageIndex::build(dir.path()).unwrap();
    assert!(index.is_empty());
}

/// 必須列のないカタログは設定エラー
#[test]
fn test_catalog_missing_columns_is_fatal() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("catalog.csv");
    std::fs::write(&path, "Titre;Ville\nVulcania;Saint-Ours\n").unwrap();

    let err = catalog::load_catalog(&path).unwrap_err();
    assert!(err.is_fatal_config());

    let display = format!("{}", err);
    assert!(display.contains("Nom du fichier"));
    assert!(display.contains("Copyright"));
}

/// 存在しないカタログ
#[test]
fn test_catalog_not_found() {
    let err = catalog::load_catalog(Path::new("/nonexistent/catalog.xlsx")).unwrap_err();
    assert!(matches!(err, PhotoLinkError::FileNotFound(_)));
    assert!(!err.is_fatal_config());
}

/// 壊れた文書ストア
#[test]
fn test_store_invalid_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("objects.json");
    std::fs::write(&path, "[{\"_id\": }]").unwrap();

    let err = JsonFileStore::open(&path).unwrap_err();
    assert!(matches!(err, PhotoLinkError::JsonParse(_)));
}

/// PhotoLinkErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        PhotoLinkError::Config("テスト設定エラー".to_string()),
        PhotoLinkError::MissingColumns(vec!["Titre".to_string()]),
        PhotoLinkError::FileNotFound("catalog.xlsx".to_string()),
        PhotoLinkError::FolderNotFound("/path/to/folder".to_string()),
        PhotoLinkError::CatalogRead("読み込み失敗".to_string()),
        PhotoLinkError::DocumentNotFound("https://x/1".to_string()),
        PhotoLinkError::Store("ストアエラー".to_string()),
        PhotoLinkError::TraceExport("出力エラー".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: PhotoLinkError = io_err.into();

    assert!(matches!(err, PhotoLinkError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: PhotoLinkError = json_err.into();

    assert!(matches!(err, PhotoLinkError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_conversion() {
    let common_err = photo_link_common::Error::AlreadyResolved("img123.jpg".to_string());
    let err: PhotoLinkError = common_err.into();

    assert!(matches!(err, PhotoLinkError::Common(_)));
    assert!(format!("{}", err).contains("img123.jpg"));
}
