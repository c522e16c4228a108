//! フォトテークカタログ読み込みモジュール
//!
//! Excel/CSVのメタデータから `PhotoRecord` を1行ずつ生成する。
//! 列は論理フィールドごとの同義語リストで一度だけ解決する。

pub mod table;

pub use table::{read_table, Table};

use crate::error::{PhotoLinkError, Result};
use photo_link_common::{canonicalize, PhotoRecord};
use std::path::Path;

/// カタログの論理フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogField {
    Filename,
    Title,
    City,
    Credit,
    RightsEnd,
}

impl CatalogField {
    pub const ALL: [CatalogField; 5] = [
        CatalogField::Filename,
        CatalogField::Title,
        CatalogField::City,
        CatalogField::Credit,
        CatalogField::RightsEnd,
    ];

    /// 受け付ける列名（優先順）
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            CatalogField::Filename => &["Nom du fichier", "Fichier", "filename", "Fichier source", "File"],
            CatalogField::Title => &["Titre", "title", "Libellé", "Libelle", "Nom"],
            CatalogField::City => &["Ville", "Commune", "City", "Localité", "Localite"],
            CatalogField::Credit => &["Copyright", "Crédit photo", "credit", "Crédit", "Credits"],
            CatalogField::RightsEnd => &["Date de fin de droits", "Fin droits", "rights_end", "Date fin droits"],
        }
    }

    /// 見つからなければ設定エラーとなるフィールド
    pub fn required(&self) -> bool {
        matches!(self, CatalogField::Filename | CatalogField::Title | CatalogField::Credit)
    }
}

impl std::fmt::Display for CatalogField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // エラー表示には代表の列名を使う
        write!(f, "{}", self.synonyms()[0])
    }
}

/// フィールド → 列番号の対応
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    filename: usize,
    title: usize,
    city: Option<usize>,
    credit: usize,
    rights_end: Option<usize>,
}

impl ColumnMapping {
    /// ヘッダー行から列を解決する
    ///
    /// 同義語の順に完全一致（前後空白除去）を探し、なければ正規形で比較する。
    /// 必須フィールドが1つでも欠けると `MissingColumns`。
    pub fn resolve(headers: &[String]) -> Result<Self> {
        let find = |field: CatalogField| find_column(headers, field);

        let missing: Vec<String> = CatalogField::ALL
            .iter()
            .filter(|f| f.required() && find(**f).is_none())
            .map(|f| f.to_string())
            .collect();

        match (
            find(CatalogField::Filename),
            find(CatalogField::Title),
            find(CatalogField::Credit),
        ) {
            (Some(filename), Some(title), Some(credit)) if missing.is_empty() => Ok(Self {
                filename,
                title,
                city: find(CatalogField::City),
                credit,
                rights_end: find(CatalogField::RightsEnd),
            }),
            _ => Err(PhotoLinkError::MissingColumns(missing)),
        }
    }

    pub fn column(&self, field: CatalogField) -> Option<usize> {
        match field {
            CatalogField::Filename => Some(self.filename),
            CatalogField::Title => Some(self.title),
            CatalogField::City => self.city,
            CatalogField::Credit => Some(self.credit),
            CatalogField::RightsEnd => self.rights_end,
        }
    }
}

fn find_column(headers: &[String], field: CatalogField) -> Option<usize> {
    let synonyms = field.synonyms();

    for synonym in synonyms {
        if let Some(i) = headers.iter().position(|h| h.trim() == *synonym) {
            return Some(i);
        }
    }

    // 大文字小文字・アクセント違いの列名
    let normalized: Vec<String> = headers.iter().map(|h| canonicalize(h)).collect();
    for synonym in synonyms {
        let target = canonicalize(synonym);
        if let Some(i) = normalized.iter().position(|h| *h == target) {
            return Some(i);
        }
    }

    None
}

/// カタログ読み込み結果
#[derive(Debug, Clone)]
pub struct CatalogLoad {
    pub records: Vec<PhotoRecord>,
    pub mapping: ColumnMapping,
    /// 読み込んだデータ行数（空行を除く）
    pub rows_read: usize,
    /// クレジットが空の行数
    pub missing_credit: usize,
}

/// カタログファイルを読み込む
pub fn load_catalog(path: &Path) -> Result<CatalogLoad> {
    let table = read_table(path)?;
    records_from_table(&table)
}

/// 表から `PhotoRecord` を生成する
///
/// 欠損セルは空文字として扱い、行を捨てない。
/// 対応列がすべて空の行（Excelの余白行）だけは読み飛ばす。
pub fn records_from_table(table: &Table) -> Result<CatalogLoad> {
    let mapping = ColumnMapping::resolve(&table.headers)?;
    let mut records = Vec::with_capacity(table.rows.len());
    let mut missing_credit = 0;

    for (line, row) in table.rows.iter().enumerate() {
        let get = |field: CatalogField| Table::cell(row, mapping.column(field));

        let filename = get(CatalogField::Filename);
        let title = get(CatalogField::Title);
        let city = get(CatalogField::City);
        let credit = get(CatalogField::Credit);
        let rights_end = get(CatalogField::RightsEnd);

        if [filename, title, city, credit, rights_end].iter().all(|v| v.is_empty()) {
            continue;
        }

        let record = PhotoRecord::new(filename, title, city, credit, rights_end);
        if record.missing_credit() {
            // ヘッダー行を1行目として数える
            log::warn!("クレジットが空です（{}行目）: {}", line + 2, filename);
            missing_credit += 1;
        }
        records.push(record);
    }

    Ok(CatalogLoad {
        rows_read: records.len(),
        records,
        mapping,
        missing_credit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_primary_synonyms() {
        let mapping = ColumnMapping::resolve(&headers(&[
            "Nom du fichier",
            "Titre",
            "Ville",
            "Copyright",
            "Date de fin de droits",
        ]))
        .unwrap();
        assert_eq!(mapping.column(CatalogField::Filename), Some(0));
        assert_eq!(mapping.column(CatalogField::RightsEnd), Some(4));
    }

    #[test]
    fn test_resolve_synonym_order_wins() {
        // "Titre" が "Nom" より優先
        let mapping =
            ColumnMapping::resolve(&headers(&["Nom", "File", "Titre", "Credits"])).unwrap();
        assert_eq!(mapping.column(CatalogField::Title), Some(2));
        assert_eq!(mapping.column(CatalogField::City), None);
    }

    #[test]
    fn test_resolve_trims_and_normalizes_headers() {
        let mapping =
            ColumnMapping::resolve(&headers(&[" Fichier ", "LIBELLÉ", "crédit photo"])).unwrap();
        assert_eq!(mapping.column(CatalogField::Filename), Some(0));
        assert_eq!(mapping.column(CatalogField::Title), Some(1));
        assert_eq!(mapping.column(CatalogField::Credit), Some(2));
    }

    #[test]
    fn test_resolve_missing_required_columns() {
        let err = ColumnMapping::resolve(&headers(&["Titre", "Ville"])).unwrap_err();
        match err {
            PhotoLinkError::MissingColumns(missing) => {
                assert_eq!(missing, vec!["Nom du fichier".to_string(), "Copyright".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_records_from_table() {
        let table = Table {
            headers: headers(&["Fichier", "Titre", "Commune", "Copyright"]),
            rows: vec![
                row(&["IMG_1.jpg", "Château de Murol (63)", "Murol", "J. Damase"]),
                row(&["IMG_2.jpg", "Vulcania", "", ""]),
                row(&["", "", "", ""]),
                row(&["IMG_3.jpg"]),
            ],
        };

        let load = records_from_table(&table).unwrap();
        assert_eq!(load.rows_read, 3);
        assert_eq!(load.missing_credit, 2);

        let first = &load.records[0];
        assert_eq!(first.title_norm(), "chateau de murol (63)");
        assert_eq!(first.department(), "63");
        assert_eq!(first.rights_end, "");

        // 短い行も空文字で埋める
        assert_eq!(load.records[2].filename_declared, "IMG_3.jpg");
        assert_eq!(load.records[2].title(), "");
    }
}
