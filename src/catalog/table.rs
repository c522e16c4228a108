//! 表形式ファイルの読み込み
//!
//! - `.xlsx` / `.xlsm` / `.xls` / `.ods`: calamine（先頭シート）
//! - `.csv`: `,` または `;` 区切り（ヘッダー行で判定）

use crate::error::{PhotoLinkError, Result};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use std::path::Path;

/// ヘッダー行 + データ行
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// 先頭行をヘッダーとして扱う
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let mut iter = rows.into_iter();
        let headers = iter.next().unwrap_or_default();
        Self {
            headers,
            rows: iter.collect(),
        }
    }

    /// 列番号のセル値（範囲外・列なしは空文字）
    pub fn cell<'a>(row: &'a [String], column: Option<usize>) -> &'a str {
        column
            .and_then(|c| row.get(c))
            .map(|s| s.trim())
            .unwrap_or("")
    }
}

/// 拡張子に応じて表を読み込む
pub fn read_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(PhotoLinkError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => {
            let content = std::fs::read_to_string(path)?;
            Ok(parse_csv(&content))
        }
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => read_workbook(path),
        _ => Err(PhotoLinkError::CatalogRead(format!(
            "未対応の形式です（xlsx/xls/ods/csv）: {}",
            path.display()
        ))),
    }
}

fn read_workbook(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PhotoLinkError::CatalogRead(format!("シートがありません: {}", path.display())))??;

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(Table::from_rows(rows))
}

/// セル値を文字列に変換（整数値の浮動小数は ".0" を付けない）
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) => cell
            .as_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| cell.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => {
            log::debug!("セルエラー: {:?}", e);
            String::new()
        }
    }
}

fn format_number(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// CSV文字列を表に変換
///
/// 引用符内の改行はフィールドの一部として扱う。空行は読み飛ばす。
pub fn parse_csv(content: &str) -> Table {
    let content = content.trim_start_matches('\u{feff}');
    let header_line = match content.lines().find(|l| !l.trim().is_empty()) {
        Some(line) => line,
        None => return Table::default(),
    };
    let separator = detect_separator(header_line);

    let mut records = parse_records(content, separator).into_iter();
    let headers = records.next().unwrap_or_default();

    Table {
        headers,
        rows: records.collect(),
    }
}

/// ヘッダー行に多く現れる方を区切り文字とする
fn detect_separator(header_line: &str) -> char {
    let semicolons = header_line.matches(';').count();
    let commas = header_line.matches(',').count();
    if semicolons > commas {
        ';'
    } else {
        ','
    }
}

/// 全体をレコードに分割（"..." 内の区切り文字・改行と "" エスケープに対応）
fn parse_records(content: &str, separator: char) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == separator && !in_quotes => {
                record.push(std::mem::take(&mut field));
            }
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            '\n' if !in_quotes => {
                record.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
            }
            c => field.push(c),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }

    records
}

/// 空行（空白だけの1フィールド）は捨てる
fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    if record.len() == 1 && record[0].trim().is_empty() {
        return;
    }
    records.push(record);
}
