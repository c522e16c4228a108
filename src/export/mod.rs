//! 照合トレースの出力
//!
//! 拡張子で形式を決める。
//! - `.xlsx`: rust_xlsxwriter（ヘッダー太字、1行 = 1件）
//! - `.json`: 整形済みJSON配列
//! - それ以外: CSV（カンマ区切り）

use crate::error::Result;
use photo_link_common::MatchTrace;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};
use std::path::Path;

/// score列の位置
const SCORE_COLUMN: u16 = 6;

/// トレースの出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFormat {
    Csv,
    Json,
    Xlsx,
}

impl TraceFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("xlsx") => TraceFormat::Xlsx,
            Some("json") => TraceFormat::Json,
            _ => TraceFormat::Csv,
        }
    }
}

/// トレースを書き出す
///
/// 0件ならファイルを作らず `false` を返す。
pub fn write_trace(path: &Path, traces: &[MatchTrace]) -> Result<bool> {
    if traces.is_empty() {
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    match TraceFormat::from_path(path) {
        TraceFormat::Csv => std::fs::write(path, to_csv(traces))?,
        TraceFormat::Json => std::fs::write(path, serde_json::to_string_pretty(traces)?)?,
        TraceFormat::Xlsx => write_xlsx(path, traces)?,
    }

    Ok(true)
}

fn to_csv(traces: &[MatchTrace]) -> String {
    let mut out = String::new();
    push_csv_row(&mut out, MatchTrace::COLUMNS.iter().copied());
    for trace in traces {
        let values = trace.values();
        push_csv_row(&mut out, values.iter().map(String::as_str));
    }
    out
}

fn push_csv_row<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let row: Vec<String> = fields.map(escape_csv).collect();
    out.push_str(&row.join(","));
    out.push_str("\r\n");
}

/// 区切り・引用符・改行を含む値は "..." で囲む
fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn write_xlsx(path: &Path, traces: &[MatchTrace]) -> Result<()> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin);
    let score_format = Format::new().set_num_format("0.0");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("matches")?;

    for (col, name) in MatchTrace::COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header_format)?;
    }

    for (i, trace) in traces.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, value) in trace.values().iter().enumerate() {
            let col = col as u16;
            if col == SCORE_COLUMN {
                worksheet.write_number_with_format(row, col, trace.score, &score_format)?;
            } else {
                worksheet.write_string(row, col, value)?;
            }
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    workbook.save(path)?;
    Ok(())
}
