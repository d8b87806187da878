//! TEFAS 스프레드시트 내보내기 파일 소스 (`.xlsx` / `.xls` / `.ods`).
//!
//! 첫 번째 시트의 첫 행을 헤더로 보고 열을 찾습니다.
//!
//! - 날짜 열: 헤더에 `tarih` 또는 `date` 포함
//! - 가격 열: 헤더에 `birim`+`pay` 또는 `unit`+`share` 포함
//!
//! 둘 중 하나라도 없으면 경고와 함께 빈 결과를 반환합니다.
//! 날짜 셀과 숫자 셀은 타입을 유지한 채 정규화 단계로 넘깁니다.

use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Range, Reader};
use gostergec_core::{DateRange, RawField, RawFundRow};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::fund_source::FundPriceSource;
use super::header_key;
use crate::error::{DataError, Result};

/// 날짜/가격 열 위치.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub price: usize,
}

/// 헤더 목록에서 날짜/가격 열을 찾습니다.
///
/// 조건에 맞는 헤더가 여러 개면 가장 왼쪽 열을 사용합니다.
/// 뒤쪽의 중복 열이나 파생 열(예: `Birim Pay (USD)`)은 무시됩니다.
pub fn locate_columns<S: AsRef<str>>(headers: &[S]) -> Option<ColumnMap> {
    let keys: Vec<String> = headers.iter().map(|h| header_key(h.as_ref())).collect();

    let date = keys
        .iter()
        .position(|k| k.contains("tarih") || k.contains("date"))?;
    let price = keys.iter().position(|k| {
        (k.contains("birim") && k.contains("pay")) || (k.contains("unit") && k.contains("share"))
    })?;

    Some(ColumnMap { date, price })
}

fn cell_to_raw(cell: Option<&Data>) -> RawField {
    match cell {
        None | Some(Data::Empty) => RawField::Empty,
        Some(Data::String(s)) => RawField::text(s),
        Some(Data::Float(f)) => RawField::Number(*f),
        Some(Data::Int(i)) => RawField::Number(*i as f64),
        Some(Data::DateTime(dt)) => dt
            .as_datetime()
            .map_or(RawField::Empty, |d| RawField::Date(d.date())),
        // ISO 날짜-시간 문자열은 날짜 부분만 사용
        Some(Data::DateTimeIso(s)) => RawField::text(s.get(..10).unwrap_or(s)),
        Some(other) => RawField::text(&other.to_string()),
    }
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// 시트 범위를 원시 행으로 변환합니다.
pub fn rows_from_range(range: &Range<Data>) -> Vec<RawFundRow> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        warn!("빈 시트");
        return Vec::new();
    };

    let headers: Vec<String> = header_row.iter().map(header_text).collect();
    let Some(columns) = locate_columns(&headers) else {
        warn!(headers = ?headers, "날짜/가격 열을 찾을 수 없음");
        return Vec::new();
    };

    rows.map(|row| RawFundRow {
        date: cell_to_raw(row.get(columns.date)),
        price: cell_to_raw(row.get(columns.price)),
    })
    .collect()
}

/// 스프레드시트 파일 하나를 읽는 소스.
#[derive(Debug, Clone)]
pub struct SpreadsheetFundFile {
    path: PathBuf,
}

impl SpreadsheetFundFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_rows(path: &Path) -> Result<Vec<RawFundRow>> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| DataError::SpreadsheetError(format!("{}: 시트 없음", path.display())))??;
        Ok(rows_from_range(&range))
    }
}

#[async_trait]
impl FundPriceSource for SpreadsheetFundFile {
    fn name(&self) -> &'static str {
        "spreadsheet"
    }

    async fn fetch_raw(&self, fund_code: &str, _range: &DateRange) -> Result<Vec<RawFundRow>> {
        let path = self.path.clone();
        let rows = tokio::task::spawn_blocking(move || Self::read_rows(&path))
            .await
            .map_err(|e| DataError::SpreadsheetError(e.to_string()))??;

        info!(fund_code, path = %self.path.display(), rows = rows.len(), "스프레드시트 읽음");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_turkish_and_english_headers() {
        let turkish = ["TARİH", "FON KODU", "BİRİM PAY DEĞERİ", "Kişi Sayısı"];
        assert_eq!(locate_columns(&turkish), Some(ColumnMap { date: 0, price: 2 }));

        let english = ["Fund", "Date", "Unit Share Value"];
        assert_eq!(locate_columns(&english), Some(ColumnMap { date: 1, price: 2 }));
    }

    #[test]
    fn test_first_matching_header_wins() {
        let headers = ["Tarih", "Update Date", "Birim Pay Değeri", "Birim Pay (USD)"];
        assert_eq!(locate_columns(&headers), Some(ColumnMap { date: 0, price: 2 }));
    }

    #[test]
    fn test_duplicate_price_columns_read_leftmost() {
        let mut range = Range::new((0, 0), (1, 2));
        range.set_value((0, 0), Data::String("Tarih".into()));
        range.set_value((0, 1), Data::String("Birim Pay Değeri".into()));
        range.set_value((0, 2), Data::String("Birim Pay Değeri".into()));
        range.set_value((1, 0), Data::String("15.03.2024".into()));
        range.set_value((1, 1), Data::Float(1.5));
        range.set_value((1, 2), Data::Float(9.9));

        let rows = rows_from_range(&range);
        assert_eq!(rows, vec![RawFundRow::new("15.03.2024", RawField::Number(1.5))]);
    }

    #[test]
    fn test_missing_column() {
        assert_eq!(locate_columns(&["Tarih", "Fiyat"]), None);
    }

    #[test]
    fn test_rows_from_range_keeps_cell_types() {
        let mut range = Range::new((0, 0), (3, 1));
        range.set_value((0, 0), Data::String("Tarih".into()));
        range.set_value((0, 1), Data::String("Birim Pay Değeri".into()));
        range.set_value((1, 0), Data::String("15.03.2024".into()));
        range.set_value((1, 1), Data::Float(1.234567));
        range.set_value((2, 0), Data::DateTimeIso("2024-03-18T00:00:00".into()));
        range.set_value((2, 1), Data::String("1,25".into()));

        let rows = rows_from_range(&range);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], RawFundRow::new("15.03.2024", RawField::Number(1.234567)));
        assert_eq!(rows[1], RawFundRow::new("2024-03-18", "1,25"));
        assert_eq!(rows[2], RawFundRow::new(RawField::Empty, RawField::Empty));
    }

    #[test]
    fn test_headers_without_match_yield_nothing() {
        let mut range = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("A".into()));
        range.set_value((0, 1), Data::String("B".into()));
        range.set_value((1, 0), Data::String("x".into()));
        assert!(rows_from_range(&range).is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_file_is_error() {
        let source = SpreadsheetFundFile::new("/nonexistent/TYH.xlsx");
        let range = DateRange::unbounded();
        assert!(source.fetch_raw("TYH", &range).await.is_err());
    }
}
