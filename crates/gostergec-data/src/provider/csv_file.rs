//! 수동으로 내보낸 TEFAS CSV 파일 소스.
//!
//! - 구분자: 처음 1024바이트에 `;`가 있으면 `;`, 아니면 `,`
//! - 인코딩: UTF-8 (BOM 허용)
//! - 날짜 열: `Tarih` / `Date`
//! - 가격 열: `Birim Pay Değeri` / `BirimPayDegeri` / `Price`

use async_trait::async_trait;
use gostergec_core::{DateRange, RawField, RawFundRow};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::fund_source::FundPriceSource;
use super::header_key;
use crate::error::{DataError, Result};

const SNIFF_BYTES: usize = 1024;
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const DATE_HEADERS: [&str; 2] = ["Tarih", "Date"];
const PRICE_HEADERS: [&str; 3] = ["Birim Pay Değeri", "BirimPayDegeri", "Price"];

/// CSV 파일 하나를 읽는 소스.
#[derive(Debug, Clone)]
pub struct CsvFundFile {
    path: PathBuf,
}

impl CsvFundFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 구분자를 추정합니다.
fn sniff_delimiter(content: &[u8]) -> u8 {
    let head = &content[..content.len().min(SNIFF_BYTES)];
    if head.contains(&b';') {
        b';'
    } else {
        b','
    }
}

/// 별칭 목록 중 처음 일치하는 열 번호.
fn find_column(headers: &csv::StringRecord, aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|alias| {
        let alias = header_key(alias);
        headers.iter().position(|h| header_key(h) == alias)
    })
}

/// CSV 내용을 원시 행으로 파싱합니다.
pub fn parse_csv(content: &[u8]) -> Result<Vec<RawFundRow>> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(content))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let headers = reader.headers()?.clone();
    let (date_idx, price_idx) = match (
        find_column(&headers, &DATE_HEADERS),
        find_column(&headers, &PRICE_HEADERS),
    ) {
        (Some(d), Some(p)) => (d, p),
        _ => {
            return Err(DataError::InvalidData(format!(
                "CSV 헤더에서 날짜/가격 열을 찾을 수 없음: {:?}",
                headers.iter().collect::<Vec<_>>()
            )))
        }
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        // 읽을 수 없는 행은 빈 행으로 남겨 정규화 단계에서 제외 건수로 집계
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    line = e.position().map(|p| p.line()),
                    error = %e,
                    "CSV 행 읽기 실패"
                );
                rows.push(RawFundRow {
                    date: RawField::Empty,
                    price: RawField::Empty,
                });
                continue;
            }
        };
        rows.push(RawFundRow {
            date: record.get(date_idx).map_or(RawField::Empty, RawField::text),
            price: record.get(price_idx).map_or(RawField::Empty, RawField::text),
        });
    }

    Ok(rows)
}

#[async_trait]
impl FundPriceSource for CsvFundFile {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn fetch_raw(&self, fund_code: &str, _range: &DateRange) -> Result<Vec<RawFundRow>> {
        let content = tokio::fs::read(&self.path).await.map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "CSV 파일 읽기 실패");
            DataError::IoError(format!("{}: {}", self.path.display(), e))
        })?;

        let rows = parse_csv(&content)?;
        info!(fund_code, path = %self.path.display(), rows = rows.len(), "CSV 파일 읽음");
        Ok(rows)
    }
}
