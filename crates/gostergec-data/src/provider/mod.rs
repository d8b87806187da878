//! 데이터 Provider 모듈.
//!
//! ## 환율 / 금 시세
//! - `FrankfurterClient`: USD 기준 TRY, EUR 시세 (`RateSource`)
//! - `GoldApiClient`: 금 현물 시세 (`SpotGoldSource`)
//! - `GoldPriceResolver`: 실시간 → 월평균 테이블 → 경계값/상수 3단계 결정
//!
//! ## 펀드 기준가 (`FundPriceSource`)
//! - `TefasClient`: TEFAS HTTP API
//! - `CsvFundFile`: 수동 내보내기 CSV
//! - `SpreadsheetFundFile`: 스프레드시트 내보내기 파일
//! - `DirectoryExporter`: 내보내기 파일 위치 탐색 (`SpreadsheetExporter`)

pub mod csv_file;
pub mod exporter;
pub mod frankfurter;
pub mod fund_source;
pub mod gold_api;
pub mod spreadsheet;
pub mod tefas;

pub use csv_file::CsvFundFile;
pub use exporter::{DirectoryExporter, SpreadsheetExporter};
pub use frankfurter::{FrankfurterClient, RateSource, DEFAULT_RATES_BASE_URL};
pub use fund_source::FundPriceSource;
pub use gold_api::{GoldApiClient, GoldPriceResolver, SpotGoldSource, DEFAULT_GOLD_BASE_URL};
pub use spreadsheet::SpreadsheetFundFile;
pub use tefas::{TefasClient, DEFAULT_TEFAS_BASE_URL};

/// 헤더 비교용 키 (공백 제거, 터키어 `İ`/`ı` 포함 소문자화).
pub(crate) fn header_key(header: &str) -> String {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .map(|c| match c {
            'İ' | 'I' | 'ı' => 'i',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}
