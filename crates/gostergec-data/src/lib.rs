//! 데이터 소스 및 저장소.
//!
//! 이 crate는 다음을 제공합니다:
//! - 환율(Frankfurter), 금 현물 시세(gold-api) 클라이언트
//! - 펀드 기준가 소스 (TEFAS API, CSV, 스프레드시트)
//! - 멱등 upsert 싱크와 PostgreSQL/메모리 저장소

pub mod error;
pub mod provider;
pub mod storage;

pub use error::{DataError, Result};

pub use provider::{
    CsvFundFile, DirectoryExporter, FrankfurterClient, FundPriceSource, GoldApiClient,
    GoldPriceResolver, RateSource, SpotGoldSource, SpreadsheetExporter, SpreadsheetFundFile,
    TefasClient, DEFAULT_GOLD_BASE_URL, DEFAULT_RATES_BASE_URL, DEFAULT_TEFAS_BASE_URL,
};
pub use storage::{
    DatabaseConfig, MemoryStore, NaturalKey, PostgresStore, Store, UpsertReport, UpsertSink,
    UpsertTarget, BULK_BATCH_SIZE, IMPORT_BATCH_SIZE,
};
