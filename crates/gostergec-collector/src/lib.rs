//! Standalone market-data collector for Gostergec.
//!
//! 이 crate는 다음 작업을 수행하는 바이너리를 제공합니다:
//! - USD/TRY, EUR/TRY 환율 + 금 시세 수집 (backfill / daily / live)
//! - 펀드 기준가 수집 (TEFAS API, CSV, 스프레드시트 내보내기)
//! - 펀드 카탈로그 초기 적재

pub mod config;
pub mod error;
pub mod modules;
pub mod stats;
pub mod walker;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use stats::CollectionStats;
pub use walker::{DateWalker, DayOutcome};
