//! 데이터 수집 모듈.

pub mod file_import;
pub mod fund_collect;
pub mod fund_seed;
pub mod probe;
pub mod rate_collect;

pub use file_import::{import_csv, import_exports, import_spreadsheet};
pub use fund_collect::{backfill_funds, collect_funds, daily_funds, FundRequestPlan};
pub use fund_seed::seed_funds;
pub use probe::{probe, PROBE_FUND};
pub use rate_collect::{backfill_rates, collect_rates, daily_rates, live_rates, RatePipeline};
