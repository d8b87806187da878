//! 환경변수 기반 설정 모듈.

use crate::error::CollectorError;
use crate::Result;
use gostergec_core::{parse_fund_codes, YearMonth, DEFAULT_FUND_CODES, DEFAULT_LIVE_FROM};
use gostergec_data::{
    BULK_BATCH_SIZE, DEFAULT_GOLD_BASE_URL, DEFAULT_RATES_BASE_URL, DEFAULT_TEFAS_BASE_URL,
    IMPORT_BATCH_SIZE,
};
use std::path::PathBuf;
use std::time::Duration;

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 데이터베이스 URL (`--dry-run`이면 없어도 됨)
    pub database_url: Option<String>,
    /// 외부 API 설정
    pub http: HttpConfig,
    /// 환율 수집 설정
    pub rates: RateCollectConfig,
    /// 펀드 기준가 수집 설정
    pub funds: FundCollectConfig,
    /// 저장 배치 설정
    pub storage: StorageConfig,
}

/// 외부 API 설정
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub rates_base_url: String,
    pub gold_base_url: String,
    pub tefas_base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

/// 환율 수집 설정
#[derive(Debug, Clone)]
pub struct RateCollectConfig {
    /// backfill 요청 간 딜레이 (밀리초)
    pub backfill_delay_ms: u64,
    /// daily 요청 간 딜레이 (밀리초)
    pub daily_delay_ms: u64,
    /// 실시간 금 시세를 쓰기 시작하는 월
    pub gold_live_from: YearMonth,
}

/// 펀드 기준가 수집 설정
#[derive(Debug, Clone)]
pub struct FundCollectConfig {
    /// backfill 요청 간 딜레이 (밀리초)
    pub backfill_delay_ms: u64,
    /// daily 요청 간 딜레이 (밀리초)
    pub daily_delay_ms: u64,
    /// backfill 요청 한 번에 담는 일수
    pub window_days: u64,
    /// 수집 대상 펀드 코드
    pub codes: Vec<String>,
    /// 스프레드시트 내보내기 디렉터리
    pub export_dir: PathBuf,
}

/// 저장 배치 설정
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// 대량 적재 배치 크기 (최대 500)
    pub bulk_batch_size: usize,
    /// 임포트 배치 크기 (최대 100)
    pub import_batch_size: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            http: HttpConfig {
                rates_base_url: DEFAULT_RATES_BASE_URL.to_string(),
                gold_base_url: DEFAULT_GOLD_BASE_URL.to_string(),
                tefas_base_url: DEFAULT_TEFAS_BASE_URL.to_string(),
                timeout_secs: 30,
            },
            rates: RateCollectConfig {
                backfill_delay_ms: 200,
                daily_delay_ms: 100,
                gold_live_from: DEFAULT_LIVE_FROM,
            },
            funds: FundCollectConfig {
                backfill_delay_ms: 1000,
                daily_delay_ms: 500,
                window_days: 90,
                codes: DEFAULT_FUND_CODES.iter().map(|c| c.to_string()).collect(),
                export_dir: PathBuf::from("exports"),
            },
            storage: StorageConfig {
                bulk_batch_size: BULK_BATCH_SIZE,
                import_batch_size: IMPORT_BATCH_SIZE,
            },
        }
    }
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드 (`.env` 포함)
    pub fn from_env(require_database: bool) -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok(), require_database)
    }

    /// 임의의 조회 함수로 설정을 만듭니다.
    pub fn from_lookup<F>(get: F, require_database: bool) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = get("DATABASE_URL").filter(|v| !v.trim().is_empty());
        if require_database && database_url.is_none() {
            return Err(CollectorError::Config(
                "DATABASE_URL 환경변수가 설정되지 않았습니다".to_string(),
            ));
        }

        let gold_live_from = match get("GOLD_LIVE_FROM") {
            Some(raw) => raw.parse::<YearMonth>().map_err(|_| {
                CollectorError::Config(format!("GOLD_LIVE_FROM 형식 오류 (YYYY-MM): {}", raw))
            })?,
            None => defaults.rates.gold_live_from,
        };

        let codes = match get("FUND_CODES") {
            Some(raw) => {
                let codes = parse_fund_codes(&raw);
                if codes.is_empty() {
                    return Err(CollectorError::Config(format!(
                        "FUND_CODES에 유효한 펀드 코드가 없습니다: {}",
                        raw
                    )));
                }
                codes
            }
            None => defaults.funds.codes,
        };

        Ok(Self {
            database_url,
            http: HttpConfig {
                rates_base_url: get("RATES_BASE_URL").unwrap_or(defaults.http.rates_base_url),
                gold_base_url: get("GOLD_BASE_URL").unwrap_or(defaults.http.gold_base_url),
                tefas_base_url: get("TEFAS_BASE_URL").unwrap_or(defaults.http.tefas_base_url),
                timeout_secs: env_var_parse(&get, "HTTP_TIMEOUT_SECS", defaults.http.timeout_secs),
            },
            rates: RateCollectConfig {
                backfill_delay_ms: env_var_parse(
                    &get,
                    "RATES_BACKFILL_DELAY_MS",
                    defaults.rates.backfill_delay_ms,
                ),
                daily_delay_ms: env_var_parse(
                    &get,
                    "RATES_DAILY_DELAY_MS",
                    defaults.rates.daily_delay_ms,
                ),
                gold_live_from,
            },
            funds: FundCollectConfig {
                backfill_delay_ms: env_var_parse(
                    &get,
                    "FUND_BACKFILL_DELAY_MS",
                    defaults.funds.backfill_delay_ms,
                ),
                daily_delay_ms: env_var_parse(&get, "FUND_DAILY_DELAY_MS", defaults.funds.daily_delay_ms),
                window_days: env_var_parse(&get, "FUND_WINDOW_DAYS", defaults.funds.window_days).max(1),
                codes,
                export_dir: get("EXPORT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.funds.export_dir),
            },
            storage: StorageConfig {
                bulk_batch_size: env_var_parse(&get, "BULK_BATCH_SIZE", BULK_BATCH_SIZE)
                    .clamp(1, BULK_BATCH_SIZE),
                import_batch_size: env_var_parse(&get, "IMPORT_BATCH_SIZE", IMPORT_BATCH_SIZE)
                    .clamp(1, IMPORT_BATCH_SIZE),
            },
        })
    }

    /// HTTP 요청 타임아웃
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}

impl RateCollectConfig {
    /// backfill 요청 간 딜레이를 Duration으로 반환
    pub fn backfill_delay(&self) -> Duration {
        Duration::from_millis(self.backfill_delay_ms)
    }

    /// daily 요청 간 딜레이를 Duration으로 반환
    pub fn daily_delay(&self) -> Duration {
        Duration::from_millis(self.daily_delay_ms)
    }
}

impl FundCollectConfig {
    /// backfill 요청 간 딜레이를 Duration으로 반환
    pub fn backfill_delay(&self) -> Duration {
        Duration::from_millis(self.backfill_delay_ms)
    }

    /// daily 요청 간 딜레이를 Duration으로 반환
    pub fn daily_delay(&self) -> Duration {
        Duration::from_millis(self.daily_delay_ms)
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<F, T>(get: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    get(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
