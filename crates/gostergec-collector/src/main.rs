//! Standalone market-data collector CLI.

use clap::{Parser, Subcommand};
use gostergec_collector::modules::{self, FundRequestPlan, RatePipeline};
use gostergec_collector::{CollectionStats, CollectorConfig, CollectorError};
use gostergec_core::{init_logging, istanbul_today, parse_fund_codes, GoldPriceTable, LogConfig};
use gostergec_data::{
    DatabaseConfig, DirectoryExporter, FrankfurterClient, GoldApiClient, GoldPriceResolver,
    MemoryStore, PostgresStore, SpotGoldSource, Store, TefasClient, UpsertSink,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "gostergec-collector")]
#[command(about = "Gostergec market-data collector (TRY rates, gold, fund prices)", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// DB 대신 메모리 저장소 사용 (DATABASE_URL 불필요)
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 테이블 생성
    InitSchema,

    /// 기본 펀드 카탈로그 적재
    SeedFunds,

    /// 최근 N년 환율 + 금 시세 수집
    BackfillRates {
        #[arg(long, default_value_t = 10)]
        years: u32,
    },

    /// 어제/오늘 환율 수집 (주말 날짜 제외)
    DailyRates,

    /// 최신 환율 + 실시간 금 시세 수집
    LiveRates,

    /// 최근 N년 펀드 기준가 수집 (TEFAS API)
    BackfillFunds {
        #[arg(long, default_value_t = 10)]
        years: u32,

        /// 특정 펀드만 수집 (쉼표로 구분, 예: "TYH,GAL")
        #[arg(long)]
        funds: Option<String>,
    },

    /// 직전 평일 펀드 기준가 수집 (주말에는 생략)
    DailyFunds {
        #[arg(long)]
        funds: Option<String>,
    },

    /// TEFAS CSV 내보내기 파일 임포트
    ImportCsv { code: String, file: PathBuf },

    /// TEFAS 스프레드시트 내보내기 파일 임포트
    ImportSpreadsheet { code: String, file: PathBuf },

    /// 내보내기 디렉터리의 `<CODE>.xlsx` 파일 일괄 임포트
    ImportExports {
        #[arg(long)]
        dir: Option<PathBuf>,

        #[arg(long)]
        funds: Option<String>,
    },

    /// 일일 실행 (환율 → 펀드 기준가)
    Daily,

    /// 연결 점검 (어제 환율 + TYH 최근 7일)
    Probe,
}

/// 저장소 백엔드.
enum Backend {
    Postgres(PostgresStore),
    Memory(MemoryStore),
}

impl Backend {
    fn store(&self) -> &dyn Store {
        match self {
            Self::Postgres(store) => store,
            Self::Memory(store) => store,
        }
    }
}

/// `--funds` 옵션이 있으면 그 목록, 없으면 설정의 목록.
fn resolve_codes(
    option: Option<&str>,
    config: &CollectorConfig,
) -> Result<Vec<String>, CollectorError> {
    match option {
        Some(raw) => {
            let codes = parse_fund_codes(raw);
            if codes.is_empty() {
                return Err(CollectorError::Config(format!(
                    "유효한 펀드 코드가 없습니다: {}",
                    raw
                )));
            }
            tracing::info!(count = codes.len(), "특정 펀드 수집");
            Ok(codes)
        }
        None => Ok(config.funds.codes.clone()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 로깅 초기화
    init_logging(LogConfig::new(&cli.log_level).with_env_format())?;

    tracing::info!("Gostergec Data Collector 시작");

    // 설정 로드 (I/O 전에 실패해야 함)
    let config = CollectorConfig::from_env(!cli.dry_run)?;
    tracing::debug!(
        funds = config.funds.codes.len(),
        gold_live_from = %config.rates.gold_live_from,
        window_days = config.funds.window_days,
        "설정 로드 완료"
    );

    // 저장소
    let backend = match (&config.database_url, cli.dry_run) {
        (Some(url), false) => {
            let store = PostgresStore::connect(&DatabaseConfig::new(url.clone())).await?;
            Backend::Postgres(store)
        }
        _ => {
            tracing::warn!("dry-run: 메모리 저장소 사용");
            Backend::Memory(MemoryStore::new())
        }
    };
    let store = backend.store();

    // 외부 소스
    let timeout = config.http_timeout();
    let rates = FrankfurterClient::new(&config.http.rates_base_url, timeout)?;
    let spot: Arc<dyn SpotGoldSource> =
        Arc::new(GoldApiClient::new(&config.http.gold_base_url, timeout)?);
    let gold = GoldPriceResolver::new(
        GoldPriceTable::historical(),
        Some(spot),
        config.rates.gold_live_from,
    );
    let pipeline = RatePipeline {
        rates: &rates,
        gold: &gold,
    };
    let tefas = TefasClient::new(&config.http.tefas_base_url, timeout)?;

    let bulk = UpsertSink::new(config.storage.bulk_batch_size);
    let import = UpsertSink::new(config.storage.import_batch_size);
    let today = istanbul_today();

    // 명령 실행
    match cli.command {
        Commands::InitSchema => match &backend {
            Backend::Postgres(pg) => pg.init_schema().await?,
            Backend::Memory(_) => tracing::info!("dry-run: 스키마 적용 생략"),
        },
        Commands::SeedFunds => {
            let stats = modules::seed_funds(store, import).await;
            stats.log_summary("펀드 카탈로그 적재");
        }
        Commands::BackfillRates { years } => {
            let stats = modules::backfill_rates(
                &pipeline,
                store,
                bulk,
                today,
                years,
                config.rates.backfill_delay(),
            )
            .await;
            stats.log_summary("환율 backfill");
        }
        Commands::DailyRates => {
            let stats =
                modules::daily_rates(&pipeline, store, import, today, config.rates.daily_delay())
                    .await;
            stats.log_summary("일일 환율");
        }
        Commands::LiveRates => {
            let stats = modules::live_rates(&pipeline, store, import).await;
            stats.log_summary("최신 환율");
        }
        Commands::BackfillFunds { years, funds } => {
            let codes = resolve_codes(funds.as_deref(), &config)?;
            let plan = FundRequestPlan {
                window_days: config.funds.window_days,
                pacing: config.funds.backfill_delay(),
            };
            let stats =
                modules::backfill_funds(&tefas, store, bulk, &codes, today, years, plan).await;
            stats.log_summary("펀드 backfill");
        }
        Commands::DailyFunds { funds } => {
            let codes = resolve_codes(funds.as_deref(), &config)?;
            let stats = modules::daily_funds(
                &tefas,
                store,
                import,
                &codes,
                today,
                config.funds.daily_delay(),
            )
            .await;
            stats.log_summary("펀드 일일 수집");
        }
        Commands::ImportCsv { code, file } => {
            let stats = modules::import_csv(store, import, &code, &file).await?;
            stats.log_summary("CSV 임포트");
        }
        Commands::ImportSpreadsheet { code, file } => {
            let stats = modules::import_spreadsheet(store, import, &code, &file).await?;
            stats.log_summary("스프레드시트 임포트");
        }
        Commands::ImportExports { dir, funds } => {
            let codes = resolve_codes(funds.as_deref(), &config)?;
            let exporter =
                DirectoryExporter::new(dir.unwrap_or_else(|| config.funds.export_dir.clone()));
            let stats = modules::import_exports(&exporter, store, import, &codes).await;
            stats.log_summary("내보내기 임포트");
        }
        Commands::Daily => {
            tracing::info!("=== 일일 실행 시작 ===");
            let mut total = CollectionStats::new();

            // 1. 환율
            tracing::info!("Step 1/2: 환율");
            let rate_stats =
                modules::daily_rates(&pipeline, store, import, today, config.rates.daily_delay())
                    .await;
            rate_stats.log_summary("일일 환율");
            total.merge(&rate_stats);

            // 2. 펀드 기준가
            tracing::info!("Step 2/2: 펀드 기준가");
            let fund_stats = modules::daily_funds(
                &tefas,
                store,
                import,
                &config.funds.codes,
                today,
                config.funds.daily_delay(),
            )
            .await;
            fund_stats.log_summary("펀드 일일 수집");
            total.merge(&fund_stats);

            total.log_summary("일일 실행");
        }
        Commands::Probe => {
            let stats = modules::probe(&pipeline, &tefas, store, import, today).await;
            stats.log_summary("연결 점검");
        }
    }

    match &backend {
        Backend::Postgres(pg) => pg.pool().close().await,
        Backend::Memory(mem) => tracing::info!(
            exchange_rates = mem.exchange_rates().len(),
            fund_prices = mem.fund_prices().len(),
            funds = mem.funds().len(),
            "dry-run 결과 (저장되지 않음)"
        ),
    }

    tracing::info!("Gostergec Data Collector 종료");
    Ok(())
}
