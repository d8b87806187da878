//! 수집 파이프라인 통합 테스트 (가짜 소스 + 메모리 저장소).

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use gostergec_collector::modules::{
    self, collect_funds, collect_rates, daily_funds, daily_rates, FundRequestPlan, RatePipeline,
};
use gostergec_core::{is_weekend, DateRange, GoldPriceTable, RateQuote, RawFundRow};
use gostergec_data::{
    DirectoryExporter, FundPriceSource, GoldPriceResolver, MemoryStore, RateSource, Result,
    UpsertSink,
};
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// 지정한 날짜를 제외한 모든 날짜에 고정 시세를 주는 환율 소스.
#[derive(Default)]
struct FakeRates {
    missing: HashSet<NaiveDate>,
    calls: Mutex<Vec<NaiveDate>>,
}

impl FakeRates {
    fn without(dates: &[NaiveDate]) -> Self {
        Self {
            missing: dates.iter().copied().collect(),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<NaiveDate> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RateSource for FakeRates {
    async fn fetch_rates(&self, date: NaiveDate) -> Option<RateQuote> {
        self.calls.lock().unwrap().push(date);
        if self.missing.contains(&date) {
            return None;
        }
        RateQuote::from_usd_legs(dec!(32.5), dec!(0.92))
    }

    async fn fetch_latest(&self) -> Option<(NaiveDate, RateQuote)> {
        Some((d(2024, 6, 7), RateQuote::from_usd_legs(dec!(32.5), dec!(0.92))?))
    }
}

/// 요청 범위의 평일마다 TEFAS 형식 행을 돌려주는 펀드 소스.
#[derive(Default)]
struct FakeFunds {
    requests: Mutex<Vec<(String, DateRange)>>,
}

#[async_trait]
impl FundPriceSource for FakeFunds {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn fetch_raw(&self, fund_code: &str, range: &DateRange) -> Result<Vec<RawFundRow>> {
        self.requests
            .lock()
            .unwrap()
            .push((fund_code.to_string(), *range));

        Ok(range
            .days()
            .filter(|date| !is_weekend(*date))
            .map(|date| {
                RawFundRow::new(
                    date.format("%d.%m.%Y").to_string().as_str(),
                    format!("1,{:06}", date.ordinal()).as_str(),
                )
            })
            .collect())
    }
}

fn resolver() -> GoldPriceResolver {
    GoldPriceResolver::table_only(GoldPriceTable::historical())
}

#[tokio::test(start_paused = true)]
async fn rate_walk_skips_weekends_and_is_idempotent() {
    let rates = FakeRates::default();
    let gold = resolver();
    let pipeline = RatePipeline {
        rates: &rates,
        gold: &gold,
    };
    let store = MemoryStore::new();
    // 2024-06-03(월) ~ 2024-06-09(일)
    let range = DateRange::new(d(2024, 6, 3), d(2024, 6, 9)).unwrap();

    let clock = tokio::time::Instant::now();
    let pacing = Duration::from_millis(200);
    let first = collect_rates(&pipeline, &store, UpsertSink::bulk(), range, pacing).await;
    assert_eq!(clock.elapsed(), Duration::from_millis(1000));

    assert_eq!(rates.calls().len(), 5);
    assert_eq!(first.skipped, 2);
    assert_eq!(first.total_records, 5);
    let snapshot = store.exchange_rates();
    assert_eq!(snapshot.len(), 5);

    let second = collect_rates(&pipeline, &store, UpsertSink::bulk(), range, pacing).await;
    assert_eq!(second.total_records, 5);
    assert_eq!(store.exchange_rates(), snapshot);

    let record = &snapshot[0];
    assert_eq!(record.date, d(2024, 6, 3));
    assert_eq!(record.usd_try, dec!(32.5));
    assert!(record.gold_try_gram > rust_decimal::Decimal::ZERO);
}

#[tokio::test(start_paused = true)]
async fn missing_days_are_counted_as_empty() {
    let rates = FakeRates::without(&[d(2024, 6, 4)]);
    let gold = resolver();
    let pipeline = RatePipeline {
        rates: &rates,
        gold: &gold,
    };
    let store = MemoryStore::new();
    let range = DateRange::new(d(2024, 6, 3), d(2024, 6, 5)).unwrap();

    let stats = collect_rates(&pipeline, &store, UpsertSink::bulk(), range, Duration::ZERO).await;

    assert_eq!(stats.empty, 1);
    assert_eq!(stats.success, 2);
    let dates: Vec<_> = store.exchange_rates().iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![d(2024, 6, 3), d(2024, 6, 5)]);
}

#[tokio::test(start_paused = true)]
async fn daily_rates_falls_back_to_today() {
    let today = d(2024, 6, 5);
    let rates = FakeRates::without(&[d(2024, 6, 4)]);
    let gold = resolver();
    let pipeline = RatePipeline {
        rates: &rates,
        gold: &gold,
    };
    let store = MemoryStore::new();

    let pacing = Duration::from_millis(100);
    let stats = daily_rates(&pipeline, &store, UpsertSink::import(), today, pacing).await;

    assert_eq!(rates.calls(), vec![d(2024, 6, 4), today]);
    assert_eq!(stats.total_records, 1);
    assert_eq!(store.exchange_rates()[0].date, today);
}

#[tokio::test(start_paused = true)]
async fn daily_rates_stops_after_yesterday() {
    let today = d(2024, 6, 5);
    let rates = FakeRates::default();
    let gold = resolver();
    let pipeline = RatePipeline {
        rates: &rates,
        gold: &gold,
    };
    let store = MemoryStore::new();

    daily_rates(&pipeline, &store, UpsertSink::import(), today, Duration::ZERO).await;

    assert_eq!(rates.calls(), vec![d(2024, 6, 4)]);
    assert_eq!(store.exchange_rates()[0].date, d(2024, 6, 4));
}

#[tokio::test(start_paused = true)]
async fn daily_rates_on_sunday_fetches_nothing() {
    let sunday = d(2024, 6, 9);
    let rates = FakeRates::default();
    let gold = resolver();
    let pipeline = RatePipeline {
        rates: &rates,
        gold: &gold,
    };
    let store = MemoryStore::new();

    let clock = tokio::time::Instant::now();
    let stats =
        daily_rates(&pipeline, &store, UpsertSink::import(), sunday, Duration::from_millis(100))
            .await;

    assert!(rates.calls().is_empty());
    assert_eq!(clock.elapsed(), Duration::ZERO);
    assert_eq!(stats.skipped, 2);
    assert!(store.exchange_rates().is_empty());
}

#[tokio::test(start_paused = true)]
async fn daily_rates_on_monday_skips_sunday() {
    let monday = d(2024, 6, 10);
    let rates = FakeRates::default();
    let gold = resolver();
    let pipeline = RatePipeline {
        rates: &rates,
        gold: &gold,
    };
    let store = MemoryStore::new();

    let stats = daily_rates(&pipeline, &store, UpsertSink::import(), monday, Duration::ZERO).await;

    assert_eq!(rates.calls(), vec![monday]);
    assert_eq!(stats.skipped, 1);
    let dates: Vec<_> = store.exchange_rates().iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![monday]);
}

#[tokio::test(start_paused = true)]
async fn live_rates_uses_reported_date() {
    let rates = FakeRates::default();
    let gold = resolver();
    let pipeline = RatePipeline {
        rates: &rates,
        gold: &gold,
    };
    let store = MemoryStore::new();

    let stats = modules::live_rates(&pipeline, &store, UpsertSink::import()).await;

    assert_eq!(stats.success, 1);
    assert_eq!(store.exchange_rates()[0].date, d(2024, 6, 7));
}

#[tokio::test(start_paused = true)]
async fn fund_backfill_is_windowed_per_fund() {
    let source = FakeFunds::default();
    let store = MemoryStore::new();
    let codes = vec!["TYH".to_string(), "GAL".to_string()];
    // 91일 → 30일 구간 4개
    let range = DateRange::new(d(2024, 1, 1), d(2024, 3, 31)).unwrap();
    let plan = FundRequestPlan {
        window_days: 30,
        pacing: Duration::from_millis(1000),
    };

    let clock = tokio::time::Instant::now();
    let stats = collect_funds(&source, &store, UpsertSink::bulk(), &codes, range, plan).await;

    let requests = source.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 8);
    assert!(requests.iter().all(|(_, window)| window.len_days() <= 30));
    assert_eq!(requests[0].1.start, d(2024, 1, 1));
    assert_eq!(requests[3].1.end, d(2024, 3, 31));
    assert_eq!(requests[4].0, "GAL");
    assert_eq!(clock.elapsed(), Duration::from_secs(8));

    let weekdays = range.days().filter(|date| !is_weekend(*date)).count();
    assert_eq!(stats.total_records, weekdays * 2);
    let prices = store.fund_prices();
    assert_eq!(prices.len(), weekdays * 2);

    let first = &prices[0];
    assert_eq!(first.fund_code, "GAL");
    assert_eq!(first.date, d(2024, 1, 1));
    assert_eq!(first.price_try, dec!(1.000001));
}

#[tokio::test(start_paused = true)]
async fn daily_funds_skips_weekends() {
    let source = FakeFunds::default();
    let store = MemoryStore::new();
    let codes = vec!["TYH".to_string()];

    let saturday = d(2024, 6, 8);
    let stats =
        daily_funds(&source, &store, UpsertSink::import(), &codes, saturday, Duration::ZERO).await;

    assert_eq!(stats.skipped, 1);
    assert!(source.requests.lock().unwrap().is_empty());
    assert!(store.fund_prices().is_empty());
}

#[tokio::test(start_paused = true)]
async fn daily_funds_requests_yesterday_only() {
    let source = FakeFunds::default();
    let store = MemoryStore::new();
    let codes = vec!["TYH".to_string(), "IPB".to_string()];

    let today = d(2024, 6, 5);
    let stats =
        daily_funds(&source, &store, UpsertSink::import(), &codes, today, Duration::ZERO).await;

    let requests = source.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|(_, range)| *range == DateRange::single(d(2024, 6, 4))));
    assert_eq!(stats.total_records, 2);
}

#[tokio::test(start_paused = true)]
async fn daily_funds_over_a_week_requests_each_weekday_once() {
    let source = FakeFunds::default();
    let store = MemoryStore::new();
    let codes = vec!["TYH".to_string()];

    // 2024-06-04(화) ~ 2024-06-10(월) 매일 실행
    let week = DateRange::new(d(2024, 6, 4), d(2024, 6, 10)).unwrap();
    for today in week.days() {
        daily_funds(&source, &store, UpsertSink::import(), &codes, today, Duration::ZERO).await;
    }

    let requested: Vec<_> = source
        .requests
        .lock()
        .unwrap()
        .iter()
        .map(|(_, range)| *range)
        .collect();
    let expected: Vec<_> = DateRange::new(d(2024, 6, 3), d(2024, 6, 7))
        .unwrap()
        .days()
        .map(DateRange::single)
        .collect();
    assert_eq!(requested, expected);

    let dates: Vec<_> = store.fund_prices().iter().map(|p| p.date).collect();
    assert_eq!(dates.len(), 5);
    assert_eq!(dates.first(), Some(&d(2024, 6, 3)));
    assert_eq!(dates.last(), Some(&d(2024, 6, 7)));
}

#[tokio::test]
async fn csv_import_counts_drops_and_converges() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(
        file,
        "Tarih;Fon Kodu;Birim Pay Değeri\n\
         03.06.2024;TYH;1,250000\n\
         04.06.2024;TYH;-1\n\
         05.06.2024;TYH;1,260000\n"
    )
    .unwrap();
    let store = MemoryStore::new();

    let first = modules::import_csv(&store, UpsertSink::import(), "tyh", file.path())
        .await
        .unwrap();
    assert_eq!(first.dropped, 1);
    assert_eq!(first.total_records, 2);

    modules::import_csv(&store, UpsertSink::import(), "TYH", file.path()).await.unwrap();
    let prices = store.fund_prices();
    assert_eq!(prices.len(), 2);
    assert_eq!(prices[0].fund_code, "TYH");
    assert_eq!(prices[1].price_try, dec!(1.26));
}

#[tokio::test]
async fn csv_import_keeps_rows_around_undecodable_line() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(b"Tarih;Birim Pay De\xc4\x9feri\n03.06.2024;1,25\n\xff\xfe;1,30\n05.06.2024;1,26\n")
        .unwrap();
    let store = MemoryStore::new();

    let stats = modules::import_csv(&store, UpsertSink::import(), "TYH", file.path())
        .await
        .unwrap();

    assert_eq!(stats.dropped, 1);
    assert_eq!(stats.total_records, 2);
    let dates: Vec<_> = store.fund_prices().iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![d(2024, 6, 3), d(2024, 6, 5)]);
}

#[tokio::test]
async fn csv_import_of_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();

    let missing = dir.path().join("none.csv");
    let result = modules::import_csv(&store, UpsertSink::import(), "TYH", &missing).await;

    assert!(result.is_err());
    assert!(store.fund_prices().is_empty());
}

#[tokio::test]
async fn export_import_skips_funds_without_files() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = DirectoryExporter::new(dir.path());
    let store = MemoryStore::new();
    let codes = vec!["TYH".to_string(), "GAL".to_string()];

    let stats = modules::import_exports(&exporter, &store, UpsertSink::import(), &codes).await;

    assert_eq!(stats.total, 2);
    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.errors, 0);
}

#[tokio::test]
async fn seeding_catalog_twice_keeps_one_row_per_fund() {
    let store = MemoryStore::new();

    modules::seed_funds(&store, UpsertSink::import()).await;
    let count = store.funds().len();
    modules::seed_funds(&store, UpsertSink::import()).await;

    assert!(count > 0);
    assert_eq!(store.funds().len(), count);
}
