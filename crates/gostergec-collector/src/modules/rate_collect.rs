//! 환율 + 금 시세 수집 모듈.
//!
//! - backfill: 최근 N년을 하루씩 (주말 제외)
//! - daily: 어제 → 오늘 순으로 시도 (주말 제외), 먼저 성공한 날짜만 저장
//! - live: 최신 시세를 API가 보고한 기준일로 저장

use chrono::{Days, NaiveDate};
use gostergec_core::{is_weekend, DateRange, ExchangeRateRecord};
use gostergec_data::{GoldPriceResolver, RateSource, Store, UpsertSink};
use std::time::{Duration, Instant};

use crate::walker::{DateWalker, DayOutcome};
use crate::CollectionStats;

/// 환율 수집에 필요한 소스 묶음.
pub struct RatePipeline<'a> {
    pub rates: &'a dyn RateSource,
    pub gold: &'a GoldPriceResolver,
}

impl RatePipeline<'_> {
    /// 하루치 레코드를 만듭니다. 환율이 없으면 `None`.
    pub async fn record_for(&self, date: NaiveDate) -> Option<ExchangeRateRecord> {
        let quote = self.rates.fetch_rates(date).await?;
        let gold = self.gold.resolve(date, quote.usd_try).await;
        Some(ExchangeRateRecord::new(date, quote, gold))
    }

    /// 최신 시세로 레코드를 만듭니다 (키는 API 기준일).
    pub async fn latest_record(&self) -> Option<ExchangeRateRecord> {
        let (as_of, quote) = self.rates.fetch_latest().await?;
        let gold = self.gold.resolve(as_of, quote.usd_try).await;
        Some(ExchangeRateRecord::new(as_of, quote, gold))
    }
}

/// 날짜 범위의 환율을 수집합니다. 하루씩 저장한 뒤 다음 날로 넘어갑니다.
pub async fn collect_rates(
    pipeline: &RatePipeline<'_>,
    store: &dyn Store,
    sink: UpsertSink,
    range: DateRange,
    pacing: Duration,
) -> CollectionStats {
    let walker = DateWalker::new(range, pacing);

    walker
        .walk("환율 수집", move |date| async move {
            match pipeline.record_for(date).await {
                Some(record) => DayOutcome::Stored(sink.upsert(store, vec![record]).await),
                None => DayOutcome::Empty,
            }
        })
        .await
}

/// 최근 `years`년의 환율을 수집합니다.
pub async fn backfill_rates(
    pipeline: &RatePipeline<'_>,
    store: &dyn Store,
    sink: UpsertSink,
    today: NaiveDate,
    years: u32,
    pacing: Duration,
) -> CollectionStats {
    let range = DateRange::trailing_years(today, years);
    tracing::info!(years, %range, "환율 backfill 시작");
    collect_rates(pipeline, store, sink, range, pacing).await
}

/// 어제, 오늘 순으로 시도해 먼저 얻은 하루치를 저장합니다. 주말 날짜는 조회하지 않습니다.
pub async fn daily_rates(
    pipeline: &RatePipeline<'_>,
    store: &dyn Store,
    sink: UpsertSink,
    today: NaiveDate,
    pacing: Duration,
) -> CollectionStats {
    let started = Instant::now();
    let mut stats = CollectionStats::new();
    let candidates = [today.checked_sub_days(Days::new(1)), Some(today)];

    for date in candidates.into_iter().flatten() {
        stats.total += 1;

        if is_weekend(date) {
            stats.skipped += 1;
            continue;
        }

        if let Some(record) = pipeline.record_for(date).await {
            tracing::info!(
                %date,
                usd_try = %record.usd_try,
                eur_try = %record.eur_try,
                gold_try_gram = %record.gold_try_gram,
                "일일 환율"
            );
            stats.record_upsert(sink.upsert(store, vec![record]).await);
            break;
        }

        stats.empty += 1;
        tokio::time::sleep(pacing).await;
    }

    stats.elapsed = started.elapsed();
    stats
}

/// 최신 환율과 실시간 금 시세를 저장합니다.
pub async fn live_rates(
    pipeline: &RatePipeline<'_>,
    store: &dyn Store,
    sink: UpsertSink,
) -> CollectionStats {
    let started = Instant::now();
    let mut stats = CollectionStats::new();
    stats.total += 1;

    match pipeline.latest_record().await {
        Some(record) => {
            tracing::info!(
                as_of = %record.date,
                usd_try = %record.usd_try,
                gold_usd_oz = %record.gold_usd_oz,
                "최신 시세"
            );
            stats.record_upsert(sink.upsert(store, vec![record]).await);
        }
        None => {
            stats.errors += 1;
            tracing::warn!("최신 환율을 가져오지 못했습니다");
        }
    }

    stats.elapsed = started.elapsed();
    stats
}
