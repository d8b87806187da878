//! 펀드 기준가 수집 모듈.
//!
//! 펀드마다 범위를 `window_days` 단위 구간으로 나눠 순서대로 요청합니다.
//! 요청 하나가 실패해도 다음 구간/펀드로 계속 진행합니다.

use chrono::NaiveDate;
use gostergec_core::{is_weekend, previous_weekday, DateRange};
use gostergec_data::{FundPriceSource, Store, UpsertSink};
use std::time::{Duration, Instant};

use crate::CollectionStats;

/// 펀드 수집 요청 설정.
#[derive(Debug, Clone, Copy)]
pub struct FundRequestPlan {
    /// 요청 한 번에 담는 최대 일수
    pub window_days: u64,
    /// 요청 간 딜레이
    pub pacing: Duration,
}

/// 여러 펀드의 기준가를 `range` 구간에 대해 수집합니다.
pub async fn collect_funds(
    source: &dyn FundPriceSource,
    store: &dyn Store,
    sink: UpsertSink,
    codes: &[String],
    range: DateRange,
    plan: FundRequestPlan,
) -> CollectionStats {
    let started = Instant::now();
    let mut stats = CollectionStats::new();
    let windows = range.windows(plan.window_days);

    tracing::info!(
        source = source.name(),
        funds = codes.len(),
        windows = windows.len(),
        %range,
        "펀드 기준가 수집 시작"
    );

    for (idx, fund_code) in codes.iter().enumerate() {
        let mut fund_records = 0;

        for window in &windows {
            stats.total += 1;

            match source.fetch(fund_code, window).await {
                Ok(batch) if !batch.is_empty() => {
                    stats.dropped += batch.dropped;
                    let report = sink.upsert(store, batch.records).await;
                    fund_records += report.written;
                    stats.record_upsert(report);
                }
                Ok(batch) => {
                    stats.dropped += batch.dropped;
                    stats.empty += 1;
                    tracing::debug!(fund_code, %window, "데이터 없음");
                }
                Err(e) => {
                    stats.errors += 1;
                    tracing::error!(fund_code, %window, error = %e, "조회 실패");
                }
            }

            // Rate limiting
            tokio::time::sleep(plan.pacing).await;
        }

        tracing::info!(
            fund_code,
            records = fund_records,
            progress = format!("{}/{}", idx + 1, codes.len()),
            "펀드 수집 완료"
        );
    }

    stats.elapsed = started.elapsed();
    stats
}

/// 최근 `years`년의 기준가를 수집합니다.
pub async fn backfill_funds(
    source: &dyn FundPriceSource,
    store: &dyn Store,
    sink: UpsertSink,
    codes: &[String],
    today: NaiveDate,
    years: u32,
    plan: FundRequestPlan,
) -> CollectionStats {
    let range = DateRange::trailing_years(today, years);
    collect_funds(source, store, sink, codes, range, plan).await
}

/// 직전 평일 하루치 기준가를 수집합니다 (월요일이면 금요일).
///
/// 오늘이 주말이면 I/O 없이 건너뜁니다. 평일마다 한 번씩 실행하면
/// 모든 평일이 정확히 한 번씩 요청됩니다.
pub async fn daily_funds(
    source: &dyn FundPriceSource,
    store: &dyn Store,
    sink: UpsertSink,
    codes: &[String],
    today: NaiveDate,
    pacing: Duration,
) -> CollectionStats {
    if is_weekend(today) {
        tracing::info!(%today, "주말 - 펀드 일일 수집 건너뜀");
        return CollectionStats {
            total: 1,
            skipped: 1,
            ..Default::default()
        };
    }

    let Some(target) = previous_weekday(today) else {
        return CollectionStats::new();
    };

    let plan = FundRequestPlan {
        window_days: 1,
        pacing,
    };
    collect_funds(source, store, sink, codes, DateRange::single(target), plan).await
}
