//! 연결 점검 모드.
//!
//! 어제 환율 하루치와 펀드 하나의 최근 7일 기준가를 가져와 저장하고
//! 결과를 로그로 보여줍니다.

use chrono::{Days, NaiveDate};
use gostergec_core::DateRange;
use gostergec_data::{FundPriceSource, Store, UpsertSink};
use std::time::Instant;

use super::rate_collect::RatePipeline;
use crate::CollectionStats;

/// 점검에 사용하는 펀드.
pub const PROBE_FUND: &str = "TYH";

/// 펀드 조회 기간 (일).
const PROBE_DAYS: u64 = 7;

/// 점검 결과를 로그로 출력하고 저장합니다.
pub async fn probe(
    pipeline: &RatePipeline<'_>,
    funds: &dyn FundPriceSource,
    store: &dyn Store,
    sink: UpsertSink,
    today: NaiveDate,
) -> CollectionStats {
    let started = Instant::now();
    let mut stats = CollectionStats::new();

    // 1. 환율
    stats.total += 1;
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    match pipeline.record_for(yesterday).await {
        Some(record) => {
            tracing::info!(
                date = %record.date,
                usd_try = %record.usd_try,
                eur_try = %record.eur_try,
                gold_usd_oz = %record.gold_usd_oz,
                gold_try_gram = %record.gold_try_gram,
                "✓ 환율"
            );
            stats.record_upsert(sink.upsert(store, vec![record]).await);
        }
        None => {
            stats.errors += 1;
            tracing::warn!(date = %yesterday, "✗ 환율 조회 실패");
        }
    }

    // 2. 펀드 기준가
    stats.total += 1;
    let start = today.checked_sub_days(Days::new(PROBE_DAYS)).unwrap_or(today);
    let range = DateRange { start, end: today };
    match funds.fetch(PROBE_FUND, &range).await {
        Ok(batch) if !batch.is_empty() => {
            for record in batch.records.iter().take(3) {
                tracing::info!(fund_code = PROBE_FUND, date = %record.date, price_try = %record.price_try, "✓ 기준가");
            }
            stats.dropped += batch.dropped;
            stats.record_upsert(sink.upsert(store, batch.records).await);
        }
        Ok(_) => {
            stats.empty += 1;
            tracing::warn!(fund_code = PROBE_FUND, %range, "✗ 기준가 없음");
        }
        Err(e) => {
            stats.errors += 1;
            tracing::warn!(fund_code = PROBE_FUND, error = %e, "✗ 기준가 조회 실패");
        }
    }

    stats.elapsed = started.elapsed();
    stats
}
