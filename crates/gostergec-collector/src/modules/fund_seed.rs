//! 펀드 카탈로그 초기 적재.

use gostergec_core::default_fund_catalog;
use gostergec_data::{Store, UpsertSink};
use std::time::Instant;

use crate::CollectionStats;

/// 기본 펀드 카탈로그를 `funds` 테이블에 upsert 합니다.
pub async fn seed_funds(store: &dyn Store, sink: UpsertSink) -> CollectionStats {
    let started = Instant::now();
    let mut stats = CollectionStats::new();

    let catalog = default_fund_catalog();
    stats.total += 1;
    for fund in &catalog {
        tracing::debug!(code = %fund.code, name = %fund.display_name, "펀드 등록");
    }

    stats.record_upsert(sink.upsert(store, catalog).await);
    stats.elapsed = started.elapsed();
    stats
}
