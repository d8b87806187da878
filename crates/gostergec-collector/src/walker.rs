//! 날짜 범위 순회기.
//!
//! `start..=end`를 하루씩 진행합니다. 주말은 I/O 없이 건너뛰고, 평일마다
//! 단계 함수를 한 번 호출한 뒤 지정된 간격만큼 쉽니다.
//! 하루가 실패해도 루프는 계속됩니다.

use chrono::NaiveDate;
use gostergec_core::{is_weekend, DateRange};
use gostergec_data::UpsertReport;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::CollectionStats;

/// 하루 처리 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayOutcome {
    /// 레코드를 저장함
    Stored(UpsertReport),
    /// 소스에 데이터 없음
    Empty,
    /// 처리 실패 (사유)
    Failed(String),
}

/// 주말을 건너뛰며 요청 간격을 지키는 날짜 순회기.
#[derive(Debug, Clone, Copy)]
pub struct DateWalker {
    range: DateRange,
    pacing: Duration,
}

impl DateWalker {
    pub fn new(range: DateRange, pacing: Duration) -> Self {
        Self { range, pacing }
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// 범위를 순회하며 평일마다 `step`을 호출합니다.
    pub async fn walk<F, Fut>(&self, operation: &str, mut step: F) -> CollectionStats
    where
        F: FnMut(NaiveDate) -> Fut,
        Fut: Future<Output = DayOutcome>,
    {
        let started = Instant::now();
        let mut stats = CollectionStats::new();

        tracing::info!(operation, range = %self.range, "날짜 순회 시작");

        for date in self.range.days() {
            stats.total += 1;

            if is_weekend(date) {
                stats.skipped += 1;
                continue;
            }

            match step(date).await {
                DayOutcome::Stored(report) => {
                    stats.record_upsert(report);
                    tracing::debug!(operation, %date, written = report.written, "저장 완료");
                }
                DayOutcome::Empty => {
                    stats.empty += 1;
                    tracing::debug!(operation, %date, "데이터 없음");
                }
                DayOutcome::Failed(reason) => {
                    stats.errors += 1;
                    tracing::warn!(operation, %date, reason = %reason, "처리 실패");
                }
            }

            if stats.attempted() % 50 == 0 {
                tracing::info!(
                    operation,
                    %date,
                    attempted = stats.attempted(),
                    records = stats.total_records,
                    "진행 중"
                );
            }

            // Rate limiting
            tokio::time::sleep(self.pacing).await;
        }

        stats.elapsed = started.elapsed();
        stats
    }
}
