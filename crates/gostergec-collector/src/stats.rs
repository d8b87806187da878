//! 수집 통계 구조체.

use gostergec_data::UpsertReport;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 수집 작업 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionStats {
    /// 총 시도 횟수 (일자 또는 요청 단위)
    pub total: usize,
    /// 성공 횟수
    pub success: usize,
    /// 에러 횟수
    pub errors: usize,
    /// 건너뛴 횟수 (주말)
    pub skipped: usize,
    /// 빈 데이터 (조회 성공, 데이터 없음)
    pub empty: usize,
    /// 저장된 총 레코드 수
    pub total_records: usize,
    /// 정규화 단계에서 버려진 행 수
    pub dropped: usize,
    /// 저장에 실패한 레코드 수
    pub failed_records: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CollectionStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장 결과 반영. 실패한 배치가 있으면 에러로, 아니면 성공으로 셉니다.
    pub fn record_upsert(&mut self, report: UpsertReport) {
        self.total_records += report.written;
        self.failed_records += report.failed_records;
        if report.is_clean() {
            self.success += 1;
        } else {
            self.errors += 1;
        }
    }

    /// 다른 통계를 합칩니다 (`daily` 등 복합 실행용).
    pub fn merge(&mut self, other: &CollectionStats) {
        self.total += other.total;
        self.success += other.success;
        self.errors += other.errors;
        self.skipped += other.skipped;
        self.empty += other.empty;
        self.total_records += other.total_records;
        self.dropped += other.dropped;
        self.failed_records += other.failed_records;
        self.elapsed += other.elapsed;
    }

    /// 실제로 외부 소스를 호출한 횟수
    pub fn attempted(&self) -> usize {
        self.total - self.skipped
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        let attempted = self.attempted();
        if attempted == 0 {
            0.0
        } else {
            (self.success as f64 / attempted as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            errors = self.errors,
            skipped = self.skipped,
            empty = self.empty,
            total_records = self.total_records,
            dropped = self.dropped,
            failed_records = self.failed_records,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_upsert() {
        let mut stats = CollectionStats::new();
        stats.record_upsert(UpsertReport {
            written: 3,
            failed_batches: 0,
            failed_records: 0,
        });
        stats.record_upsert(UpsertReport {
            written: 0,
            failed_batches: 1,
            failed_records: 2,
        });

        assert_eq!(stats.success, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.failed_records, 2);
    }

    #[test]
    fn test_success_rate_ignores_skipped_days() {
        let stats = CollectionStats {
            total: 7,
            skipped: 2,
            success: 4,
            empty: 1,
            ..Default::default()
        };
        assert_eq!(stats.attempted(), 5);
        assert!((stats.success_rate() - 80.0).abs() < f64::EPSILON);
    }
}
