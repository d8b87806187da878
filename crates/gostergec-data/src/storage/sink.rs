//! 멱등 upsert 싱크.
//!
//! 레코드를 자연 키로 중복 제거(마지막 값 우선)한 뒤 배치로 나눠 씁니다.
//! 배치 하나가 실패해도 카운트만 남기고 다음 배치를 계속 진행합니다.

use async_trait::async_trait;
use chrono::NaiveDate;
use gostergec_core::{ExchangeRateRecord, FundDescriptor, FundPriceRecord};
use std::collections::BTreeMap;
use std::fmt::Debug;
use tracing::{debug, error};

use crate::error::Result;

/// 대량 적재(backfill) 최대 배치 크기.
pub const BULK_BATCH_SIZE: usize = 500;

/// 대화형/파일 임포트 최대 배치 크기.
pub const IMPORT_BATCH_SIZE: usize = 100;

/// 레코드의 자연 키 (충돌 대상 컬럼).
pub trait NaturalKey {
    type Key: Ord + Clone + Debug + Send;

    fn natural_key(&self) -> Self::Key;
}

impl NaturalKey for ExchangeRateRecord {
    type Key = NaiveDate;

    fn natural_key(&self) -> Self::Key {
        self.date
    }
}

impl NaturalKey for FundPriceRecord {
    type Key = (String, NaiveDate);

    fn natural_key(&self) -> Self::Key {
        (self.fund_code.clone(), self.date)
    }
}

impl NaturalKey for FundDescriptor {
    type Key = String;

    fn natural_key(&self) -> Self::Key {
        self.code.clone()
    }
}

/// 배치 하나를 단일 멱등 구문으로 쓰는 저장소.
#[async_trait]
pub trait UpsertTarget<R: Send + Sync>: Send + Sync {
    /// 테이블 이름 (로그용).
    fn table_name(&self) -> &'static str;

    /// 배치 하나를 씁니다. 배치 안의 키는 서로 다릅니다.
    async fn upsert_batch(&self, batch: &[R]) -> Result<()>;
}

/// 세 테이블 모두에 쓸 수 있는 저장소.
pub trait Store:
    UpsertTarget<ExchangeRateRecord> + UpsertTarget<FundPriceRecord> + UpsertTarget<FundDescriptor>
{
    /// 백엔드 이름 (로그용).
    fn backend(&self) -> &'static str;
}

/// upsert 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertReport {
    /// 성공한 배치에 포함된 레코드 수
    pub written: usize,
    /// 실패한 배치 수
    pub failed_batches: usize,
    /// 실패한 배치에 포함된 레코드 수
    pub failed_records: usize,
}

impl UpsertReport {
    pub fn is_clean(&self) -> bool {
        self.failed_batches == 0
    }
}

/// 자연 키로 중복을 제거합니다. 같은 키는 마지막 값이 남고, 결과는 키 순서입니다.
pub fn dedup_by_key<R: NaturalKey>(records: Vec<R>) -> Vec<R> {
    let mut by_key: BTreeMap<R::Key, R> = BTreeMap::new();
    for record in records {
        by_key.insert(record.natural_key(), record);
    }
    by_key.into_values().collect()
}

/// 배치 크기를 가진 upsert 싱크.
#[derive(Debug, Clone, Copy)]
pub struct UpsertSink {
    batch_size: usize,
}

impl UpsertSink {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// 대량 적재용 (최대 500).
    pub fn bulk() -> Self {
        Self::new(BULK_BATCH_SIZE)
    }

    /// 임포트용 (최대 100).
    pub fn import() -> Self {
        Self::new(IMPORT_BATCH_SIZE)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 레코드를 중복 제거 후 배치로 나눠 씁니다.
    pub async fn upsert<R, T>(&self, target: &T, records: Vec<R>) -> UpsertReport
    where
        R: NaturalKey + Send + Sync,
        T: UpsertTarget<R> + ?Sized,
    {
        let mut report = UpsertReport::default();
        if records.is_empty() {
            return report;
        }

        let records = dedup_by_key(records);

        for (idx, chunk) in records.chunks(self.batch_size).enumerate() {
            match target.upsert_batch(chunk).await {
                Ok(()) => {
                    report.written += chunk.len();
                    debug!(table = target.table_name(), batch = idx, size = chunk.len(), "배치 저장");
                }
                Err(e) => {
                    report.failed_batches += 1;
                    report.failed_records += chunk.len();
                    error!(
                        table = target.table_name(),
                        batch = idx,
                        size = chunk.len(),
                        error = %e,
                        "배치 저장 실패"
                    );
                }
            }
        }

        report
    }
}
