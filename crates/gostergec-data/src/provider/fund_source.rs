//! 펀드 기준가 소스 트레이트.

use async_trait::async_trait;
use gostergec_core::{normalize_batch, DateRange, NormalizedBatch, RawFundRow};

use crate::error::Result;

/// 펀드 기준가 소스.
///
/// 구현체는 원시 행만 돌려주고, 정규화와 범위 필터는 `fetch`가 담당합니다.
#[async_trait]
pub trait FundPriceSource: Send + Sync {
    /// 로그에 사용할 소스 이름.
    fn name(&self) -> &'static str;

    /// 펀드 하나의 원시 행을 가져옵니다.
    ///
    /// 파일 기반 소스는 `range`를 무시하고 파일 전체를 읽습니다.
    async fn fetch_raw(&self, fund_code: &str, range: &DateRange) -> Result<Vec<RawFundRow>>;

    /// 정규화된 레코드 중 `range` 안의 것만 반환합니다.
    async fn fetch(&self, fund_code: &str, range: &DateRange) -> Result<NormalizedBatch> {
        let rows = self.fetch_raw(fund_code, range).await?;
        tracing::debug!(source = self.name(), fund_code, rows = rows.len(), "원시 행 수신");
        Ok(normalize_batch(fund_code, rows).retain_range(range))
    }
}
