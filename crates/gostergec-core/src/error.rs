//! 수집 파이프라인의 에러 타입.
//!
//! 정규화 단계에서 레코드가 버려지는 사유와 도메인 입력 오류를 정의합니다.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// 날짜 필드가 비어 있음
    #[error("날짜 값 없음")]
    MissingDate,

    /// 가격 필드가 비어 있음
    #[error("가격 값 없음")]
    MissingPrice,

    /// 지원하지 않는 날짜 형식
    #[error("날짜 파싱 실패: {0}")]
    InvalidDate(String),

    /// 숫자로 변환할 수 없는 가격
    #[error("가격 파싱 실패: {0}")]
    InvalidPrice(String),

    /// 0 이하의 가격
    #[error("0 이하의 가격: {0}")]
    NonPositivePrice(String),

    /// 잘못된 펀드 코드
    #[error("잘못된 펀드 코드: {0:?}")]
    InvalidFundCode(String),

    /// 잘못된 날짜 범위
    #[error("잘못된 날짜 범위: {0}")]
    InvalidRange(String),
}

/// 도메인 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// 정규화 단계에서 레코드를 조용히 버리는 사유인지 확인합니다.
    ///
    /// 이 에러들은 배치 전체를 중단시키지 않고 카운트만 증가시킵니다.
    pub fn is_drop_reason(&self) -> bool {
        matches!(
            self,
            CoreError::MissingDate
                | CoreError::MissingPrice
                | CoreError::InvalidDate(_)
                | CoreError::InvalidPrice(_)
                | CoreError::NonPositivePrice(_)
        )
    }
}
