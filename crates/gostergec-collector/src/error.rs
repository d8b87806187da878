//! 에러 타입 정의.

use gostergec_core::CoreError;
use gostergec_data::DataError;
use std::fmt;

/// Collector 에러 타입
#[derive(Debug)]
pub enum CollectorError {
    /// 데이터 계층 에러 (DB, HTTP, 파일)
    Data(DataError),
    /// 도메인 입력 에러 (잘못된 범위, 펀드 코드)
    Domain(CoreError),
    /// 설정 에러
    Config(String),
    /// 입력 파일 에러 (명시적 파일 임포트)
    Input(String),
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(e) => write!(f, "Data error: {}", e),
            Self::Domain(e) => write!(f, "Domain error: {}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Input(msg) => write!(f, "Input error: {}", msg),
        }
    }
}

impl std::error::Error for CollectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Data(e) => Some(e),
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DataError> for CollectorError {
    fn from(err: DataError) -> Self {
        Self::Data(err)
    }
}

impl From<CoreError> for CollectorError {
    fn from(err: CoreError) -> Self {
        Self::Domain(err)
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
