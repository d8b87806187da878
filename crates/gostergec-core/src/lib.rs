//! # Gostergec Core
//!
//! 터키 시장 데이터 수집기의 핵심 도메인 모델 및 파싱 규칙을 제공합니다.
//!
//! 이 크레이트는 수집 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 환율/금 시세 레코드 (`ExchangeRateRecord`)
//! - 펀드 기준가 레코드 및 펀드 카탈로그
//! - 3단계 금 시세 결정 로직
//! - 터키식 숫자/날짜 형식 정규화
//! - 로깅 인프라

pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
