//! 가격 계산을 위한 Decimal 유틸리티.
//!
//! 터키식 숫자 표기(`1.234,56`)와 API의 부동소수점 값을
//! 모두 `Decimal`로 변환합니다.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Decimal 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// 0보다 큰지 확인합니다.
    fn is_positive_price(&self) -> bool;

    /// 지정된 소수점 자릿수로 반올림합니다 (0.5는 0에서 먼 쪽으로).
    fn round_half_up(&self, dp: u32) -> Decimal;
}

impl DecimalExt for Decimal {
    fn is_positive_price(&self) -> bool {
        *self > Decimal::ZERO
    }

    fn round_half_up(&self, dp: u32) -> Decimal {
        self.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// JSON 숫자(f64)를 Decimal로 변환합니다.
///
/// f64의 최단 왕복 표기를 거치므로 `1234.56`은 정확히 `1234.56`이 됩니다.
/// NaN/무한대 또는 Decimal 범위를 넘는 값은 `None`을 반환합니다.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .map(|d| d.normalize())
}

/// 터키식 표기의 숫자 문자열을 Decimal로 파싱합니다.
///
/// 천 단위 구분자 `.`를 제거하고 소수 구분자 `,`를 `.`로 바꿉니다.
/// 이미 `.`을 소수점으로 쓰는 문자열은 이 함수를 거치면 안 됩니다
/// (`"1234.56"` → `123456`).
pub fn parse_turkish_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace() && *c != '\u{a0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}
