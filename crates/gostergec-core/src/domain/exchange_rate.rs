//! 환율 레코드.
//!
//! EUR/TRY는 직접 조회하지 않고 같은 응답의 USD 기준 EUR 값으로 파생합니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::gold::GoldQuote;
use crate::types::DecimalExt;

/// 환율 소수점 자릿수.
pub const RATE_DECIMALS: u32 = 4;

/// 하루치 USD/TRY, EUR/TRY 시세.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateQuote {
    /// USD/TRY (소수점 4자리)
    pub usd_try: Decimal,
    /// EUR/TRY (소수점 4자리, `usd_try / usd_eur`로 파생)
    pub eur_try: Decimal,
}

impl RateQuote {
    /// USD 기준 시세(1 USD = `try_per_usd` TRY = `eur_per_usd` EUR)에서 생성합니다.
    ///
    /// 두 값 중 하나라도 0 이하이면 `None`입니다.
    pub fn from_usd_legs(try_per_usd: Decimal, eur_per_usd: Decimal) -> Option<Self> {
        if !try_per_usd.is_positive_price() || !eur_per_usd.is_positive_price() {
            return None;
        }

        let eur_try = try_per_usd.checked_div(eur_per_usd)?;

        Some(Self {
            usd_try: try_per_usd.round_half_up(RATE_DECIMALS),
            eur_try: eur_try.round_half_up(RATE_DECIMALS),
        })
    }
}

/// `exchange_rates` 테이블 레코드 (자연 키: `date`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRateRecord {
    pub date: NaiveDate,
    pub usd_try: Decimal,
    pub eur_try: Decimal,
    pub gold_usd_oz: Decimal,
    pub gold_try_gram: Decimal,
}

impl ExchangeRateRecord {
    /// 시세와 금 가격을 합쳐 레코드를 만듭니다.
    ///
    /// `gold`는 반드시 같은 `quote.usd_try`로 계산된 값이어야 합니다.
    pub fn new(date: NaiveDate, quote: RateQuote, gold: GoldQuote) -> Self {
        Self {
            date,
            usd_try: quote.usd_try,
            eur_try: quote.eur_try,
            gold_usd_oz: gold.gold_usd_oz,
            gold_try_gram: gold.gold_try_gram,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gold::GoldTier;
    use rust_decimal_macros::dec;

    #[test]
    fn test_eur_try_is_derived_from_usd_legs() {
        let quote = RateQuote::from_usd_legs(dec!(32.1234567), dec!(0.92)).unwrap();
        assert_eq!(quote.usd_try, dec!(32.1235));
        // 32.1234567 / 0.92 = 34.91679...
        assert_eq!(quote.eur_try, dec!(34.9168));
    }

    #[test]
    fn test_non_positive_legs_are_unavailable() {
        assert!(RateQuote::from_usd_legs(dec!(0), dec!(0.92)).is_none());
        assert!(RateQuote::from_usd_legs(dec!(32.1), dec!(0)).is_none());
        assert!(RateQuote::from_usd_legs(dec!(-1), dec!(0.92)).is_none());
    }

    #[test]
    fn test_record_carries_same_usd_try_as_gold() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let quote = RateQuote::from_usd_legs(dec!(32), dec!(0.9)).unwrap();
        let gold = GoldQuote::derive(dec!(2158.56), quote.usd_try, GoldTier::Table);
        let record = ExchangeRateRecord::new(date, quote, gold);

        assert_eq!(record.usd_try, dec!(32));
        assert_eq!(record.gold_try_gram, gold.gold_try_gram);
        assert_eq!(record.gold_try_gram, dec!(2220.78));
    }
}
