//! 금 시세 결정 로직.
//!
//! 임의의 날짜에 대해 USD/oz 금 가격을 3단계로 결정합니다.
//!
//! ```text
//! 날짜 >= live_from ? ──YES──▶ 1. 실시간 시세 (양수일 때만)
//!         │                        │ 실패
//!         NO                       ▼
//!         └──────────────▶ 2. 월평균 테이블 (year, month)
//!                                  │ 없음
//!                                  ▼
//!                          3. 경계값 (최초/최종 월) → 고정 상수
//! ```
//!
//! 월평균 테이블은 근사치입니다. 과거 일자의 금 가격은 해당 월의
//! 평균으로 대체되므로 일별 정확도를 보장하지 않습니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{DecimalExt, YearMonth};

/// 1 트로이온스 = 31.1035 g.
pub const TROY_OUNCE_GRAMS: Decimal = dec!(31.1035);

/// 테이블을 전혀 쓸 수 없을 때의 최후 가격 (USD/oz).
pub const FALLBACK_GOLD_USD_OZ: Decimal = dec!(2650.00);

/// 실시간 시세를 시도하는 기본 시작 월.
pub const DEFAULT_LIVE_FROM: YearMonth = YearMonth::new(2025, 1);

/// 금 가격 소수점 자릿수.
pub const GOLD_DECIMALS: u32 = 2;

/// 월평균 금 가격 (USD/oz, 센트 단위), 2015-01 ~ 2024-12.
const MONTHLY_AVERAGE_CENTS: [(i32, [i64; 12]); 10] = [
    (2015, [125185, 122708, 117863, 119893, 119863, 118150, 112831, 111793, 112477, 115925, 108644, 106825]),
    (2016, [109791, 119950, 124514, 124226, 125940, 127640, 133666, 134017, 132661, 126655, 123835, 115140]),
    (2017, [119210, 123420, 123109, 126688, 124604, 126026, 123684, 128304, 131407, 127951, 128190, 126445]),
    (2018, [133130, 133073, 132466, 133476, 130345, 128157, 123771, 120171, 119839, 121539, 122065, 125040]),
    (2019, [129175, 132007, 130090, 128591, 128370, 135904, 141289, 150041, 151058, 149481, 147002, 147913]),
    (2020, [156067, 159710, 159193, 168317, 171591, 173222, 184039, 196863, 192192, 190027, 186630, 185842]),
    (2021, [186798, 180817, 171823, 176004, 185026, 183457, 180784, 178528, 177514, 177688, 182094, 179034]),
    (2022, [181602, 185630, 194783, 193672, 184849, 183657, 173274, 176456, 168047, 166445, 172507, 179755]),
    (2023, [189783, 185461, 191271, 200040, 199200, 194290, 195102, 191871, 191616, 191885, 198682, 202693]),
    (2024, [203451, 202286, 215856, 233102, 234818, 232613, 239886, 247039, 257037, 269018, 265093, 264804]),
];

/// 금 가격이 결정된 단계.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoldTier {
    /// 실시간 현물 시세
    Live,
    /// 월평균 테이블 일치
    Table,
    /// 테이블 범위 밖 (최초/최종 월 값)
    Edge,
    /// 고정 상수
    Fallback,
}

impl GoldTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Table => "table",
            Self::Edge => "edge",
            Self::Fallback => "fallback",
        }
    }
}

/// 결정된 금 가격.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldQuote {
    /// USD/oz (소수점 2자리)
    pub gold_usd_oz: Decimal,
    /// TRY/g (소수점 2자리)
    pub gold_try_gram: Decimal,
    /// 결정 단계
    pub tier: GoldTier,
}

impl GoldQuote {
    /// USD/oz 가격과 USD/TRY로 TRY/g 가격을 계산합니다.
    ///
    /// `gold_try_gram = round2(gold_usd_oz) * usd_try / 31.1035`
    pub fn derive(gold_usd_oz: Decimal, usd_try: Decimal, tier: GoldTier) -> Self {
        let gold_usd_oz = gold_usd_oz.round_half_up(GOLD_DECIMALS);
        let gold_try_gram = (gold_usd_oz * usd_try / TROY_OUNCE_GRAMS).round_half_up(GOLD_DECIMALS);

        Self {
            gold_usd_oz,
            gold_try_gram,
            tier,
        }
    }
}

/// 월평균 금 가격 테이블.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoldPriceTable {
    prices: BTreeMap<YearMonth, Decimal>,
}

impl GoldPriceTable {
    /// 내장된 2015-01 ~ 2024-12 월평균 테이블.
    pub fn historical() -> Self {
        let prices = MONTHLY_AVERAGE_CENTS
            .iter()
            .flat_map(|(year, months)| {
                months.iter().enumerate().map(move |(idx, cents)| {
                    (YearMonth::new(*year, idx as u32 + 1), Decimal::new(*cents, 2))
                })
            })
            .collect();

        Self { prices }
    }

    /// 임의의 항목으로 테이블을 만듭니다.
    pub fn from_entries(entries: impl IntoIterator<Item = (YearMonth, Decimal)>) -> Self {
        Self {
            prices: entries
                .into_iter()
                .filter(|(_, price)| price.is_positive_price())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// 정확히 일치하는 월의 가격.
    pub fn get(&self, month: YearMonth) -> Option<Decimal> {
        self.prices.get(&month).copied()
    }

    /// 가장 이른 월과 가격.
    pub fn first(&self) -> Option<(YearMonth, Decimal)> {
        self.prices.iter().next().map(|(k, v)| (*k, *v))
    }

    /// 가장 늦은 월과 가격.
    pub fn last(&self) -> Option<(YearMonth, Decimal)> {
        self.prices.iter().next_back().map(|(k, v)| (*k, *v))
    }

    /// 테이블 안의 빈 달은 직전 월 값으로 대체합니다.
    fn nearest_earlier(&self, month: YearMonth) -> Option<Decimal> {
        self.prices.range(..month).next_back().map(|(_, v)| *v)
    }
}

/// 날짜가 실시간 시세 구간에 속하는지 확인합니다.
pub fn in_live_window(date: NaiveDate, live_from: YearMonth) -> bool {
    YearMonth::of(date) >= live_from
}

/// 3단계 규칙으로 USD/oz 가격과 결정 단계를 고릅니다.
///
/// `live_reading`은 `date`가 실시간 구간일 때만 고려됩니다.
pub fn select_gold_usd_oz(
    date: NaiveDate,
    table: &GoldPriceTable,
    live_from: YearMonth,
    live_reading: Option<Decimal>,
) -> (Decimal, GoldTier) {
    if in_live_window(date, live_from) {
        if let Some(price) = live_reading.filter(|p| p.is_positive_price()) {
            return (price, GoldTier::Live);
        }
    }

    let month = YearMonth::of(date);
    if let Some(price) = table.get(month) {
        return (price, GoldTier::Table);
    }

    match (table.first(), table.last()) {
        (Some((first_month, first_price)), _) if month < first_month => {
            (first_price, GoldTier::Edge)
        }
        (_, Some((last_month, last_price))) if month > last_month => (last_price, GoldTier::Edge),
        _ => match table.nearest_earlier(month) {
            Some(price) => (price, GoldTier::Edge),
            None => (FALLBACK_GOLD_USD_OZ, GoldTier::Fallback),
        },
    }
}

/// 날짜와 USD/TRY로 금 가격을 결정합니다. 실패하지 않습니다.
pub fn resolve_gold(
    date: NaiveDate,
    usd_try: Decimal,
    table: &GoldPriceTable,
    live_from: YearMonth,
    live_reading: Option<Decimal>,
) -> GoldQuote {
    let (gold_usd_oz, tier) = select_gold_usd_oz(date, table, live_from, live_reading);
    GoldQuote::derive(gold_usd_oz, usd_try, tier)
}
