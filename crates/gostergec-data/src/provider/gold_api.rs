//! 금 현물 시세 API와 3단계 금 가격 결정기.
//!
//! 실시간 시세는 날짜가 실시간 구간(`live_from` 이후)에 속할 때만 조회합니다.
//! 나머지 단계는 `gostergec_core::resolve_gold`의 순수 로직을 그대로 따릅니다.

use async_trait::async_trait;
use chrono::NaiveDate;
use gostergec_core::{
    decimal_from_f64, in_live_window, resolve_gold, GoldPriceTable, GoldQuote, YearMonth,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::Result;

/// 기본 Base URL.
pub const DEFAULT_GOLD_BASE_URL: &str = "https://api.gold-api.com";

/// 금 현물 시세 소스 (USD/oz).
#[async_trait]
pub trait SpotGoldSource: Send + Sync {
    async fn fetch_spot_usd_oz(&self) -> Option<Decimal>;
}

#[derive(Debug, Deserialize)]
struct SpotResponse {
    price: Option<f64>,
}

/// gold-api.com 클라이언트 (`GET /price/XAU`).
#[derive(Clone)]
pub struct GoldApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GoldApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SpotGoldSource for GoldApiClient {
    async fn fetch_spot_usd_oz(&self) -> Option<Decimal> {
        let url = format!("{}/price/XAU", self.base_url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "금 시세 요청 실패");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "금 시세 API 오류");
            return None;
        }

        match response.json::<SpotResponse>().await {
            Ok(body) => body.price.and_then(decimal_from_f64),
            Err(e) => {
                warn!(error = %e, "금 시세 응답 파싱 실패");
                None
            }
        }
    }
}

/// 날짜별 금 가격 결정기.
///
/// 실패하지 않으며, 항상 양수 가격을 반환합니다.
#[derive(Clone)]
pub struct GoldPriceResolver {
    table: GoldPriceTable,
    live: Option<Arc<dyn SpotGoldSource>>,
    live_from: YearMonth,
}

impl GoldPriceResolver {
    pub fn new(
        table: GoldPriceTable,
        live: Option<Arc<dyn SpotGoldSource>>,
        live_from: YearMonth,
    ) -> Self {
        Self {
            table,
            live,
            live_from,
        }
    }

    /// 실시간 소스 없이 테이블만 사용하는 결정기.
    pub fn table_only(table: GoldPriceTable) -> Self {
        Self::new(table, None, gostergec_core::DEFAULT_LIVE_FROM)
    }

    /// `date`의 금 가격을 결정합니다.
    pub async fn resolve(&self, date: NaiveDate, usd_try: Decimal) -> GoldQuote {
        let live_reading = match &self.live {
            Some(source) if in_live_window(date, self.live_from) => {
                source.fetch_spot_usd_oz().await
            }
            _ => None,
        };

        let quote = resolve_gold(date, usd_try, &self.table, self.live_from, live_reading);
        debug!(
            %date,
            tier = quote.tier.as_str(),
            gold_usd_oz = %quote.gold_usd_oz,
            "금 가격 결정"
        );
        quote
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gostergec_core::GoldTier;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSpot {
        price: Option<Decimal>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SpotGoldSource for CountingSpot {
        async fn fetch_spot_usd_oz(&self) -> Option<Decimal> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.price
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[tokio::test]
    async fn test_live_source_only_queried_inside_window() {
        let spot = Arc::new(CountingSpot {
            price: Some(dec!(2900.5)),
            calls: AtomicUsize::new(0),
        });
        let resolver = GoldPriceResolver::new(
            GoldPriceTable::historical(),
            Some(spot.clone()),
            YearMonth::new(2025, 1),
        );

        let old = resolver.resolve(d(2020, 8, 3), dec!(7.3)).await;
        assert_eq!(old.tier, GoldTier::Table);
        assert_eq!(spot.calls.load(Ordering::SeqCst), 0);

        let recent = resolver.resolve(d(2025, 3, 3), dec!(36.5)).await;
        assert_eq!(recent.tier, GoldTier::Live);
        assert_eq!(recent.gold_usd_oz, dec!(2900.50));
        assert_eq!(spot.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_live_falls_through_to_table_edge() {
        let spot = Arc::new(CountingSpot {
            price: None,
            calls: AtomicUsize::new(0),
        });
        let resolver =
            GoldPriceResolver::new(GoldPriceTable::historical(), Some(spot), YearMonth::new(2025, 1));

        let quote = resolver.resolve(d(2025, 3, 3), dec!(36.5)).await;
        assert_eq!(quote.tier, GoldTier::Edge);
        assert!(quote.gold_try_gram > Decimal::ZERO);
    }
}
