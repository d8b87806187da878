//! Frankfurter 환율 API 클라이언트.
//!
//! USD 기준으로 TRY와 EUR 시세를 한 번에 받아 EUR/TRY를 파생합니다.
//!
//! ```text
//! GET /2024-03-15?from=USD&to=TRY,EUR
//! {"amount":1.0,"base":"USD","date":"2024-03-15","rates":{"EUR":0.9187,"TRY":32.1}}
//! ```
//!
//! 요청 실패, 200이 아닌 응답, 파싱 실패는 모두 "데이터 없음"(`None`)으로 처리합니다.
//! 이 계층에서는 재시도하지 않습니다.

use async_trait::async_trait;
use chrono::NaiveDate;
use gostergec_core::{decimal_from_f64, RateQuote};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::Result;

/// 기본 Base URL.
pub const DEFAULT_RATES_BASE_URL: &str = "https://api.frankfurter.app";

/// 환율 소스.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// 특정 일자의 USD/TRY, EUR/TRY 시세.
    async fn fetch_rates(&self, date: NaiveDate) -> Option<RateQuote>;

    /// 최신 시세와 API가 보고한 기준일.
    async fn fetch_latest(&self) -> Option<(NaiveDate, RateQuote)>;
}

/// API 원시 응답.
#[derive(Debug, Deserialize)]
struct RatesResponse {
    date: Option<NaiveDate>,
    #[serde(default)]
    rates: RawRates,
}

#[derive(Debug, Default, Deserialize)]
struct RawRates {
    #[serde(rename = "TRY")]
    try_per_usd: Option<f64>,
    #[serde(rename = "EUR")]
    eur_per_usd: Option<f64>,
}

impl RatesResponse {
    fn quote(&self) -> Option<RateQuote> {
        let try_per_usd = decimal_from_f64(self.rates.try_per_usd?)?;
        let eur_per_usd = decimal_from_f64(self.rates.eur_per_usd?)?;
        RateQuote::from_usd_legs(try_per_usd, eur_per_usd)
    }
}

/// Frankfurter API 클라이언트.
#[derive(Clone)]
pub struct FrankfurterClient {
    client: reqwest::Client,
    base_url: String,
}

impl FrankfurterClient {
    /// 새 클라이언트를 생성합니다.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// 경로 하나를 조회합니다 (`/<date>` 또는 `/latest`).
    async fn request(&self, path: &str) -> Option<RatesResponse> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "환율 API 요청");

        let response = match self
            .client
            .get(&url)
            .query(&[("from", "USD"), ("to", "TRY,EUR")])
            .header("Accept", "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(path, error = %e, "환율 API 요청 실패");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(path, status = %response.status(), "환율 데이터 없음");
            return None;
        }

        match response.json::<RatesResponse>().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(path, error = %e, "환율 응답 파싱 실패");
                None
            }
        }
    }
}

#[async_trait]
impl RateSource for FrankfurterClient {
    async fn fetch_rates(&self, date: NaiveDate) -> Option<RateQuote> {
        let body = self.request(&date.format("%Y-%m-%d").to_string()).await?;

        // 비거래일에는 직전 거래일 시세를 돌려주므로 해당 일자 데이터 없음으로 처리
        if let Some(as_of) = body.date.filter(|as_of| *as_of != date) {
            debug!(%date, %as_of, "요청 일자와 기준일 불일치, 데이터 없음");
            return None;
        }

        let quote = body.quote();
        if quote.is_none() {
            warn!(%date, "환율 응답에 유효한 TRY/EUR 값 없음");
        }
        quote
    }

    async fn fetch_latest(&self) -> Option<(NaiveDate, RateQuote)> {
        let body = self.request("latest").await?;
        match (body.date, body.quote()) {
            (Some(date), Some(quote)) => Some((date, quote)),
            _ => {
                warn!("최신 환율 응답 불완전");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_from_response() {
        let body: RatesResponse = serde_json::from_str(
            r#"{"amount":1.0,"base":"USD","date":"2024-03-15","rates":{"EUR":0.92,"TRY":32.1234567}}"#,
        )
        .unwrap();
        let quote = body.quote().unwrap();
        assert_eq!(quote.usd_try, dec!(32.1235));
        assert_eq!(quote.eur_try, dec!(34.9168));
    }

    #[test]
    fn test_missing_leg_is_unavailable() {
        let body: RatesResponse =
            serde_json::from_str(r#"{"date":"2024-03-15","rates":{"TRY":32.1}}"#).unwrap();
        assert!(body.quote().is_none());

        let body: RatesResponse = serde_json::from_str(r#"{"message":"not found"}"#).unwrap();
        assert!(body.quote().is_none());
    }
}
