//! TEFAS 펀드 기준가 API 클라이언트.
//!
//! `POST /BindHistoryInfo`에 폼 데이터를 보내고 `{"data": [...]}` 응답을 받습니다.
//! 각 항목의 날짜는 `Tarih`(또는 `TARIH`), 기준가는 `BirimPayDegeri`(또는 `FIYAT`)
//! 필드에 있습니다. `TARIH`는 epoch 밀리초 문자열로 오며 정규화 단계에서
//! 이스탄불 기준 날짜로 바뀝니다.
//!
//! 어떤 실패든 빈 결과로 처리하고 경고 로그만 남깁니다.

use async_trait::async_trait;
use gostergec_core::{DateRange, RawField, RawFundRow};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::fund_source::FundPriceSource;
use crate::error::Result;

/// 기본 Base URL.
pub const DEFAULT_TEFAS_BASE_URL: &str = "https://www.tefas.gov.tr/api/DB";

/// 투자펀드 유형 코드.
const FUND_TYPE: &str = "YAT";

const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko)";
const ORIGIN: &str = "https://www.tefas.gov.tr";
const REFERER: &str = "https://www.tefas.gov.tr/FonAnaliz.aspx";

/// API 원시 응답.
#[derive(Debug, Deserialize)]
struct HistoryResponse {
    data: Option<Vec<HistoryItem>>,
}

#[derive(Debug, Deserialize)]
struct HistoryItem {
    #[serde(rename = "Tarih", alias = "TARIH", default)]
    date: serde_json::Value,
    #[serde(rename = "BirimPayDegeri", alias = "FIYAT", default)]
    price: serde_json::Value,
}

impl From<HistoryItem> for RawFundRow {
    fn from(item: HistoryItem) -> Self {
        RawFundRow {
            date: RawField::from_json(&item.date),
            price: RawField::from_json(&item.price),
        }
    }
}

/// TEFAS 클라이언트.
#[derive(Clone)]
pub struct TefasClient {
    client: reqwest::Client,
    base_url: String,
}

impl TefasClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn request(&self, fund_code: &str, range: &DateRange) -> Option<Vec<HistoryItem>> {
        let url = format!("{}/BindHistoryInfo", self.base_url);
        let start = range.start.format("%d.%m.%Y").to_string();
        let end = range.end.format("%d.%m.%Y").to_string();

        debug!(fund_code, %range, "TEFAS 요청");

        let response = match self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .header("Origin", ORIGIN)
            .header("Referer", REFERER)
            .form(&[
                ("fontip", FUND_TYPE),
                ("fonkod", fund_code),
                ("start_date", start.as_str()),
                ("end_date", end.as_str()),
            ])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(fund_code, error = %e, "TEFAS 요청 실패");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(fund_code, status = %response.status(), "TEFAS 응답 오류");
            return None;
        }

        match response.json::<HistoryResponse>().await {
            Ok(body) => {
                if body.data.is_none() {
                    warn!(fund_code, "TEFAS 응답에 data 없음");
                }
                body.data
            }
            Err(e) => {
                warn!(fund_code, error = %e, "TEFAS 응답 파싱 실패");
                None
            }
        }
    }
}

#[async_trait]
impl FundPriceSource for TefasClient {
    fn name(&self) -> &'static str {
        "tefas"
    }

    async fn fetch_raw(&self, fund_code: &str, range: &DateRange) -> Result<Vec<RawFundRow>> {
        let items = self.request(fund_code, range).await.unwrap_or_default();
        Ok(items.into_iter().map(RawFundRow::from).collect())
    }
}
