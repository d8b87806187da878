//! 펀드 기준가 원시 데이터 정규화.
//!
//! HTTP JSON, CSV, 스프레드시트 세 가지 입력 채널이 모두 이 모듈을 거쳐
//! 하나의 [`FundPriceRecord`] 형태로 모입니다.
//!
//! - 날짜: `DD.MM.YYYY` → `YYYY-MM-DD` 순서로 시도, 숫자만 있으면 epoch 밀리초
//! - 가격(텍스트): 터키식 표기 (`1.234,56`)
//! - 가격(숫자): 그대로 사용
//!
//! 파싱에 실패하거나 0 이하인 행은 버리고 개수만 셉니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::fund::FundPriceRecord;
use crate::error::{CoreError, CoreResult};
use crate::types::{
    decimal_from_f64, istanbul_date_from_millis, parse_turkish_decimal, DateRange, DecimalExt,
};

/// 시도할 텍스트 날짜 형식 (순서대로).
const DATE_FORMATS: [&str; 2] = ["%d.%m.%Y", "%Y-%m-%d"];

/// 이 값 이상의 정수는 epoch 밀리초로 봅니다 (1973-03-03 이후).
const EPOCH_MILLIS_MIN: i64 = 100_000_000_000;

/// TEFAS API는 `TARIH`를 epoch 밀리초 (문자열 또는 숫자)로 보냅니다.
fn date_from_epoch_millis(millis: i64) -> Option<NaiveDate> {
    if millis < EPOCH_MILLIS_MIN {
        return None;
    }
    istanbul_date_from_millis(millis)
}

/// 소스에서 읽은 가공 전 값.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RawField {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl RawField {
    /// JSON 값을 변환합니다. 객체/배열/불리언은 텍스트로 취급합니다.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Empty,
            serde_json::Value::String(s) => Self::text(s),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Empty, Self::Number),
            other => Self::Text(other.to_string()),
        }
    }

    /// 공백뿐인 문자열은 `Empty`로 취급합니다.
    pub fn text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<f64> for RawField {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<NaiveDate> for RawField {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// 소스 한 행 (날짜, 가격).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawFundRow {
    pub date: RawField,
    pub price: RawField,
}

impl RawFundRow {
    pub fn new(date: impl Into<RawField>, price: impl Into<RawField>) -> Self {
        Self {
            date: date.into(),
            price: price.into(),
        }
    }
}

/// 날짜 필드 정규화.
pub fn normalize_date(field: &RawField) -> CoreResult<NaiveDate> {
    match field {
        RawField::Date(date) => Ok(*date),
        RawField::Text(text) => {
            let text_trimmed = text.trim();
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text_trimmed, fmt).ok())
                .or_else(|| {
                    text_trimmed
                        .parse::<i64>()
                        .ok()
                        .and_then(date_from_epoch_millis)
                })
                .ok_or_else(|| CoreError::InvalidDate(text.clone()))
        }
        RawField::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
            date_from_epoch_millis(*n as i64).ok_or_else(|| CoreError::InvalidDate(n.to_string()))
        }
        RawField::Number(n) => Err(CoreError::InvalidDate(n.to_string())),
        RawField::Empty => Err(CoreError::MissingDate),
    }
}

/// 가격 필드 정규화. 0 이하이면 에러입니다.
pub fn normalize_price(field: &RawField) -> CoreResult<Decimal> {
    let price = match field {
        RawField::Text(text) => {
            parse_turkish_decimal(text).ok_or_else(|| CoreError::InvalidPrice(text.clone()))?
        }
        RawField::Number(n) => {
            decimal_from_f64(*n).ok_or_else(|| CoreError::InvalidPrice(n.to_string()))?
        }
        RawField::Date(date) => return Err(CoreError::InvalidPrice(date.to_string())),
        RawField::Empty => return Err(CoreError::MissingPrice),
    };

    if !price.is_positive_price() {
        return Err(CoreError::NonPositivePrice(price.to_string()));
    }

    Ok(price)
}

/// 한 행을 레코드로 변환합니다.
pub fn normalize(fund_code: &str, row: &RawFundRow) -> CoreResult<FundPriceRecord> {
    let date = normalize_date(&row.date)?;
    let price = normalize_price(&row.price)?;
    FundPriceRecord::new(fund_code, date, price)
}

/// 배치 정규화 결과.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedBatch {
    /// 유효한 레코드 (입력 순서 유지)
    pub records: Vec<FundPriceRecord>,
    /// 버려진 행 수
    pub dropped: usize,
}

impl NormalizedBatch {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 범위 밖 레코드를 제거합니다 (버림 카운트에는 포함하지 않음).
    pub fn retain_range(mut self, range: &DateRange) -> Self {
        self.records.retain(|r| range.contains(r.date));
        self
    }
}

/// 여러 행을 정규화합니다. 실패한 행은 로그만 남기고 건너뜁니다.
pub fn normalize_batch<I>(fund_code: &str, rows: I) -> NormalizedBatch
where
    I: IntoIterator<Item = RawFundRow>,
{
    let mut batch = NormalizedBatch::default();

    for row in rows {
        match normalize(fund_code, &row) {
            Ok(record) => batch.records.push(record),
            Err(e) if e.is_drop_reason() => {
                batch.dropped += 1;
                tracing::debug!(fund_code, error = %e, row = ?row, "행 버림");
            }
            Err(e) => {
                batch.dropped += 1;
                tracing::warn!(fund_code, error = %e, "레코드 생성 실패");
            }
        }
    }

    if batch.dropped > 0 {
        tracing::info!(
            fund_code,
            kept = batch.records.len(),
            dropped = batch.dropped,
            "정규화 중 일부 행 제외"
        );
    }

    batch
}
