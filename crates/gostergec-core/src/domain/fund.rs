//! 펀드 기준가 레코드와 펀드 카탈로그.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::DecimalExt;

/// 기본 수집 대상 펀드 코드.
pub const DEFAULT_FUND_CODES: [&str; 10] = [
    "TYH", "GAL", "IPB", "TTE", "MAC", "AFA", "IST", "AK1", "YKP", "GAE",
];

/// 펀드 코드 정규화 (공백 제거, 대문자).
///
/// TEFAS 코드는 영숫자 2~8자입니다.
pub fn normalize_fund_code(code: &str) -> CoreResult<String> {
    let code = code.trim().to_uppercase();
    let valid = (2..=8).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphanumeric());
    if !valid {
        return Err(CoreError::InvalidFundCode(code));
    }
    Ok(code)
}

/// 쉼표로 구분된 펀드 코드 목록을 파싱합니다 (예: "tyh, GAL").
///
/// 잘못된 코드는 건너뛰고, 중복은 처음 것만 남깁니다.
pub fn parse_fund_codes(list: &str) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for code in list.split(',').filter(|s| !s.trim().is_empty()) {
        match normalize_fund_code(code) {
            Ok(code) if !codes.contains(&code) => codes.push(code),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "펀드 코드 무시"),
        }
    }
    codes
}

/// `fund_prices` 테이블 레코드 (자연 키: `(fund_code, date)`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundPriceRecord {
    pub fund_code: String,
    pub date: NaiveDate,
    /// 단위 기준가 (TRY, 항상 0보다 큼)
    pub price_try: Decimal,
}

impl FundPriceRecord {
    /// 레코드를 생성합니다. 가격이 0 이하이면 에러입니다.
    pub fn new(fund_code: &str, date: NaiveDate, price_try: Decimal) -> CoreResult<Self> {
        if !price_try.is_positive_price() {
            return Err(CoreError::NonPositivePrice(price_try.to_string()));
        }

        Ok(Self {
            fund_code: normalize_fund_code(fund_code)?,
            date,
            price_try,
        })
    }
}

/// `funds` 테이블 레코드 (자연 키: `code`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundDescriptor {
    pub code: String,
    pub display_name: String,
    pub category: String,
    pub manager: String,
}

impl FundDescriptor {
    fn new(code: &str, display_name: &str, category: &str, manager: &str) -> Self {
        Self {
            code: code.to_string(),
            display_name: display_name.to_string(),
            category: category.to_string(),
            manager: manager.to_string(),
        }
    }
}

/// 초기 펀드 카탈로그.
pub fn default_fund_catalog() -> Vec<FundDescriptor> {
    vec![
        FundDescriptor::new("TYH", "Yapı Kredi Portföy Altın Fonu", "Altın", "Yapı Kredi Portföy"),
        FundDescriptor::new("GAL", "Garanti Portföy Altın Fonu", "Altın", "Garanti Portföy"),
        FundDescriptor::new("IPB", "İş Portföy BIST Banka Endeksi Fonu", "Hisse", "İş Portföy"),
        FundDescriptor::new("TTE", "TEB Portföy Hisse Senedi Fonu", "Hisse", "TEB Portföy"),
        FundDescriptor::new("MAC", "Ak Portföy Amerika Yabancı Hisse Fonu", "Yabancı Hisse", "Ak Portföy"),
        FundDescriptor::new("AFA", "Ak Portföy BIST 30 Fonu", "Hisse", "Ak Portföy"),
        FundDescriptor::new("IST", "İş Portföy Devlet Tahvili Fonu", "Tahvil", "İş Portföy"),
        FundDescriptor::new("AK1", "Ak Portföy Para Piyasası Fonu", "Para Piyasası", "Ak Portföy"),
        FundDescriptor::new("YKP", "Yapı Kredi Para Piyasası Fonu", "Para Piyasası", "Yapı Kredi Portföy"),
        FundDescriptor::new("GAE", "Garanti Portföy Euro Fonu", "Döviz", "Garanti Portföy"),
    ]
}
