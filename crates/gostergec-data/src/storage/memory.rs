//! 메모리 저장소 (`--dry-run` 및 테스트용).
//!
//! PostgreSQL과 같은 upsert 의미를 가집니다. 같은 키를 다시 쓰면 덮어씁니다.

use async_trait::async_trait;
use chrono::NaiveDate;
use gostergec_core::{ExchangeRateRecord, FundDescriptor, FundPriceRecord};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::sink::{NaturalKey, Store, UpsertTarget};
use crate::error::{DataError, Result};

#[derive(Debug, Default)]
struct Tables {
    exchange_rates: BTreeMap<NaiveDate, ExchangeRateRecord>,
    fund_prices: BTreeMap<(String, NaiveDate), FundPriceRecord>,
    funds: BTreeMap<String, FundDescriptor>,
    statements: usize,
}

/// 메모리 저장소.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|e| DataError::InsertError(format!("memory store poisoned: {}", e)))
    }

    /// 저장된 환율 (날짜 순).
    pub fn exchange_rates(&self) -> Vec<ExchangeRateRecord> {
        self.lock()
            .map(|t| t.exchange_rates.values().cloned().collect())
            .unwrap_or_default()
    }

    /// 저장된 펀드 기준가 (펀드 코드, 날짜 순).
    pub fn fund_prices(&self) -> Vec<FundPriceRecord> {
        self.lock()
            .map(|t| t.fund_prices.values().cloned().collect())
            .unwrap_or_default()
    }

    /// 저장된 펀드 카탈로그.
    pub fn funds(&self) -> Vec<FundDescriptor> {
        self.lock()
            .map(|t| t.funds.values().cloned().collect())
            .unwrap_or_default()
    }

    /// 실행된 배치 구문 수.
    pub fn statements(&self) -> usize {
        self.lock().map(|t| t.statements).unwrap_or_default()
    }
}

fn upsert_into<R: NaturalKey + Clone>(table: &mut BTreeMap<R::Key, R>, batch: &[R]) {
    for record in batch {
        table.insert(record.natural_key(), record.clone());
    }
}

#[async_trait]
impl UpsertTarget<ExchangeRateRecord> for MemoryStore {
    fn table_name(&self) -> &'static str {
        "exchange_rates"
    }

    async fn upsert_batch(&self, batch: &[ExchangeRateRecord]) -> Result<()> {
        let mut tables = self.lock()?;
        upsert_into(&mut tables.exchange_rates, batch);
        tables.statements += 1;
        Ok(())
    }
}

#[async_trait]
impl UpsertTarget<FundPriceRecord> for MemoryStore {
    fn table_name(&self) -> &'static str {
        "fund_prices"
    }

    async fn upsert_batch(&self, batch: &[FundPriceRecord]) -> Result<()> {
        let mut tables = self.lock()?;
        upsert_into(&mut tables.fund_prices, batch);
        tables.statements += 1;
        Ok(())
    }
}

#[async_trait]
impl UpsertTarget<FundDescriptor> for MemoryStore {
    fn table_name(&self) -> &'static str {
        "funds"
    }

    async fn upsert_batch(&self, batch: &[FundDescriptor]) -> Result<()> {
        let mut tables = self.lock()?;
        upsert_into(&mut tables.funds, batch);
        tables.statements += 1;
        Ok(())
    }
}

impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }
}
