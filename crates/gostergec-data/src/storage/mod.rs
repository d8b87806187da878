//! 저장소 모듈.
//!
//! - `sink`: 자연 키 중복 제거 + 배치 upsert
//! - `postgres`: PostgreSQL (UNNEST + ON CONFLICT)
//! - `memory`: 메모리 저장소 (`--dry-run`)

pub mod memory;
pub mod postgres;
pub mod sink;

pub use memory::MemoryStore;
pub use postgres::{DatabaseConfig, PostgresStore, SCHEMA_SQL};
pub use sink::{
    dedup_by_key, NaturalKey, Store, UpsertReport, UpsertSink, UpsertTarget, BULK_BATCH_SIZE,
    IMPORT_BATCH_SIZE,
};
