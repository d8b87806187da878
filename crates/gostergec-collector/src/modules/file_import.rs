//! CSV / 스프레드시트 파일 임포트.
//!
//! 명시적으로 지정한 파일을 읽지 못하면 에러로 종료합니다.
//! 내보내기 디렉터리 일괄 임포트는 파일이 없는 펀드를 건너뜁니다.

use gostergec_core::{normalize_fund_code, DateRange};
use gostergec_data::{
    CsvFundFile, FundPriceSource, SpreadsheetExporter, SpreadsheetFundFile, Store, UpsertSink,
};
use std::path::Path;
use std::time::Instant;

use crate::error::CollectorError;
use crate::{CollectionStats, Result};

/// 소스 하나에서 펀드 하나를 읽어 저장합니다.
async fn import_from(
    source: &dyn FundPriceSource,
    store: &dyn Store,
    sink: UpsertSink,
    fund_code: &str,
    stats: &mut CollectionStats,
) -> Result<()> {
    stats.total += 1;

    let batch = source
        .fetch(fund_code, &DateRange::unbounded())
        .await
        .map_err(|e| CollectorError::Input(e.to_string()))?;

    stats.dropped += batch.dropped;
    if batch.is_empty() {
        stats.empty += 1;
        tracing::warn!(fund_code, source = source.name(), "가져올 레코드가 없습니다");
        return Ok(());
    }

    let report = sink.upsert(store, batch.records).await;
    tracing::info!(
        fund_code,
        source = source.name(),
        written = report.written,
        dropped = batch.dropped,
        "임포트 완료"
    );
    stats.record_upsert(report);
    Ok(())
}

/// CSV 파일 하나를 임포트합니다.
pub async fn import_csv(
    store: &dyn Store,
    sink: UpsertSink,
    fund_code: &str,
    path: &Path,
) -> Result<CollectionStats> {
    let started = Instant::now();
    let fund_code = normalize_fund_code(fund_code)?;
    let mut stats = CollectionStats::new();

    import_from(&CsvFundFile::new(path), store, sink, &fund_code, &mut stats).await?;

    stats.elapsed = started.elapsed();
    Ok(stats)
}

/// 스프레드시트 파일 하나를 임포트합니다.
pub async fn import_spreadsheet(
    store: &dyn Store,
    sink: UpsertSink,
    fund_code: &str,
    path: &Path,
) -> Result<CollectionStats> {
    let started = Instant::now();
    let fund_code = normalize_fund_code(fund_code)?;
    let mut stats = CollectionStats::new();

    import_from(&SpreadsheetFundFile::new(path), store, sink, &fund_code, &mut stats).await?;

    stats.elapsed = started.elapsed();
    Ok(stats)
}

/// 내보내기 파일이 있는 펀드를 모두 임포트합니다.
pub async fn import_exports(
    exporter: &dyn SpreadsheetExporter,
    store: &dyn Store,
    sink: UpsertSink,
    codes: &[String],
) -> CollectionStats {
    let started = Instant::now();
    let mut stats = CollectionStats::new();

    for fund_code in codes {
        let Some(path) = exporter.export(fund_code).await else {
            stats.total += 1;
            stats.skipped += 1;
            tracing::warn!(fund_code = %fund_code, "내보내기 파일 없음, 건너뜀");
            continue;
        };

        let source = SpreadsheetFundFile::new(&path);
        if let Err(e) = import_from(&source, store, sink, fund_code, &mut stats).await {
            stats.errors += 1;
            tracing::error!(fund_code = %fund_code, path = %path.display(), error = %e, "임포트 실패");
        }
    }

    stats.elapsed = started.elapsed();
    stats
}
