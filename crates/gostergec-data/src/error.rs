//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 데이터베이스 연결 오류
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// upsert 배치 실패
    #[error("Upsert failed: {0}")]
    InsertError(String),

    /// 스키마 적용 오류
    #[error("Migration error: {0}")]
    MigrationError(String),

    /// HTTP 클라이언트 생성/요청 오류
    #[error("HTTP error: {0}")]
    FetchError(String),

    /// 파일 입출력 오류
    #[error("I/O error: {0}")]
    IoError(String),

    /// CSV 파싱 오류
    #[error("CSV error: {0}")]
    CsvError(String),

    /// 스프레드시트 읽기 오류
    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(String),

    /// 입력 파일 형식 오류 (필수 열 없음 등)
    #[error("Invalid input: {0}")]
    InvalidData(String),
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        DataError::FetchError(err.to_string())
    }
}

impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        DataError::IoError(err.to_string())
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::CsvError(err.to_string())
    }
}

impl From<calamine::Error> for DataError {
    fn from(err: calamine::Error) -> Self {
        DataError::SpreadsheetError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
