//! 스프레드시트 내보내기 협력자.
//!
//! TEFAS 화면 자동화로 내려받은 파일의 위치만 알려주는 경계입니다.
//! 브라우저 자동화 자체는 이 크레이트 밖에서 수행됩니다.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// 찾아볼 확장자 (우선순위 순).
const EXPORT_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// 펀드별 내보내기 파일 경로를 제공합니다.
#[async_trait]
pub trait SpreadsheetExporter: Send + Sync {
    /// 펀드의 내보내기 파일 경로. 없으면 `None`.
    async fn export(&self, fund_code: &str) -> Option<PathBuf>;
}

/// 디렉터리에서 `<CODE>.xlsx` / `<CODE>.xls` 파일을 찾는 구현체.
#[derive(Debug, Clone)]
pub struct DirectoryExporter {
    dir: PathBuf,
}

impl DirectoryExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl SpreadsheetExporter for DirectoryExporter {
    async fn export(&self, fund_code: &str) -> Option<PathBuf> {
        for ext in EXPORT_EXTENSIONS {
            let candidate = self.dir.join(format!("{}.{}", fund_code, ext));
            if tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
                return Some(candidate);
            }
        }
        tracing::debug!(fund_code, dir = %self.dir.display(), "내보내기 파일 없음");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prefers_xlsx_then_xls() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("GAL.xls"), b"").unwrap();
        std::fs::write(dir.path().join("TYH.xlsx"), b"").unwrap();
        std::fs::write(dir.path().join("TYH.xls"), b"").unwrap();

        let exporter = DirectoryExporter::new(dir.path());
        assert_eq!(exporter.export("TYH").await, Some(dir.path().join("TYH.xlsx")));
        assert_eq!(exporter.export("GAL").await, Some(dir.path().join("GAL.xls")));
        assert_eq!(exporter.export("IPB").await, None);
    }
}
