//! 날짜 범위 및 거래일 헬퍼.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use chrono_tz::Europe::Istanbul;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// 주말(토/일)인지 확인합니다.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// 이스탄불 기준 오늘 날짜.
///
/// 데이터 소스가 모두 터키 시장 기준으로 일자를 끊기 때문에
/// 서버 타임존과 무관하게 Europe/Istanbul을 사용합니다.
pub fn istanbul_today() -> NaiveDate {
    Utc::now().with_timezone(&Istanbul).date_naive()
}

/// epoch 밀리초를 이스탄불 기준 날짜로 변환합니다.
pub fn istanbul_date_from_millis(millis: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&Istanbul).date_naive())
}

/// `date` 직전의 평일 (월요일이면 금요일).
pub fn previous_weekday(date: NaiveDate) -> Option<NaiveDate> {
    let mut day = date.pred_opt()?;
    while is_weekend(day) {
        day = day.pred_opt()?;
    }
    Some(day)
}

/// 양끝을 포함하는 날짜 범위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// 새 범위를 생성합니다. `start > end`이면 에러입니다.
    pub fn new(start: NaiveDate, end: NaiveDate) -> CoreResult<Self> {
        if start > end {
            return Err(CoreError::InvalidRange(format!(
                "시작일 {} 이 종료일 {} 보다 늦습니다",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// 하루짜리 범위.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// 제한 없는 범위 (파일 임포트용).
    pub fn unbounded() -> Self {
        Self {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
        }
    }

    /// `end`로부터 `years * 365`일 전까지의 범위.
    pub fn trailing_years(end: NaiveDate, years: u32) -> Self {
        let start = end
            .checked_sub_days(Days::new(u64::from(years) * 365))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    /// 날짜가 범위 안에 있는지 확인합니다.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// 범위에 포함된 일수.
    pub fn len_days(&self) -> u64 {
        (self.end - self.start).num_days() as u64 + 1
    }

    /// 시작일부터 종료일까지 모든 날짜를 순서대로 반환합니다.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// 범위를 최대 `window_days`일씩 잘라 순서대로 반환합니다.
    pub fn windows(&self, window_days: u64) -> Vec<DateRange> {
        let window_days = window_days.max(1);
        let mut windows = Vec::new();
        let mut cursor = self.start;

        loop {
            let window_end = cursor
                .checked_add_days(Days::new(window_days - 1))
                .map_or(self.end, |d| d.min(self.end));
            windows.push(DateRange {
                start: cursor,
                end: window_end,
            });

            match window_end.succ_opt() {
                Some(next) if next <= self.end => cursor = next,
                _ => break,
            }
        }

        windows
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// 연-월 (금 시세 테이블 키).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// 날짜가 속한 연-월.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = CoreError;

    /// `YYYY-MM` 형식을 파싱합니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidDate(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self { year, month })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_previous_weekday() {
        // 2024-06-10 월요일 → 06-07 금요일
        assert_eq!(previous_weekday(d(2024, 6, 10)), Some(d(2024, 6, 7)));
        assert_eq!(previous_weekday(d(2024, 6, 9)), Some(d(2024, 6, 7)));
        assert_eq!(previous_weekday(d(2024, 6, 5)), Some(d(2024, 6, 4)));
    }

    #[test]
    fn test_istanbul_date_from_millis() {
        // 2024-03-14T21:00:00Z = 2024-03-15 00:00 (UTC+3)
        assert_eq!(istanbul_date_from_millis(1_710_450_000_000), Some(d(2024, 3, 15)));
        assert_eq!(istanbul_date_from_millis(i64::MAX), None);
    }

    #[test]
    fn test_is_weekend() {
        assert!(is_weekend(d(2024, 6, 1))); // 토
        assert!(is_weekend(d(2024, 6, 2))); // 일
        assert!(!is_weekend(d(2024, 6, 3))); // 월
    }

    #[test]
    fn test_range_rejects_reversed_bounds() {
        assert!(DateRange::new(d(2024, 1, 2), d(2024, 1, 1)).is_err());
        assert!(DateRange::new(d(2024, 1, 1), d(2024, 1, 1)).is_ok());
    }

    #[test]
    fn test_days_inclusive() {
        let range = DateRange::new(d(2024, 2, 27), d(2024, 3, 1)).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(days, vec![d(2024, 2, 27), d(2024, 2, 28), d(2024, 2, 29), d(2024, 3, 1)]);
        assert_eq!(range.len_days(), 4);
    }

    #[test]
    fn test_windows_cover_range_without_overlap() {
        let range = DateRange::new(d(2024, 1, 1), d(2024, 1, 10)).unwrap();
        let windows = range.windows(4);
        assert_eq!(
            windows,
            vec![
                DateRange::new(d(2024, 1, 1), d(2024, 1, 4)).unwrap(),
                DateRange::new(d(2024, 1, 5), d(2024, 1, 8)).unwrap(),
                DateRange::new(d(2024, 1, 9), d(2024, 1, 10)).unwrap(),
            ]
        );
        assert_eq!(DateRange::single(d(2024, 1, 1)).windows(90).len(), 1);
    }

    #[test]
    fn test_trailing_years() {
        let range = DateRange::trailing_years(d(2024, 12, 31), 1);
        assert_eq!(range.start, d(2024, 1, 1));
        assert_eq!(range.end, d(2024, 12, 31));
    }

    #[test]
    fn test_year_month_parse() {
        assert_eq!("2025-01".parse::<YearMonth>().unwrap(), YearMonth::new(2025, 1));
        assert!("2025-13".parse::<YearMonth>().is_err());
        assert!("202501".parse::<YearMonth>().is_err());
        assert_eq!(YearMonth::new(2025, 3).to_string(), "2025-03");
        assert!(YearMonth::new(2024, 12) < YearMonth::new(2025, 1));
    }
}
