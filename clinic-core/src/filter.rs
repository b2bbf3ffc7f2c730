use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::CriteriaError;
use crate::model::{CheckIn, Dataset};

/// Khoảng thời gian check-in nửa mở `[start, end)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Hai mốc đều lúc nửa đêm, nên bản thân ngày `end` bị loại.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: start.and_time(chrono::NaiveTime::MIN),
            end: end.and_time(chrono::NaiveTime::MIN),
        }
    }

    pub fn contains(&self, time: &NaiveDateTime) -> bool {
        self.start <= *time && *time < self.end
    }
}

/// Điều kiện lọc theo phòng khám, nguồn nhập viện và ngày của một lần tương tác.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterCriteria {
    pub date_range: DateRange,
    pub clinic: String,
    pub admit_sources: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn new<I, S>(date_range: DateRange, clinic: impl Into<String>, admit_sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            date_range,
            clinic: clinic.into(),
            admit_sources: admit_sources.into_iter().map(Into::into).collect(),
        }
    }

    /// Dựng điều kiện lọc từ chuỗi của date picker và giá trị dropdown.
    pub fn from_params<I, S>(
        start_date: &str,
        end_date: &str,
        clinic: &str,
        admit_sources: I,
    ) -> Result<Self, CriteriaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let range = DateRange::from_dates(parse_date(start_date)?, parse_date(end_date)?);
        Ok(Self::new(range, clinic, admit_sources))
    }

    pub fn matches(&self, record: &CheckIn) -> bool {
        record.clinic_name == self.clinic
            && self.admit_sources.contains(&record.admit_source)
            && self.date_range.contains(&record.check_in_time)
    }
}

/// Các dòng thỏa mọi điều kiện, tăng dần theo thời điểm check-in.
///
/// Sắp xếp ổn định: các dòng trùng thời điểm giữ thứ tự trong dataset.
pub fn filter_check_ins<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> Vec<&'a CheckIn> {
    let mut matched: Vec<&CheckIn> = dataset
        .records()
        .iter()
        .filter(|record| criteria.matches(record))
        .collect();
    matched.sort_by_key(|record| record.check_in_time);

    tracing::debug!(
        clinic = %criteria.clinic,
        admit_sources = criteria.admit_sources.len(),
        matched = matched.len(),
        "filtered check-ins"
    );
    matched
}

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Nhận `YYYY-MM-DD` hoặc timestamp đầy đủ mà date picker đôi khi gửi.
/// Phần giờ bị bỏ qua.
pub fn parse_date(value: &str) -> Result<NaiveDate, CriteriaError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DATE_TIME_FORMATS.iter().find_map(|format| {
                NaiveDateTime::parse_from_str(value, format)
                    .ok()
                    .map(|time| time.date())
            })
        })
        .ok_or_else(|| CriteriaError::InvalidDate(value.to_string()))
}
