//! Bản ghi check-in, đặc trưng lịch và dataset bất biến.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Thứ trong tuần, từ Monday tới Sunday theo thứ tự hàng của heatmap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const COUNT: usize = 7;

    pub const ALL: [Weekday; Weekday::COUNT] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Tên thứ đầy đủ bằng tiếng Anh.
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Nghịch đảo chính xác của [`Weekday::label`].
    pub fn from_label(label: &str) -> Option<Self> {
        Weekday::ALL.into_iter().find(|day| day.label() == label)
    }

    /// Vị trí hàng trên heatmap.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Weekday::ALL[day.num_days_from_monday() as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Giờ check-in làm tròn xuống theo giờ, nhãn theo đồng hồ 12 giờ (`"09 AM"`).
///
/// Lưu giá trị 24 giờ để thứ tự đi từ `12 AM` tới `11 PM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HourBucket(u8);

impl HourBucket {
    pub const COUNT: usize = 24;

    /// Trả `None` nếu giờ nằm ngoài `0..24`.
    pub fn new(hour: u8) -> Option<Self> {
        (usize::from(hour) < Self::COUNT).then_some(Self(hour))
    }

    pub fn of(time: &NaiveDateTime) -> Self {
        // `Timelike::hour` is always below 24.
        Self(time.hour() as u8)
    }

    pub fn all() -> impl Iterator<Item = HourBucket> {
        (0..Self::COUNT as u8).map(HourBucket)
    }

    pub fn hour(self) -> u8 {
        self.0
    }

    /// Vị trí cột trên heatmap.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    pub fn label(self) -> String {
        let clock = match self.0 % 12 {
            0 => 12,
            other => other,
        };
        let meridiem = if self.0 < 12 { "AM" } else { "PM" };
        format!("{clock:02} {meridiem}")
    }

    /// Nghịch đảo chính xác của [`HourBucket::label`]; `"9 AM"` hay `"09 am"` đều bị từ chối.
    pub fn from_label(label: &str) -> Option<Self> {
        HourBucket::all().find(|bucket| bucket.label() == label)
    }
}

impl fmt::Display for HourBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl From<HourBucket> for String {
    fn from(bucket: HourBucket) -> Self {
        bucket.label()
    }
}

impl TryFrom<String> for HourBucket {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        HourBucket::from_label(&value).ok_or_else(|| format!("Nhãn giờ không hợp lệ {value:?}"))
    }
}

/// Các trường của một dòng nguồn trước khi chuẩn hóa.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckInRow {
    pub clinic_name: String,
    pub admit_source: Option<String>,
    pub check_in_time: NaiveDateTime,
    pub department: String,
    pub wait_time_minutes: f64,
    pub care_score: f64,
    pub number_of_records: f64,
}

impl CheckInRow {
    /// Điền `missing_admit_source` khi thiếu nguồn nhập viện và suy ra đặc trưng lịch.
    pub fn normalize(self, row_id: usize, missing_admit_source: &str) -> CheckIn {
        let admit_source = self
            .admit_source
            .map(|source| source.trim().to_string())
            .filter(|source| !source.is_empty())
            .unwrap_or_else(|| missing_admit_source.to_string());

        CheckIn {
            row_id,
            clinic_name: self.clinic_name,
            admit_source,
            weekday: Weekday::from(self.check_in_time.weekday()),
            hour_bucket: HourBucket::of(&self.check_in_time),
            check_in_time: self.check_in_time,
            department: self.department,
            wait_time_minutes: self.wait_time_minutes,
            care_score: self.care_score,
            number_of_records: self.number_of_records,
        }
    }
}

/// Một lượt check-in của bệnh nhân.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckIn {
    /// Vị trí dòng trong file nguồn.
    pub row_id: usize,
    pub clinic_name: String,
    pub admit_source: String,
    pub check_in_time: NaiveDateTime,
    pub department: String,
    pub wait_time_minutes: f64,
    pub care_score: f64,
    /// Số lượt dòng này đóng góp vào heatmap.
    pub number_of_records: f64,
    pub weekday: Weekday,
    pub hour_bucket: HourBucket,
}

/// Bảng check-in chỉ đọc. Clone dùng chung các dòng.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Arc<[CheckIn]>,
}

impl Dataset {
    pub fn new(records: Vec<CheckIn>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// Chuẩn hóa các dòng thô, đánh số theo thứ tự đầu vào.
    pub fn from_rows(rows: Vec<CheckInRow>, missing_admit_source: &str) -> Self {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(row_id, row)| row.normalize(row_id, missing_admit_source))
            .collect::<Vec<_>>();
        Self::new(records)
    }

    pub fn records(&self) -> &[CheckIn] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Danh sách lựa chọn và khoảng thời gian cho bảng điều khiển.
    pub fn summary(&self) -> DatasetSummary {
        let mut clinics = Vec::new();
        let mut admit_sources = Vec::new();
        let mut departments = Vec::new();
        let mut seen = (BTreeSet::new(), BTreeSet::new(), BTreeSet::new());

        for record in self.records.iter() {
            if seen.0.insert(record.clinic_name.as_str()) {
                clinics.push(record.clinic_name.clone());
            }
            if seen.1.insert(record.admit_source.as_str()) {
                admit_sources.push(record.admit_source.clone());
            }
            if seen.2.insert(record.department.as_str()) {
                departments.push(record.department.clone());
            }
        }

        DatasetSummary {
            clinics,
            admit_sources,
            departments,
            first_check_in: self.records.iter().map(|r| r.check_in_time).min(),
            last_check_in: self.records.iter().map(|r| r.check_in_time).max(),
            record_count: self.records.len(),
        }
    }
}

/// Các giá trị phân biệt theo thứ tự xuất hiện đầu tiên, kèm khoảng thời gian check-in.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DatasetSummary {
    pub clinics: Vec<String>,
    pub admit_sources: Vec<String>,
    pub departments: Vec<String>,
    pub first_check_in: Option<NaiveDateTime>,
    pub last_check_in: Option<NaiveDateTime>,
    pub record_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn hour_labels_follow_twelve_hour_clock() {
        let labels: Vec<String> = HourBucket::all().map(HourBucket::label).collect();
        assert_eq!(labels.len(), 24);
        assert_eq!(labels[0], "12 AM");
        assert_eq!(labels[9], "09 AM");
        assert_eq!(labels[12], "12 PM");
        assert_eq!(labels[23], "11 PM");
    }

    #[test]
    fn hour_labels_parse_back() {
        for bucket in HourBucket::all() {
            assert_eq!(HourBucket::from_label(&bucket.label()), Some(bucket));
        }
        assert_eq!(HourBucket::from_label("13 PM"), None);
        assert_eq!(HourBucket::from_label("00 AM"), None);
        assert_eq!(HourBucket::from_label("9AM"), None);
        assert_eq!(HourBucket::from_label("09 XM"), None);
        assert_eq!(HourBucket::from_label("9 AM"), None);
        assert_eq!(HourBucket::from_label("+9 am"), None);
        assert_eq!(HourBucket::from_label(" 09 AM "), None);
    }

    #[test]
    fn weekday_follows_calendar() {
        // 2014-01-02 was a Thursday.
        let time = at(2014, 1, 2, 9, 15);
        assert_eq!(Weekday::from(time.weekday()), Weekday::Thursday);
        assert_eq!(Weekday::from_label("Thursday"), Some(Weekday::Thursday));
        assert_eq!(Weekday::from_label("thursday"), None);
        assert_eq!(Weekday::from_label("  THURSDAY"), None);
        assert_eq!(Weekday::from_label("Thu"), None);
    }

    #[test]
    fn normalize_fills_missing_admit_source() {
        let row = CheckInRow {
            clinic_name: "A".into(),
            admit_source: Some("  ".into()),
            check_in_time: at(2014, 1, 5, 23, 59),
            department: "ER".into(),
            wait_time_minutes: 3.0,
            care_score: 5.0,
            number_of_records: 1.0,
        };
        let record = row.normalize(4, "Not Identified");
        assert_eq!(record.admit_source, "Not Identified");
        assert_eq!(record.weekday, Weekday::Sunday);
        assert_eq!(record.hour_bucket.label(), "11 PM");
        assert_eq!(record.row_id, 4);
    }

    #[test]
    fn hour_bucket_serializes_as_label() {
        let bucket = HourBucket::new(15).expect("valid hour");
        let json = serde_json::to_string(&bucket).expect("serialize");
        assert_eq!(json, "\"03 PM\"");
        let back: HourBucket = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, bucket);
    }
}
