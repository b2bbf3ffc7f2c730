use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Cấu hình dùng chung cho loader, bảng điều khiển và phần vẽ heatmap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Giá trị gán khi dòng không có nguồn nhập viện.
    pub missing_admit_source: String,
    /// Định dạng `chrono` của cột `Check-In Time`.
    pub timestamp_format: String,
    /// Khoảng ngày được chọn khi mở dashboard.
    pub default_start: NaiveDate,
    pub default_end: NaiveDate,
    /// Giới hạn của date picker.
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub heatmap: HeatmapStyle,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            missing_admit_source: "Not Identified".to_string(),
            timestamp_format: "%Y-%m-%d %I:%M:%S %p".to_string(),
            default_start: ymd(2014, 1, 1),
            default_end: ymd(2014, 1, 15),
            min_date: ymd(2014, 1, 1),
            max_date: ymd(2014, 12, 31),
            heatmap: HeatmapStyle::default(),
        }
    }
}

impl DashboardConfig {
    /// Giữ ngày được chọn trong `[min_date, max_date]`.
    pub fn clamp_date(&self, date: NaiveDate) -> NaiveDate {
        date.clamp(self.min_date, self.max_date.max(self.min_date))
    }
}

/// Gợi ý hiển thị cho phần vẽ heatmap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeatmapStyle {
    pub low_color: String,
    pub high_color: String,
    pub font_family: String,
    pub highlight_font_size: u32,
    pub highlight_color: String,
}

impl Default for HeatmapStyle {
    fn default() -> Self {
        Self {
            low_color: "#caf3ff".to_string(),
            high_color: "#2c82ff".to_string(),
            font_family: "sans-serif".to_string(),
            highlight_font_size: 20,
            highlight_color: "#FFFFFF".to_string(),
        }
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}
