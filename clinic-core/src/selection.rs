use serde::{Deserialize, Serialize};

use crate::model::{CheckIn, HourBucket, Weekday};

/// Một ô heatmap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct HeatmapCell {
    pub weekday: Weekday,
    pub hour: HourBucket,
}

impl HeatmapCell {
    pub fn new(weekday: Weekday, hour: HourBucket) -> Self {
        Self { weekday, hour }
    }

    /// Đọc nhãn hai trục mà click trên heatmap gửi về. Nhãn lạ cho `None`.
    pub fn from_labels(hour: &str, weekday: &str) -> Option<Self> {
        Some(Self {
            weekday: Weekday::from_label(weekday)?,
            hour: HourBucket::from_label(hour)?,
        })
    }

    pub fn contains(&self, record: &CheckIn) -> bool {
        record.weekday == self.weekday && record.hour_bucket == self.hour
    }
}

/// Lựa chọn trên heatmap tại một lần tương tác.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub selected_hour: Option<HourBucket>,
    pub selected_weekday: Option<Weekday>,
    /// Chỉ bật khi tương tác là nút reset.
    pub is_reset: bool,
}

impl SelectionState {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn clicked(cell: HeatmapCell) -> Self {
        Self {
            selected_hour: Some(cell.hour),
            selected_weekday: Some(cell.weekday),
            is_reset: false,
        }
    }

    pub fn reset() -> Self {
        Self {
            is_reset: true,
            ..Self::default()
        }
    }

    /// Dựng lựa chọn từ nhãn click thô.
    ///
    /// Thiếu hoặc sai nhãn ở một trục nghĩa là không có lựa chọn.
    pub fn from_click(hour: Option<&str>, weekday: Option<&str>, is_reset: bool) -> Self {
        let cell = hour
            .zip(weekday)
            .and_then(|(hour, weekday)| HeatmapCell::from_labels(hour, weekday));
        Self {
            selected_hour: cell.map(|c| c.hour),
            selected_weekday: cell.map(|c| c.weekday),
            is_reset,
        }
    }

    /// Ô đang chọn, trừ khi đang reset hoặc thiếu một trục.
    pub fn active_cell(&self) -> Option<HeatmapCell> {
        if self.is_reset {
            return None;
        }
        Some(HeatmapCell {
            weekday: self.selected_weekday?,
            hour: self.selected_hour?,
        })
    }
}
