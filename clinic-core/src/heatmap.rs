//! Lưu lượng bệnh nhân theo thứ và giờ.

use serde::{Deserialize, Serialize};

use crate::model::{CheckIn, HourBucket, Weekday};
use crate::selection::{HeatmapCell, SelectionState};

/// Chữ hiển thị trên một ô.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CellAnnotation {
    pub weekday: Weekday,
    pub hour: HourBucket,
    pub text: String,
    /// Hiển thị theo kiểu nổi bật.
    pub emphasized: bool,
}

/// Ma trận lưu lượng 7×24, hàng từ Monday tới Sunday, cột từ `12 AM` tới `11 PM`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeatmapGrid {
    pub weekdays: Vec<Weekday>,
    pub hours: Vec<HourBucket>,
    pub values: [[f64; HourBucket::COUNT]; Weekday::COUNT],
    /// Theo thứ tự hàng, mỗi ô một phần tử.
    pub annotations: Vec<CellAnnotation>,
    pub highlight: Option<HeatmapCell>,
}

impl HeatmapGrid {
    pub fn value(&self, weekday: Weekday, hour: HourBucket) -> f64 {
        self.values[weekday.index()][hour.index()]
    }

    pub fn annotation(&self, weekday: Weekday, hour: HourBucket) -> Option<&CellAnnotation> {
        self.annotations
            .get(weekday.index() * HourBucket::COUNT + hour.index())
    }

    pub fn total(&self) -> f64 {
        self.values.iter().flatten().sum()
    }
}

#[derive(Default)]
struct VolumeAccumulator {
    values: [[f64; HourBucket::COUNT]; Weekday::COUNT],
}

impl VolumeAccumulator {
    fn push(&mut self, record: &CheckIn) {
        self.values[record.weekday.index()][record.hour_bucket.index()] +=
            record.number_of_records;
    }

    fn finalize(self, selection: &SelectionState) -> HeatmapGrid {
        let highlight = selection.active_cell();
        let mut annotations = Vec::with_capacity(Weekday::COUNT * HourBucket::COUNT);

        for weekday in Weekday::ALL {
            for hour in HourBucket::all() {
                let value = self.values[weekday.index()][hour.index()];
                annotations.push(CellAnnotation {
                    weekday,
                    hour,
                    text: format!("<b>{}</b>", format_count(value)),
                    emphasized: highlight == Some(HeatmapCell::new(weekday, hour)),
                });
            }
        }

        HeatmapGrid {
            weekdays: Weekday::ALL.to_vec(),
            hours: HourBucket::all().collect(),
            values: self.values,
            annotations,
            highlight,
        }
    }
}

/// Cộng `number_of_records` theo từng ô (thứ, giờ).
///
/// Đầu vào rỗng cho lưới toàn số 0. Ô đang chọn được làm nổi bật trừ khi
/// lựa chọn là reset.
pub fn aggregate_volume(records: &[&CheckIn], selection: &SelectionState) -> HeatmapGrid {
    let mut acc = VolumeAccumulator::default();
    for record in records {
        acc.push(record);
    }
    let grid = acc.finalize(selection);
    tracing::debug!(records = records.len(), total = grid.total(), "aggregated volume");
    grid
}

fn format_count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_print_without_trailing_zeroes() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(12.0), "12");
        assert_eq!(format_count(2.5), "2.5");
    }

    #[test]
    fn empty_input_is_zero_filled() {
        let grid = aggregate_volume(&[], &SelectionState::none());
        assert_eq!(grid.total(), 0.0);
        assert_eq!(grid.annotations.len(), 168);
        assert!(grid.annotations.iter().all(|a| a.text == "<b>0</b>" && !a.emphasized));
        assert_eq!(grid.highlight, None);
    }
}
