//! Phân tích theo khoa cho các lượt check-in của một ô heatmap.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::CheckIn;
use crate::selection::{HeatmapCell, SelectionState};

/// Chỉ số vẽ theo từng khoa.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    WaitTimeMinutes,
    CareScore,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::WaitTimeMinutes, Metric::CareScore];

    pub fn value_of(self, record: &CheckIn) -> f64 {
        match self {
            Metric::WaitTimeMinutes => record.wait_time_minutes,
            Metric::CareScore => record.care_score,
        }
    }

    /// Tên cột nguồn, dùng làm tiêu đề trục.
    pub fn label(self) -> &'static str {
        match self {
            Metric::WaitTimeMinutes => "Wait Time Min",
            Metric::CareScore => "Care Score",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "wait_time" | "wait_time_minutes" | "wait_time_min" => Ok(Metric::WaitTimeMinutes),
            "care_score" | "score" => Ok(Metric::CareScore),
            other => Err(format!("Không rõ chỉ số {other:?}")),
        }
    }
}

/// Một lượt check-in vẽ thành điểm trên box plot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailPoint {
    pub row_id: usize,
    pub check_in_time: NaiveDateTime,
    pub value: f64,
}

/// Tóm tắt năm số kèm trung bình, như box plot thể hiện.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistributionStats {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

impl DistributionStats {
    /// Tứ phân vị nội suy tuyến tính giữa hai hạng gần nhất. Đầu vào rỗng cho toàn số 0.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                count: 0,
                min: 0.0,
                q1: 0.0,
                median: 0.0,
                q3: 0.0,
                max: 0.0,
                mean: 0.0,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let count = sorted.len();

        Self {
            count,
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[count - 1],
            mean: sorted.iter().sum::<f64>() / count as f64,
        }
    }
}

fn quantile(sorted: &[f64], p: f64) -> f64 {
    let position = p * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepartmentGroup {
    pub department: String,
    /// Giá trị chỉ số theo thứ tự check-in.
    pub values: Vec<f64>,
    pub points: Vec<DetailPoint>,
    pub stats: DistributionStats,
}

/// Phân phối một chỉ số theo từng khoa cho một ô.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepartmentBreakdown {
    pub metric: Metric,
    pub cell: HeatmapCell,
    pub departments: Vec<DepartmentGroup>,
}

impl DepartmentBreakdown {
    pub fn department(&self, name: &str) -> Option<&DepartmentGroup> {
        self.departments.iter().find(|group| group.department == name)
    }

    pub fn row_count(&self) -> usize {
        self.departments.iter().map(|group| group.points.len()).sum()
    }

    /// `true` khi ô được chọn nhưng không có lượt check-in nào.
    pub fn is_empty(&self) -> bool {
        self.departments.is_empty()
    }
}

/// Các lượt check-in rơi vào `cell`, giữ thứ tự đầu vào.
pub fn narrow_to_cell<'a>(records: &[&'a CheckIn], cell: HeatmapCell) -> Vec<&'a CheckIn> {
    records
        .iter()
        .copied()
        .filter(|record| cell.contains(record))
        .collect()
}

/// Nhóm các lượt check-in của ô đang chọn theo khoa cho `metric`.
///
/// Trả `None` khi chưa chọn ô hoặc lựa chọn là reset; khung chi tiết khi đó để trống
/// thay vì vẽ biểu đồ rỗng.
pub fn select_detail(
    records: &[&CheckIn],
    selection: &SelectionState,
    metric: Metric,
) -> Option<DepartmentBreakdown> {
    let cell = selection.active_cell()?;
    let narrowed = narrow_to_cell(records, cell);

    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<DetailPoint>> = HashMap::new();
    for record in &narrowed {
        let points = groups.entry(record.department.as_str()).or_insert_with(|| {
            order.push(record.department.as_str());
            Vec::new()
        });
        points.push(DetailPoint {
            row_id: record.row_id,
            check_in_time: record.check_in_time,
            value: metric.value_of(record),
        });
    }

    let departments = order
        .into_iter()
        .filter_map(|name| {
            let points = groups.remove(name)?;
            let values: Vec<f64> = points.iter().map(|point| point.value).collect();
            Some(DepartmentGroup {
                department: name.to_string(),
                stats: DistributionStats::from_values(&values),
                values,
                points,
            })
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        metric = %metric,
        weekday = %cell.weekday,
        hour = %cell.hour,
        rows = narrowed.len(),
        departments = departments.len(),
        "selected department detail"
    );

    Some(DepartmentBreakdown {
        metric,
        cell,
        departments,
    })
}
