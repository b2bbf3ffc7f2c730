use serde::{Deserialize, Serialize};

use crate::config::{DashboardConfig, HeatmapStyle};
use crate::detail::{select_detail, DepartmentBreakdown, Metric};
use crate::filter::filter_check_ins;
use crate::heatmap::{aggregate_volume, HeatmapGrid};
use crate::model::Dataset;
use crate::session::Interaction;

/// Dữ liệu cho ba biểu đồ liên kết sau một lần tương tác.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardView {
    pub heatmap: HeatmapGrid,
    pub heatmap_style: HeatmapStyle,
    /// `None` nghĩa là khung để trống.
    pub wait_time: Option<DepartmentBreakdown>,
    pub care_score: Option<DepartmentBreakdown>,
    pub matched_records: usize,
}

/// Chạy lọc, tổng hợp heatmap và cả hai phần chi tiết trên cùng một tập đã lọc.
pub fn render_view(
    dataset: &Dataset,
    interaction: &Interaction,
    config: &DashboardConfig,
) -> DashboardView {
    let filtered = filter_check_ins(dataset, &interaction.criteria);
    let selection = &interaction.selection;

    DashboardView {
        heatmap: aggregate_volume(&filtered, selection),
        heatmap_style: config.heatmap.clone(),
        wait_time: select_detail(&filtered, selection, Metric::WaitTimeMinutes),
        care_score: select_detail(&filtered, selection, Metric::CareScore),
        matched_records: filtered.len(),
    }
}
