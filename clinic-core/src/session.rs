//! Trạng thái bảng điều khiển và việc gộp sự kiện giao diện thành một đầu vào pipeline.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::filter::{DateRange, FilterCriteria};
use crate::model::DatasetSummary;
use crate::selection::{HeatmapCell, SelectionState};

/// Sự kiện giao diện do tầng hiển thị chuyển tới.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionEvent {
    DateRangeChanged { start: NaiveDate, end: NaiveDate },
    ClinicChanged { clinic: String },
    AdmitSourcesChanged { admit_sources: Vec<String> },
    /// Nhãn trục thô của ô được click.
    HeatmapClicked { hour: String, weekday: String },
    ResetClicked,
}

/// Toàn bộ đầu vào cho một lần chạy pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    pub criteria: FilterCriteria,
    pub selection: SelectionState,
}

/// Giá trị điều khiển và click heatmap gần nhất.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSession {
    clinic: String,
    admit_sources: BTreeSet<String>,
    start: NaiveDate,
    end: NaiveDate,
    last_click: Option<HeatmapCell>,
    config: DashboardConfig,
}

impl DashboardSession {
    /// Mở với phòng khám đầu tiên, mọi nguồn nhập viện và khoảng ngày mặc định.
    pub fn new(summary: &DatasetSummary, config: &DashboardConfig) -> Self {
        Self {
            clinic: summary.clinics.first().cloned().unwrap_or_default(),
            admit_sources: summary.admit_sources.iter().cloned().collect(),
            start: config.clamp_date(config.default_start),
            end: config.clamp_date(config.default_end),
            last_click: None,
            config: config.clone(),
        }
    }

    pub fn last_click(&self) -> Option<HeatmapCell> {
        self.last_click
    }

    /// Đầu vào pipeline theo điều khiển hiện tại, coi như sự kiện cuối không phải reset.
    pub fn current(&self) -> Interaction {
        Interaction {
            criteria: self.criteria(),
            selection: self
                .last_click
                .map(SelectionState::clicked)
                .unwrap_or_default(),
        }
    }

    /// Ghi nhận `event` và trả đầu vào cho lần chạy pipeline kế tiếp.
    ///
    /// Reset xóa luôn click đã nhớ ngoài việc để trống khung chi tiết, nên sự kiện
    /// không liên quan tiếp theo không đưa phần chi tiết cũ trở lại.
    pub fn apply(&mut self, event: InteractionEvent) -> Interaction {
        tracing::debug!(?event, "dashboard interaction");
        match event {
            InteractionEvent::DateRangeChanged { start, end } => {
                self.start = self.config.clamp_date(start);
                self.end = self.config.clamp_date(end);
            }
            InteractionEvent::ClinicChanged { clinic } => self.clinic = clinic,
            InteractionEvent::AdmitSourcesChanged { admit_sources } => {
                self.admit_sources = admit_sources.into_iter().collect();
            }
            InteractionEvent::HeatmapClicked { hour, weekday } => {
                self.last_click = HeatmapCell::from_labels(&hour, &weekday);
            }
            InteractionEvent::ResetClicked => {
                self.last_click = None;
                return Interaction {
                    criteria: self.criteria(),
                    selection: SelectionState::reset(),
                };
            }
        }
        self.current()
    }

    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(
            DateRange::from_dates(self.start, self.end),
            self.clinic.clone(),
            self.admit_sources.iter().cloned(),
        )
    }
}
