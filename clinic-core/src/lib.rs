//! Logic lõi của dashboard phân tích phòng khám: lọc lượt check-in, heatmap lưu lượng
//! theo thứ/giờ và phần chi tiết theo khoa.

pub mod config;
pub mod detail;
pub mod error;
pub mod filter;
pub mod heatmap;
pub mod model;
pub mod selection;
pub mod session;
pub mod view;

pub use config::{DashboardConfig, HeatmapStyle};
pub use detail::{
    narrow_to_cell, select_detail, DepartmentBreakdown, DepartmentGroup, DetailPoint,
    DistributionStats, Metric,
};
pub use error::{CriteriaError, LoadError};
pub use filter::{filter_check_ins, parse_date, DateRange, FilterCriteria};
pub use heatmap::{aggregate_volume, CellAnnotation, HeatmapGrid};
pub use model::{CheckIn, CheckInRow, Dataset, DatasetSummary, HourBucket, Weekday};
pub use selection::{HeatmapCell, SelectionState};
pub use session::{DashboardSession, Interaction, InteractionEvent};
pub use view::{render_view, DashboardView};
