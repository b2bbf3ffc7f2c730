//! Bridge WASM <-> JavaScript trung lập framework cho pipeline dashboard.

use clinic_core::{
    aggregate_volume, filter_check_ins, render_view, select_detail, CriteriaError,
    DashboardConfig, Dataset, FilterCriteria, Interaction, LoadError, Metric, SelectionState,
};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsClick {
    hour: String,
    weekday: String,
}

/// Trạng thái giao diện gửi kèm mỗi lần gọi.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsViewParams {
    start_date: String,
    end_date: String,
    clinic: String,
    #[serde(default)]
    admit_sources: Vec<String>,
    #[serde(default)]
    click: Option<JsClick>,
    #[serde(default)]
    reset: bool,
}

impl JsViewParams {
    fn into_interaction(self) -> Result<Interaction, CriteriaError> {
        let criteria = FilterCriteria::from_params(
            &self.start_date,
            &self.end_date,
            &self.clinic,
            self.admit_sources,
        )?;
        let selection = SelectionState::from_click(
            self.click.as_ref().map(|click| click.hour.as_str()),
            self.click.as_ref().map(|click| click.weekday.as_str()),
            self.reset,
        );
        Ok(Interaction {
            criteria,
            selection,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsDashboardConfig {
    #[serde(default)]
    missing_admit_source: Option<String>,
    #[serde(default)]
    timestamp_format: Option<String>,
}

impl From<JsDashboardConfig> for DashboardConfig {
    fn from(cfg: JsDashboardConfig) -> Self {
        let mut base = DashboardConfig::default();
        if let Some(sentinel) = cfg.missing_admit_source {
            base.missing_admit_source = sentinel;
        }
        if let Some(format) = cfg.timestamp_format {
            base.timestamp_format = format;
        }
        base
    }
}

/// Dataset giữ phía WASM; JS chỉ truyền tham số lọc.
#[wasm_bindgen]
pub struct ClinicDashboard {
    dataset: Dataset,
    config: DashboardConfig,
}

#[wasm_bindgen]
impl ClinicDashboard {
    /// Đọc CSV check-in một lần duy nhất.
    #[wasm_bindgen(constructor)]
    pub fn new(csv_text: &str, config: Option<JsValue>) -> Result<ClinicDashboard, JsValue> {
        #[cfg(target_arch = "wasm32")]
        console_error_panic_hook::set_once();

        let config = match config {
            Some(js_cfg) => {
                let cfg: JsDashboardConfig = from_value(js_cfg)
                    .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
                DashboardConfig::from(cfg)
            }
            None => DashboardConfig::default(),
        };

        let dataset = clinic_loader::parse_dataset_str(csv_text, &config)
            .map_err(|err| JsValue::from_str(&format_load_error(err)))?;
        Ok(Self { dataset, config })
    }

    /// Lựa chọn cho dropdown và khoảng thời gian check-in.
    pub fn summary(&self) -> Result<JsValue, JsValue> {
        serialize(&self.dataset.summary())
    }

    pub fn heatmap(&self, params: JsValue) -> Result<JsValue, JsValue> {
        let interaction = read_params(params)?;
        let filtered = filter_check_ins(&self.dataset, &interaction.criteria);
        serialize(&aggregate_volume(&filtered, &interaction.selection))
    }

    /// Trả `null` khi khung chi tiết cần để trống.
    #[wasm_bindgen(js_name = departmentDetail)]
    pub fn department_detail(&self, params: JsValue, metric: &str) -> Result<JsValue, JsValue> {
        let metric: Metric = metric.parse().map_err(|err: String| JsValue::from_str(&err))?;
        let interaction = read_params(params)?;
        let filtered = filter_check_ins(&self.dataset, &interaction.criteria);
        serialize(&select_detail(&filtered, &interaction.selection, metric))
    }

    /// Heatmap và cả hai khung chi tiết trong một lần gọi.
    pub fn view(&self, params: JsValue) -> Result<JsValue, JsValue> {
        let interaction = read_params(params)?;
        serialize(&render_view(&self.dataset, &interaction, &self.config))
    }
}

fn read_params(params: JsValue) -> Result<Interaction, JsValue> {
    let params: JsViewParams = from_value(params)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được tham số view: {err}")))?;
    params
        .into_interaction()
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

fn serialize<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|err| JsValue::from_str(&format!("Không serialize được kết quả: {err}")))
}

fn format_load_error(err: LoadError) -> String {
    format!("Dataset error: {err}")
}
