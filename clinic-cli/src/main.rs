use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use clinic_core::{
    render_view, DashboardConfig, DashboardSession, DashboardView, DepartmentBreakdown,
    HourBucket, InteractionEvent, Weekday,
};
use clinic_loader::{load_dataset, DEFAULT_DATA_PATH};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "clinic-cli",
    about = "Heatmap lưu lượng bệnh nhân và chi tiết theo khoa từ dataset check-in phòng khám."
)]
struct Args {
    /// File CSV check-in, dạng thường hoặc nén gzip.
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    input: PathBuf,

    /// File TOML ghi đè cấu hình dashboard.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Phòng khám cần xem. Mặc định là phòng khám đầu tiên trong dataset.
    #[arg(long)]
    clinic: Option<String>,

    /// Ngày bắt đầu, tính cả ngày này (YYYY-MM-DD).
    #[arg(long)]
    start: Option<String>,

    /// Ngày kết thúc, không tính ngày này (YYYY-MM-DD).
    #[arg(long)]
    end: Option<String>,

    /// Nguồn nhập viện cần lấy; lặp lại để chọn nhiều. Mặc định lấy tất cả.
    #[arg(long = "admit")]
    admit_sources: Vec<String>,

    /// Thứ của ô heatmap cần xem chi tiết, ví dụ "Thursday".
    #[arg(long, requires = "hour")]
    day: Option<String>,

    /// Khung giờ của ô heatmap cần xem chi tiết, ví dụ "09 AM".
    #[arg(long, requires = "day")]
    hour: Option<String>,

    /// Bấm reset sau các lựa chọn khác.
    #[arg(long)]
    reset: bool,

    /// In toàn bộ view dạng JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => DashboardConfig::default(),
    };

    let dataset = load_dataset(&args.input, &config)
        .with_context(|| format!("Không đọc được dataset {:?}", args.input))?;

    let mut session = DashboardSession::new(&dataset.summary(), &config);
    let mut interaction = session.current();
    let events = events_from_args(&args, &config)?;
    tracing::debug!(events = events.len(), "replaying command line as dashboard events");
    for event in events {
        interaction = session.apply(event);
    }

    let view = render_view(&dataset, &interaction, &config);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&interaction.criteria.clinic, &view);
    }

    Ok(())
}

fn read_config(path: &Path) -> anyhow::Result<DashboardConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Không đọc được config {path:?}"))?;
    toml::from_str(&text).with_context(|| format!("Config không hợp lệ {path:?}"))
}

/// Phát lại tham số dòng lệnh thành các sự kiện giao diện tương ứng.
fn events_from_args(
    args: &Args,
    config: &DashboardConfig,
) -> anyhow::Result<Vec<InteractionEvent>> {
    let mut events = Vec::new();

    if args.start.is_some() || args.end.is_some() {
        let start = match &args.start {
            Some(text) => clinic_core::parse_date(text)?,
            None => config.default_start,
        };
        let end = match &args.end {
            Some(text) => clinic_core::parse_date(text)?,
            None => config.default_end,
        };
        events.push(InteractionEvent::DateRangeChanged { start, end });
    }
    if let Some(clinic) = &args.clinic {
        events.push(InteractionEvent::ClinicChanged {
            clinic: clinic.clone(),
        });
    }
    if !args.admit_sources.is_empty() {
        events.push(InteractionEvent::AdmitSourcesChanged {
            admit_sources: args.admit_sources.clone(),
        });
    }
    if let (Some(day), Some(hour)) = (&args.day, &args.hour) {
        events.push(InteractionEvent::HeatmapClicked {
            hour: hour.clone(),
            weekday: day.clone(),
        });
    }
    if args.reset {
        events.push(InteractionEvent::ResetClicked);
    }

    Ok(events)
}

fn print_view(clinic: &str, view: &DashboardView) {
    println!("Clinic: {clinic}");
    println!("Matched check-ins: {}", view.matched_records);
    println!();

    print!("{:<10}", "");
    for hour in HourBucket::all() {
        print!("{:>6}", hour.label());
    }
    println!();
    for weekday in Weekday::ALL {
        print!("{:<10}", weekday.label());
        for hour in HourBucket::all() {
            let marker = match view.heatmap.annotation(weekday, hour) {
                Some(annotation) if annotation.emphasized => "*",
                _ => " ",
            };
            print!("{:>5}{marker}", view.heatmap.value(weekday, hour));
        }
        println!();
    }

    for breakdown in [&view.wait_time, &view.care_score] {
        println!();
        match breakdown {
            Some(breakdown) => print_breakdown(breakdown),
            None => println!("(no heatmap cell selected)"),
        }
    }
}

fn print_breakdown(breakdown: &DepartmentBreakdown) {
    println!(
        "{} by department, {} {}",
        breakdown.metric, breakdown.cell.weekday, breakdown.cell.hour
    );
    if breakdown.is_empty() {
        println!("  no check-ins in this cell");
        return;
    }
    for group in &breakdown.departments {
        let stats = &group.stats;
        println!(
            "  {:<24} n={:<4} min={:<6} q1={:<6} median={:<6} q3={:<6} max={:<6}",
            group.department, stats.count, stats.min, stats.q1, stats.median, stats.q3, stats.max
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_config_overrides_defaults() {
        let config: DashboardConfig = toml::from_str(
            r##"
            missing_admit_source = "Unknown"
            default_end = "2014-02-01"

            [heatmap]
            highlight_color = "#000000"
            "##,
        )
        .expect("Config hợp lệ");
        assert_eq!(config.missing_admit_source, "Unknown");
        assert_eq!(config.default_end.to_string(), "2014-02-01");
        assert_eq!(config.heatmap.highlight_color, "#000000");
        assert_eq!(config.heatmap.highlight_font_size, 20);
        assert_eq!(config.timestamp_format, "%Y-%m-%d %I:%M:%S %p");
    }

    #[test]
    fn reset_is_replayed_last() {
        let args = Args::parse_from([
            "clinic-cli",
            "--clinic",
            "Madison",
            "--day",
            "Thursday",
            "--hour",
            "09 AM",
            "--reset",
        ]);
        let events = events_from_args(&args, &DashboardConfig::default()).expect("Không dựng được sự kiện");
        assert_eq!(events.len(), 3);
        assert_eq!(events.last(), Some(&InteractionEvent::ResetClicked));
    }
}
