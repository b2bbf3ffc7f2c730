/// Lỗi khi dựng dataset lúc khởi động. Luôn là lỗi nghiêm trọng.
///
/// `line` đếm dòng dữ liệu từ 1; dòng header là 0.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Không đọc được dataset {path}: {reason}")]
    Unreadable { path: String, reason: String },
    #[error("Dataset thiếu cột {0:?}")]
    MissingColumn(String),
    #[error("Dòng {line}: dữ liệu lỗi: {reason}")]
    MalformedRow { line: u64, reason: String },
    #[error("Dòng {line}: thời điểm check-in {value:?} không khớp định dạng {format:?}")]
    InvalidTimestamp {
        line: u64,
        value: String,
        format: String,
    },
    #[error("Dòng {line}: giá trị {column} {value:?} không phải số")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },
}

/// Tham số lọc từ giao diện bị từ chối.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CriteriaError {
    #[error("Ngày {0:?} không đúng định dạng YYYY-MM-DD")]
    InvalidDate(String),
}
