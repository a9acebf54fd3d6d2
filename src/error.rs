//! # 统一错误处理模块
//!
//! 定义 vasputil 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// vasputil 统一错误类型
#[derive(Error, Debug)]
pub enum VasputilError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Number of input and output files must be equal ({inputs} inputs, {outputs} outputs)")]
    CountMismatch { inputs: usize, outputs: usize },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Invalid structure format: {0}")]
    InvalidFormat(String),

    // ─────────────────────────────────────────────────────────────
    // 体数据转换错误
    // ─────────────────────────────────────────────────────────────
    #[error("Spin grid shape {companion:?} does not match primary grid shape {primary:?}")]
    ShapeMismatch {
        primary: [usize; 3],
        companion: [usize; 3],
    },

    #[error("File {path} is not spin-polarized")]
    MissingSpinData { path: String },

    #[error("Cell volume must be positive for volume scaling, got {0}")]
    InvalidVolume(f64),

    // ─────────────────────────────────────────────────────────────
    // NEB 绘图错误
    // ─────────────────────────────────────────────────────────────
    #[error("Unknown energy unit: {0}")]
    UnknownUnit(String),

    #[error("Tangent problem: cannot clip force tangent of image {image}")]
    TangentClipping { image: usize },

    #[error("Plotting failed: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{failed} of {total} file(s) failed")]
    BatchFailed { failed: usize, total: usize },

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, VasputilError>;
