//! # 体数据转换模块
//!
//! CHGCAR/ELFCAR 网格的归一化、自旋通道组合与积分诊断。
//!
//! ## 依赖关系
//! - 被 `commands/cube.rs` 使用
//! - 使用 `models/`
//! - 子模块: converter

pub mod converter;

pub use converter::{convert, integral, Channel, ConversionMode, IntegralReport, SourceKind};
