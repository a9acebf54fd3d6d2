//! # 工具函数模块
//!
//! 提供美化输出、进度条、文件备份与目录查找等工具。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 子模块: output, progress, fs

pub mod fs;
pub mod output;
pub mod progress;
