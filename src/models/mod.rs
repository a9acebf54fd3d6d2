//! # 数据模型模块
//!
//! 定义统一的晶体结构与体数据网格模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`density/` 和 `commands/` 使用
//! - 子模块: structure, grid, elements

pub mod elements;
pub mod grid;
pub mod structure;

pub use grid::{point_count, ScalarGrid, VolumetricData};
pub use structure::{Atom, Crystal, Lattice};
