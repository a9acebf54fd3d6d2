//! # 解析器模块
//!
//! VASP 输入输出文件的读取，以及 cube / extxyz 的写出。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: poscar, chgcar, cube, outcar, xdatcar, xyz, neb, modecar

pub mod chgcar;
pub mod cube;
pub mod modecar;
pub mod neb;
pub mod outcar;
pub mod poscar;
pub mod xdatcar;
pub mod xyz;

use crate::error::Result;
use crate::parsers::xyz::Frame;
use std::path::Path;

/// 按文件名推断轨迹格式并解析：名字含 "xdatcar" 的按 XDATCAR 读取，其余按 OUTCAR
pub fn parse_trajectory_file(path: &Path) -> Result<Vec<Frame>> {
    let is_xdatcar = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_lowercase().contains("xdatcar"))
        .unwrap_or(false);

    if is_xdatcar {
        xdatcar::parse_xdatcar_file(path)
    } else {
        outcar::parse_outcar_frames(path)
    }
}
