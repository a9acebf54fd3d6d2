//! # vasp2traj / add-modecar 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/traj.rs`, `commands/modecar.rs`

use clap::Args;
use std::path::PathBuf;

/// vasp2traj 子命令参数
#[derive(Args, Debug)]
pub struct Vasp2trajArgs {
    /// Output extxyz file
    pub output: PathBuf,

    /// Input XDATCAR or OUTCAR file(s)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Wrap atoms into the cell centred on the origin
    #[arg(short, long, default_value_t = false)]
    pub wrap: bool,
}

/// add-modecar 子命令参数
#[derive(Args, Debug)]
pub struct AddModecarArgs {
    /// Structure file
    #[arg(short, long, default_value = "POSCAR")]
    pub poscar: PathBuf,

    /// Displacement file (Cartesian, Å)
    #[arg(short, long, default_value = "MODECAR")]
    pub modecar: PathBuf,

    /// Output extxyz file
    #[arg(short, long, default_value = "poscar+modecar.xyz")]
    pub output: PathBuf,
}
