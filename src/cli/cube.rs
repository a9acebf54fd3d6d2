//! # chgcar2cube / elf2cube 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/cube.rs`

use clap::Args;
use std::path::PathBuf;

/// 两个 cube 转换命令共用的参数
#[derive(Args, Debug)]
pub struct CubeArgs {
    /// Input volumetric file(s)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output base name(s), one per input (default: input file name)
    #[arg(short, long, num_args = 1..)]
    pub output: Vec<String>,

    /// Print grid shape and integrals
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Require spin-polarized data and write the spin channels
    #[arg(long, default_value_t = false)]
    pub spin: bool,

    /// Print a table of integrals after the batch
    #[arg(long, default_value_t = false)]
    pub integral: bool,

    /// Write per-file integrals to a CSV file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// chgcar2cube 子命令参数
#[derive(Args, Debug)]
pub struct Chgcar2cubeArgs {
    #[command(flatten)]
    pub common: CubeArgs,

    /// Divide by the cell volume as well (density per Å^3)
    #[arg(long, default_value_t = false)]
    pub volume: bool,
}

/// elf2cube 子命令参数
#[derive(Args, Debug)]
pub struct Elf2cubeArgs {
    #[command(flatten)]
    pub common: CubeArgs,
}
