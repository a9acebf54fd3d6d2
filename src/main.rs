//! # vasputil - VASP 后处理工具箱
//!
//! 将分散的 VASP 前后处理脚本用 Rust 重构，统一成单一可执行文件。
//!
//! ## 子命令
//! - `chgcar2cube` - CHGCAR/CHG/PARCHG 转 cube（可选按体积缩放）
//! - `elf2cube`    - ELFCAR 转 cube
//! - `plot-neb`    - VTST NEB 能量曲线绘图
//! - `neb2movie`   - NEB 图像目录转 extxyz 轨迹
//! - `vasp2traj`   - XDATCAR/OUTCAR 转 extxyz 轨迹
//! - `add-modecar` - POSCAR + MODECAR 两帧 extxyz
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (VASP 文件读取, cube/extxyz 写出)
//!   │     ├── density/   (体数据归一化与通道拆分)
//!   │     ├── neb/       (NEB 单位换算、切线与绘图)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod density;
mod error;
mod models;
mod neb;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    // 设置并行度
    let num_threads = if cli.jobs == 0 {
        num_cpus::get()
    } else {
        cli.jobs
    };
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .ok();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
