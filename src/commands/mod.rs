//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `density/`, `neb/`, `models/`, `utils/`
//! - 子模块: cube, neb, traj, modecar

pub mod cube;
pub mod modecar;
pub mod neb;
pub mod traj;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Chgcar2cube(args) => cube::execute_chgcar(args),
        Commands::Elf2cube(args) => cube::execute_elf(args),
        Commands::PlotNeb(args) => neb::execute_plot(args),
        Commands::Neb2movie(args) => neb::execute_movie(args),
        Commands::Vasp2traj(args) => traj::execute(args),
        Commands::AddModecar(args) => modecar::execute(args),
    }
}
