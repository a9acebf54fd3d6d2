//! # 美化输出工具
//!
//! 提供统一的终端输出样式。`-v` 模式下的诊断信息也经由这里输出。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块使用
//! - 使用 `colored` crate

use colored::Colorize;

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印一条诊断键值，例如 `Grid shape: 48 x 48 x 48`
pub fn print_detail(key: &str, value: &str) {
    println!("    {} {}", format!("{}:", key).dimmed(), value);
}

/// 打印备份消息
pub fn print_backup(from: &str, to: &str) {
    println!(
        "{} {} {} {}",
        "[BAK]".yellow(),
        from.dimmed(),
        "->".cyan(),
        to
    );
}

/// 打印转换成功消息
pub fn print_conversion(from: &str, to: &str) {
    println!(
        "{} {} {} {}",
        "[OK]".green().bold(),
        from.dimmed(),
        "->".cyan(),
        to
    );
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}
