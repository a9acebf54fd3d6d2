//! # 能量单位换算
//!
//! 基于 CODATA 2014 常数，以 eV 为基本单位。
//! 复合单位用 `/` 连接，例如 `kJ/mol`、`kcal/mol`、`meV`。
//!
//! ## 依赖关系
//! - 被 `neb/mod.rs`, `commands/neb.rs` 使用

use crate::error::{Result, VasputilError};

/// 元电荷 (C)
const ELEMENTARY_CHARGE: f64 = 1.6021766208e-19;

/// 阿伏伽德罗常数 (1/mol)
const AVOGADRO: f64 = 6.022140857e23;

/// 1 Hartree 对应的 eV
const HARTREE: f64 = 27.21138602;

/// 单个单位以 eV 计的大小
fn unit_value(name: &str) -> Option<f64> {
    let value = match name {
        "eV" => 1.0,
        "meV" => 1e-3,
        "J" => 1.0 / ELEMENTARY_CHARGE,
        "kJ" => 1000.0 / ELEMENTARY_CHARGE,
        "cal" => 4.184 / ELEMENTARY_CHARGE,
        "kcal" => 4184.0 / ELEMENTARY_CHARGE,
        "mol" => AVOGADRO,
        "Hartree" | "Ha" => HARTREE,
        "Ry" => HARTREE / 2.0,
        _ => return None,
    };
    Some(value)
}

/// eV 到目标单位的换算因子：以 eV 为单位的值除以该因子即得目标单位下的值
pub fn conversion_factor(unit: &str) -> Result<f64> {
    let mut parts = unit.split('/').map(str::trim);
    let lookup = |name: &str| {
        unit_value(name).ok_or_else(|| VasputilError::UnknownUnit(name.to_string()))
    };

    let first = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| VasputilError::UnknownUnit(unit.to_string()))?;
    let mut conv = lookup(first)?;
    for part in parts {
        conv /= lookup(part)?;
    }
    Ok(conv)
}
