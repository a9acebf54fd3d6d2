//! # 元素周期表
//!
//! 元素符号与原子序数的对应关系，用于写出 cube 文件的原子行。
//!
//! ## 依赖关系
//! - 被 `models/structure.rs` 使用
//! - 纯静态数据，无外部依赖

/// 按原子序数排列的元素符号
const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

/// 去掉 POTCAR 风格的后缀，例如 `Fe_pv`、`O_s/1a2b3c`
pub fn normalize_symbol(symbol: &str) -> &str {
    symbol
        .split(|c| c == '_' || c == '/' || c == '.')
        .next()
        .unwrap_or(symbol)
        .trim()
}

/// 查询原子序数
pub fn atomic_number(symbol: &str) -> Option<u32> {
    let symbol = normalize_symbol(symbol);
    SYMBOLS
        .iter()
        .position(|s| s.eq_ignore_ascii_case(symbol))
        .map(|i| i as u32 + 1)
}
