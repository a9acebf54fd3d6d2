//! # 晶体结构数据模型
//!
//! 定义统一的晶体结构表示，从 POSCAR/CHGCAR/XDATCAR/OUTCAR 解析，
//! 并写出为 cube 与 extxyz 格式。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `density/` 使用
//! - 使用 `models/elements.rs` 获取原子序数

use super::elements;
use serde::{Deserialize, Serialize};

/// 晶格参数表示
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c，单位 Å
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 计算晶格行列式（带符号的体积）
    pub fn determinant(&self) -> f64 {
        let a = self.matrix[0];
        let b = self.matrix[1];
        let c = self.matrix[2];

        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }

    /// 计算晶格体积 (Å³)
    pub fn volume(&self) -> f64 {
        self.determinant().abs()
    }

    /// 分数坐标转笛卡尔坐标
    pub fn to_cartesian(&self, frac: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        [
            frac[0] * m[0][0] + frac[1] * m[1][0] + frac[2] * m[2][0],
            frac[0] * m[0][1] + frac[1] * m[1][1] + frac[2] * m[2][1],
            frac[0] * m[0][2] + frac[1] * m[1][2] + frac[2] * m[2][2],
        ]
    }

    /// 笛卡尔坐标转分数坐标
    ///
    /// 退化晶格（行列式为零）原样返回输入。
    pub fn to_fractional(&self, cart: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        let det = self.determinant();

        if det.abs() < 1e-10 {
            return cart;
        }

        let inv = [
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) / det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) / det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
            ],
        ];

        // r = f · M  =>  f = r · M⁻¹
        [
            cart[0] * inv[0][0] + cart[1] * inv[1][0] + cart[2] * inv[2][0],
            cart[0] * inv[0][1] + cart[1] * inv[1][1] + cart[2] * inv[2][1],
            cart[0] * inv[0][2] + cart[1] * inv[1][2] + cart[2] * inv[2][2],
        ]
    }
}

/// 原子信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atom {
    /// 元素符号
    pub element: String,

    /// 分数坐标 [x, y, z]
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            element: element.into(),
            position,
        }
    }

    /// 原子序数，未知元素返回 0
    pub fn atomic_number(&self) -> u32 {
        elements::atomic_number(&self.element).unwrap_or(0)
    }
}

/// 晶体结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crystal {
    /// 结构名称（POSCAR 注释行）
    pub name: String,

    /// 晶格
    pub lattice: Lattice,

    /// 原子列表
    pub atoms: Vec<Atom>,
}

impl Crystal {
    pub fn new(name: impl Into<String>, lattice: Lattice, atoms: Vec<Atom>) -> Self {
        Crystal {
            name: name.into(),
            lattice,
            atoms,
        }
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// 所有原子的笛卡尔坐标 (Å)
    pub fn cartesian_positions(&self) -> Vec<[f64; 3]> {
        self.atoms
            .iter()
            .map(|a| self.lattice.to_cartesian(a.position))
            .collect()
    }

    /// 以原点为中心把分数坐标折回 [-0.5, 0.5)
    pub fn wrap_centered(&mut self) {
        for atom in &mut self.atoms {
            for x in atom.position.iter_mut() {
                *x = (*x + 0.5).rem_euclid(1.0) - 0.5;
            }
        }
    }

    /// 按笛卡尔位移平移所有原子
    pub fn displace(&mut self, displacements: &[[f64; 3]]) {
        let lattice = self.lattice.clone();
        for (atom, d) in self.atoms.iter_mut().zip(displacements) {
            let cart = lattice.to_cartesian(atom.position);
            atom.position =
                lattice.to_fractional([cart[0] + d[0], cart[1] + d[1], cart[2] + d[2]]);
        }
    }
}
