//! 数学基础类型
//!
//! 基于 nalgebra 提供的向量、点和矩阵类型的别名。加法、数乘、点积、叉积、
//! 行列式、转置和矩阵乘法直接使用 nalgebra 的运算符和方法；这里补充几何内核
//! 需要的容差比较、可失败的归一化/求逆，以及平面角度工具。

use crate::error::{Error, Result};
use nalgebra as na;
use std::f64::consts::TAU;

/// 2D点类型
pub type Point2 = na::Point2<f64>;

/// 3D点类型
pub type Point3 = na::Point3<f64>;

/// 2D向量类型
pub type Vector2 = na::Vector2<f64>;

/// 3D向量类型
pub type Vector3 = na::Vector3<f64>;

/// 3D单位向量（法向量）
pub type UnitVector3 = na::UnitVector3<f64>;

/// 3x3矩阵（线性变换、坐标系旋转）
pub type Matrix3 = na::Matrix3<f64>;

/// 数值容差，用于几何比较
pub const EPSILON: f64 = 1e-10;

/// 零长度/零行列式判定阈值
pub const ZERO_TOLERANCE: f64 = 1e-12;

/// 判断两个浮点数是否近似相等
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// 在指定容差下判断两个浮点数是否近似相等
#[inline]
pub fn approx_eq_tol(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// 判断两个2D点是否近似相等
#[inline]
pub fn points_approx_eq(a: &Point2, b: &Point2) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

/// 判断两个2D点是否在给定距离内（焊接判定）
#[inline]
pub fn points_within(a: &Point2, b: &Point2, threshold: f64) -> bool {
    na::distance(a, b) <= threshold
}

/// 两点间的欧氏距离
#[inline]
pub fn distance(a: &Point3, b: &Point3) -> f64 {
    na::distance(a, b)
}

/// 归一化3D向量，零向量返回 `DegenerateVector`
pub fn try_normalize(v: &Vector3) -> Result<Vector3> {
    v.try_normalize(ZERO_TOLERANCE).ok_or(Error::DegenerateVector)
}

/// 归一化2D向量，零向量返回 `DegenerateVector`
pub fn try_normalize2(v: &Vector2) -> Result<Vector2> {
    v.try_normalize(ZERO_TOLERANCE).ok_or(Error::DegenerateVector)
}

/// 构造单位向量，零向量返回 `DegenerateVector`
pub fn try_unit(v: &Vector3) -> Result<UnitVector3> {
    na::Unit::try_new(*v, ZERO_TOLERANCE).ok_or(Error::DegenerateVector)
}

/// 矩阵求逆，行列式近似为零时返回 `SingularMatrix`
pub fn try_inverse(m: &Matrix3) -> Result<Matrix3> {
    if m.determinant().abs() < ZERO_TOLERANCE {
        return Err(Error::SingularMatrix);
    }
    m.try_inverse().ok_or(Error::SingularMatrix)
}

/// 两个向量之间的夹角（弧度，[0, π]）
pub fn angle_between(u: &Vector3, v: &Vector3) -> Result<f64> {
    let u = try_normalize(u)?;
    let v = try_normalize(v)?;
    Ok(u.dot(&v).clamp(-1.0, 1.0).acos())
}

/// 向量相对于X轴正方向的极角（弧度，[0, 2π)）
pub fn polar_angle(v: &Vector2) -> f64 {
    let angle = v.y.atan2(v.x);
    if angle < 0.0 {
        angle + TAU
    } else {
        angle
    }
}

/// 绕原点旋转2D向量（弧度）
#[inline]
pub fn rotate2(v: &Vector2, angle: f64) -> Vector2 {
    na::Rotation2::new(angle) * v
}

/// 将角度（度）归一化到 [0, 360)
pub fn normalize_angle_degrees(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(360.0);
    if normalized >= 360.0 - EPSILON {
        0.0
    } else {
        normalized
    }
}

/// 求两条参数直线 `p0 + t*d0` 与 `p1 + s*d1` 的交点
pub fn line_intersection(p0: &Point2, d0: &Vector2, p1: &Point2, d1: &Vector2) -> Result<Point2> {
    let cross = d0.perp(d1);
    let scale = d0.norm() * d1.norm();
    if !scale.is_normal() || cross.abs() <= EPSILON * scale {
        return Err(Error::ParallelLines);
    }
    let t = (p1 - p0).perp(d1) / cross;
    Ok(p0 + d0 * t)
}
