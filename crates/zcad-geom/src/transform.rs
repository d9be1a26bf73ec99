//! 3D仿射变换
//!
//! 由 3x3 线性部分和平移向量组成，支持平移、旋转、缩放、镜像等变换。
//! 实体的 `transform_by` 均接受此类型。

use crate::error::Result;
use crate::math::{try_inverse, try_unit, Matrix3, Point3, Vector3};
use nalgebra as na;
use serde::{Deserialize, Serialize};

/// 3D仿射变换 `p' = linear * p + translation`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform3 {
    linear: Matrix3,
    translation: Vector3,
}

impl AffineTransform3 {
    /// 由线性部分和平移创建
    pub fn new(linear: Matrix3, translation: Vector3) -> Self {
        Self {
            linear,
            translation,
        }
    }

    /// 创建单位变换
    pub fn identity() -> Self {
        Self::new(Matrix3::identity(), Vector3::zeros())
    }

    /// 创建平移变换
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(Matrix3::identity(), Vector3::new(dx, dy, dz))
    }

    /// 创建绕任意轴的旋转变换（弧度，轴过原点）
    pub fn rotation(axis: &Vector3, angle: f64) -> Result<Self> {
        let axis = try_unit(axis)?;
        let rotation = na::Rotation3::from_axis_angle(&axis, angle);
        Ok(Self::new(*rotation.matrix(), Vector3::zeros()))
    }

    /// 创建绕Z轴的旋转变换（弧度）
    pub fn rotation_z(angle: f64) -> Self {
        let rotation = na::Rotation3::from_axis_angle(&Vector3::z_axis(), angle);
        Self::new(*rotation.matrix(), Vector3::zeros())
    }

    /// 创建缩放变换（绕原点）
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self::new(
            Matrix3::from_diagonal(&Vector3::new(sx, sy, sz)),
            Vector3::zeros(),
        )
    }

    /// 创建均匀缩放变换
    pub fn uniform_scale(s: f64) -> Self {
        Self::scale(s, s, s)
    }

    /// 创建相对于过原点平面的镜像变换（Householder反射）
    pub fn mirror(plane_normal: &Vector3) -> Result<Self> {
        let n = try_unit(plane_normal)?.into_inner();
        Ok(Self::new(
            Matrix3::identity() - n * n.transpose() * 2.0,
            Vector3::zeros(),
        ))
    }

    /// 组合两个变换（self 在后，other 在前）
    pub fn then(&self, other: &AffineTransform3) -> Self {
        Self {
            linear: self.linear * other.linear,
            translation: self.linear * other.translation + self.translation,
        }
    }

    /// 变换一个点
    pub fn transform_point(&self, point: &Point3) -> Point3 {
        Point3::from(self.linear * point.coords + self.translation)
    }

    /// 变换一个向量（不受平移影响）
    pub fn transform_vector(&self, vector: &Vector3) -> Vector3 {
        self.linear * vector
    }

    /// 获取逆变换
    pub fn inverse(&self) -> Result<Self> {
        let inv = try_inverse(&self.linear)?;
        Ok(Self {
            linear: inv,
            translation: -(inv * self.translation),
        })
    }

    /// 线性部分的行列式
    pub fn determinant(&self) -> f64 {
        self.linear.determinant()
    }

    /// 是否为镜像（反转定向）变换
    pub fn is_mirroring(&self) -> bool {
        self.determinant() < 0.0
    }

    /// 获取线性部分
    pub fn linear(&self) -> &Matrix3 {
        &self.linear
    }

    /// 获取平移分量
    pub fn translation_component(&self) -> &Vector3 {
        &self.translation
    }
}

impl Default for AffineTransform3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for AffineTransform3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.then(&rhs)
    }
}
