//! 曲线图元定义
//!
//! 支持的曲线图元：
//! - 圆弧 (Arc)
//! - 椭圆/椭圆弧 (Ellipse)
//! - 带凸度的多段线 (Polyline)
//!
//! 图元之间不共享继承层次，公共能力通过 [`HasNormal`]、[`Transformable`]、
//! [`Tessellable`] 三个 trait 表达；[`Geometry`] 是它们的带标签联合。

mod arc;
mod ellipse;
mod polyline;

pub use arc::Arc;
pub use ellipse::Ellipse;
pub use polyline::{Polyline, PolylineVertex};

use crate::error::Result;
use crate::math::{try_unit, Point2, Point3, UnitVector3, Vector3};
use crate::ocs::object_points_to_world;
use crate::tessellate::TessellationConfig;
use crate::transform::AffineTransform3;
use serde::{Deserialize, Serialize};

/// 拥有法向量（即拥有对象坐标系）的图元
pub trait HasNormal {
    /// 单位法向量
    fn normal(&self) -> &UnitVector3;

    /// 设置法向量，零向量返回 `InvalidArgument`，其余自动归一化
    fn set_normal(&mut self, normal: Vector3) -> Result<()>;
}

/// 可进行仿射变换的图元
///
/// 变换失败时图元保持原状。
pub trait Transformable {
    fn transform_by(&mut self, transform: &AffineTransform3) -> Result<TransformReport>;
}

/// 可离散为折线点列的图元
pub trait Tessellable: HasNormal {
    /// 在对象坐标系中离散
    fn tessellate(&self, config: &TessellationConfig) -> Result<Vec<Point2>>;

    /// 离散结果所在平面的标高（OCS Z）
    fn elevation(&self) -> f64;

    /// 离散并转换到世界坐标系
    fn tessellate_world(&self, config: &TessellationConfig) -> Result<Vec<Point3>> {
        let points = self.tessellate(config)?;
        Ok(object_points_to_world(&points, self.elevation(), self.normal()))
    }
}

/// 变换结果附带的提示信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformReport {
    /// 椭圆的某个轴长趋近于零，已被替换为最小值
    pub axis_clamped: bool,
}

/// 几何类型枚举
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Arc(Arc),
    Ellipse(Ellipse),
    Polyline(Polyline),
}

impl Geometry {
    /// 获取几何的类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Arc(_) => "Arc",
            Geometry::Ellipse(_) => "Ellipse",
            Geometry::Polyline(_) => "Polyline",
        }
    }
}

impl HasNormal for Geometry {
    fn normal(&self) -> &UnitVector3 {
        match self {
            Geometry::Arc(a) => a.normal(),
            Geometry::Ellipse(e) => e.normal(),
            Geometry::Polyline(pl) => pl.normal(),
        }
    }

    fn set_normal(&mut self, normal: Vector3) -> Result<()> {
        match self {
            Geometry::Arc(a) => a.set_normal(normal),
            Geometry::Ellipse(e) => e.set_normal(normal),
            Geometry::Polyline(pl) => pl.set_normal(normal),
        }
    }
}

impl Transformable for Geometry {
    fn transform_by(&mut self, transform: &AffineTransform3) -> Result<TransformReport> {
        match self {
            Geometry::Arc(a) => a.transform_by(transform),
            Geometry::Ellipse(e) => e.transform_by(transform),
            Geometry::Polyline(pl) => pl.transform_by(transform),
        }
    }
}

impl Tessellable for Geometry {
    fn tessellate(&self, config: &TessellationConfig) -> Result<Vec<Point2>> {
        match self {
            Geometry::Arc(a) => a.tessellate(config),
            Geometry::Ellipse(e) => e.tessellate(config),
            Geometry::Polyline(pl) => pl.tessellate(config),
        }
    }

    fn elevation(&self) -> f64 {
        match self {
            Geometry::Arc(a) => a.elevation(),
            Geometry::Ellipse(e) => e.elevation(),
            Geometry::Polyline(pl) => pl.elevation(),
        }
    }
}

impl From<Arc> for Geometry {
    fn from(arc: Arc) -> Self {
        Geometry::Arc(arc)
    }
}

impl From<Ellipse> for Geometry {
    fn from(ellipse: Ellipse) -> Self {
        Geometry::Ellipse(ellipse)
    }
}

impl From<Polyline> for Geometry {
    fn from(polyline: Polyline) -> Self {
        Geometry::Polyline(polyline)
    }
}

/// 法向量校验：拒绝零向量，其余归一化
pub(crate) fn validated_normal(normal: &Vector3) -> Result<UnitVector3> {
    try_unit(normal).map_err(|_| crate::error::Error::invalid("normal must not be the zero vector"))
}

/// 变换后的法向量 `M·N`；退化为零向量时沿用原法向量
///
/// 同时返回 `|M·N|`，即沿法向的长度缩放（用于厚度）。
pub(crate) fn transformed_normal(
    transform: &AffineTransform3,
    normal: &UnitVector3,
) -> (UnitVector3, f64) {
    let mapped = transform.transform_vector(&normal.into_inner());
    match try_unit(&mapped) {
        Ok(n) => (n, mapped.norm()),
        Err(_) => (*normal, 0.0),
    }
}

/// 长度类参数校验：必须为有限正数
pub(crate) fn validated_length(value: f64, what: &str) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(crate::error::Error::invalid(format!(
            "{what} must be a positive finite number, got {value}"
        )))
    }
}
