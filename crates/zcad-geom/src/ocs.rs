//! 对象坐标系 (OCS)
//!
//! 采用 DXF 的"任意轴算法"：由实体的单位法向量 N 构造正交标架 (Ax, Ay, N)。
//! 当 N 非常接近世界 Z 轴时以世界 Y 轴为参考轴，否则以世界 Z 轴为参考轴，
//! 避免叉积接近零。
//!
//! 坐标转换只做旋转：沿法向的标高体现为 OCS 点的 Z 分量，不单独平移。

use crate::math::{Matrix3, Point2, Point3, UnitVector3, Vector3};
use serde::{Deserialize, Serialize};

/// 参考轴切换阈值
pub const ARBITRARY_AXIS_THRESHOLD: f64 = 1.0 / 64.0;

/// 坐标系
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateSystem {
    /// 世界坐标系 (WCS)
    World,
    /// 对象坐标系 (OCS)
    Object,
}

/// 构造 OCS → WCS 的旋转矩阵，三列依次为 Ax、Ay、N
///
/// 其转置即为 WCS → OCS 的旋转矩阵。
pub fn arbitrary_axis(normal: &UnitVector3) -> Matrix3 {
    let n = normal.into_inner();
    let reference = if n.x.abs() < ARBITRARY_AXIS_THRESHOLD && n.y.abs() < ARBITRARY_AXIS_THRESHOLD
    {
        Vector3::y()
    } else {
        Vector3::z()
    };

    // 参考轴的选择保证叉积模长不小于阈值，这里的归一化不会退化
    let ax = reference.cross(&n).normalize();
    let ay = n.cross(&ax).normalize();
    Matrix3::from_columns(&[ax, ay, n])
}

/// 选择从 `from` 到 `to` 的旋转矩阵
fn rotation(normal: &UnitVector3, from: CoordinateSystem, to: CoordinateSystem) -> Option<Matrix3> {
    match (from, to) {
        (CoordinateSystem::Object, CoordinateSystem::World) => Some(arbitrary_axis(normal)),
        (CoordinateSystem::World, CoordinateSystem::Object) => {
            Some(arbitrary_axis(normal).transpose())
        }
        _ => None,
    }
}

/// 转换单个点
pub fn transform_point(
    point: &Point3,
    normal: &UnitVector3,
    from: CoordinateSystem,
    to: CoordinateSystem,
) -> Point3 {
    match rotation(normal, from, to) {
        Some(m) => Point3::from(m * point.coords),
        None => *point,
    }
}

/// 批量转换点列表
pub fn transform_points(
    points: &[Point3],
    normal: &UnitVector3,
    from: CoordinateSystem,
    to: CoordinateSystem,
) -> Vec<Point3> {
    match rotation(normal, from, to) {
        Some(m) => points.iter().map(|p| Point3::from(m * p.coords)).collect(),
        None => points.to_vec(),
    }
}

/// 将 OCS 中的平面点（位于给定标高）提升为世界坐标
pub fn object_points_to_world(
    points: &[Point2],
    elevation: f64,
    normal: &UnitVector3,
) -> Vec<Point3> {
    let m = arbitrary_axis(normal);
    points
        .iter()
        .map(|p| Point3::from(m * Vector3::new(p.x, p.y, elevation)))
        .collect()
}
