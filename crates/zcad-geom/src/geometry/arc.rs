//! 圆弧

use super::{
    transformed_normal, validated_length, validated_normal, HasNormal, Polyline, PolylineVertex,
    Tessellable, TransformReport, Transformable,
};
use crate::error::{Error, Result};
use crate::math::{
    normalize_angle_degrees, polar_angle, Point2, Point3, UnitVector3, Vector2, Vector3, EPSILON,
};
use crate::ocs::{arbitrary_axis, transform_point, CoordinateSystem};
use crate::tessellate::TessellationConfig;
use crate::transform::AffineTransform3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::debug;

/// 圆弧
///
/// 圆心使用世界坐标；起止角（度）在对象坐标系中从 X 轴逆时针度量。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    center: Point3,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    thickness: f64,
    normal: UnitVector3,
}

impl Arc {
    /// 创建圆弧，法向量默认为 +Z
    pub fn new(center: Point3, radius: f64, start_angle: f64, end_angle: f64) -> Result<Self> {
        Ok(Self {
            center,
            radius: validated_length(radius, "arc radius")?,
            start_angle: normalize_angle_degrees(start_angle),
            end_angle: normalize_angle_degrees(end_angle),
            thickness: 0.0,
            normal: Vector3::z_axis(),
        })
    }

    /// 设置法向量
    pub fn with_normal(mut self, normal: Vector3) -> Result<Self> {
        self.set_normal(normal)?;
        Ok(self)
    }

    /// 设置厚度
    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn center(&self) -> &Point3 {
        &self.center
    }

    pub fn set_center(&mut self, center: Point3) {
        self.center = center;
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f64) -> Result<()> {
        self.radius = validated_length(radius, "arc radius")?;
        Ok(())
    }

    /// 起始角（度，[0, 360)）
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn set_start_angle(&mut self, angle: f64) {
        self.start_angle = normalize_angle_degrees(angle);
    }

    /// 终止角（度，[0, 360)）
    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    pub fn set_end_angle(&mut self, angle: f64) {
        self.end_angle = normalize_angle_degrees(angle);
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn set_thickness(&mut self, thickness: f64) {
        self.thickness = thickness;
    }

    /// 扫过的角度（度，逆时针）
    pub fn sweep_angle(&self) -> f64 {
        (self.end_angle - self.start_angle).rem_euclid(360.0)
    }

    /// 圆心在对象坐标系中的位置
    pub fn ocs_center(&self) -> Point3 {
        transform_point(
            &self.center,
            &self.normal,
            CoordinateSystem::World,
            CoordinateSystem::Object,
        )
    }

    /// 对象坐标系中指定角度（度）处的点
    fn point_at(&self, angle: f64) -> Point2 {
        let c = self.ocs_center();
        let (sin, cos) = angle.to_radians().sin_cos();
        Point2::new(c.x + self.radius * cos, c.y + self.radius * sin)
    }

    /// 起点（对象坐标系）
    pub fn start_point(&self) -> Point2 {
        self.point_at(self.start_angle)
    }

    /// 终点（对象坐标系）
    pub fn end_point(&self) -> Point2 {
        self.point_at(self.end_angle)
    }

    /// 将圆弧等角度离散为 `precision + 1` 个点（含两端点，对象坐标系）
    pub fn polygonal_vertices(&self, precision: usize) -> Result<Vec<Point2>> {
        if precision < 2 {
            return Err(Error::invalid(format!(
                "arc precision must be at least 2, got {precision}"
            )));
        }

        let c = self.ocs_center();
        let start = self.start_angle.to_radians();
        let mut end = self.end_angle.to_radians();
        if end < start {
            end += TAU;
        }
        let delta = (end - start) / precision as f64;

        Ok((0..=precision)
            .map(|i| {
                let (sin, cos) = (start + delta * i as f64).sin_cos();
                Point2::new(c.x + self.radius * cos, c.y + self.radius * sin)
            })
            .collect())
    }

    /// 转换为等价的折线（开放，位于圆心标高）
    pub fn to_polyline(&self, precision: usize) -> Result<Polyline> {
        let vertices = self
            .polygonal_vertices(precision)?
            .into_iter()
            .map(|p| PolylineVertex::new(p.x, p.y))
            .collect();

        let mut polyline = Polyline::new(vertices, false);
        polyline.set_elevation(self.ocs_center().z);
        polyline.set_thickness(self.thickness);
        polyline.set_normal(self.normal.into_inner())?;
        Ok(polyline)
    }

    /// 计算变换后的圆弧，不修改自身
    ///
    /// 只接受在圆弧平面内为相似变换（旋转、均匀缩放、镜像）的映射，
    /// 其余映射应先转换为椭圆再变换。
    fn transformed(&self, transform: &AffineTransform3) -> Result<Self> {
        let (normal, normal_scale) = transformed_normal(transform, &self.normal);
        let old_to_world = arbitrary_axis(&self.normal);
        let world_to_new = arbitrary_axis(&normal).transpose();
        let carry = |v: Vector3| world_to_new * transform.transform_vector(&(old_to_world * v));

        let ex = carry(Vector3::x());
        let ey = carry(Vector3::y());
        let (lx, ly) = (ex.xy().norm(), ey.xy().norm());
        let scale = lx.max(ly);
        let is_similar = scale > EPSILON
            && (lx - ly).abs() <= EPSILON * scale
            && ex.xy().dot(&ey.xy()).abs() <= EPSILON * scale * scale
            && ex.z.abs() <= EPSILON * scale
            && ey.z.abs() <= EPSILON * scale;
        if !is_similar {
            return Err(Error::invalid(
                "transform is not a similarity in the arc plane; convert the arc to an ellipse",
            ));
        }

        let boundary_angle = |angle: f64| {
            let (sin, cos) = angle.to_radians().sin_cos();
            let v = carry(Vector3::new(cos, sin, 0.0));
            polar_angle(&Vector2::new(v.x, v.y)).to_degrees()
        };
        let mut start_angle = boundary_angle(self.start_angle);
        let mut end_angle = boundary_angle(self.end_angle);
        if transform.is_mirroring() {
            std::mem::swap(&mut start_angle, &mut end_angle);
        }

        Ok(Self {
            center: transform.transform_point(&self.center),
            radius: self.radius * scale,
            start_angle: normalize_angle_degrees(start_angle),
            end_angle: normalize_angle_degrees(end_angle),
            thickness: self.thickness * normal_scale,
            normal,
        })
    }
}

impl From<&Arc> for super::Ellipse {
    fn from(arc: &Arc) -> Self {
        super::Ellipse::from_arc_parts(
            arc.center,
            arc.radius,
            arc.start_angle,
            arc.end_angle,
            arc.thickness,
            arc.normal,
        )
    }
}

impl HasNormal for Arc {
    fn normal(&self) -> &UnitVector3 {
        &self.normal
    }

    fn set_normal(&mut self, normal: Vector3) -> Result<()> {
        self.normal = validated_normal(&normal)?;
        Ok(())
    }
}

impl Transformable for Arc {
    fn transform_by(&mut self, transform: &AffineTransform3) -> Result<TransformReport> {
        match self.transformed(transform) {
            Ok(arc) => {
                *self = arc;
                Ok(TransformReport::default())
            }
            Err(e) => {
                debug!("Arc transform rejected: {}", e);
                Err(e)
            }
        }
    }
}

impl Tessellable for Arc {
    fn tessellate(&self, config: &TessellationConfig) -> Result<Vec<Point2>> {
        self.polygonal_vertices(config.arc_precision)
    }

    fn elevation(&self) -> f64 {
        self.ocs_center().z
    }
}
