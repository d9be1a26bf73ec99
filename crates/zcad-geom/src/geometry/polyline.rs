//! 多段线
//!
//! 顶点坐标位于对象坐标系，凸度 (bulge) 描述从该顶点到下一顶点的线段弯曲：
//! `bulge = tan(圆心角 / 4)`，0 为直线，正值逆时针，负值顺时针。

use super::{
    transformed_normal, validated_normal, HasNormal, Tessellable, TransformReport, Transformable,
};
use crate::error::{Error, Result};
use crate::math::{
    points_within, polar_angle, rotate2, Point2, Point3, UnitVector3, Vector2, Vector3, EPSILON,
};
use crate::ocs::arbitrary_axis;
use crate::tessellate::TessellationConfig;
use crate::transform::AffineTransform3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// 多段线顶点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylineVertex {
    /// 对象坐标系中的位置，Z 为相对多段线标高的偏移
    pub location: Point3,
    /// 凸度（bulge）- 用于弧线段，0表示直线
    pub bulge: f64,
    pub start_width: f64,
    pub end_width: f64,
}

impl PolylineVertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            location: Point3::new(x, y, 0.0),
            bulge: 0.0,
            start_width: 0.0,
            end_width: 0.0,
        }
    }

    pub fn with_bulge(x: f64, y: f64, bulge: f64) -> Self {
        Self {
            bulge,
            ..Self::new(x, y)
        }
    }

    pub fn with_widths(mut self, start_width: f64, end_width: f64) -> Self {
        self.start_width = start_width;
        self.end_width = end_width;
        self
    }

    fn xy(&self) -> Point2 {
        Point2::new(self.location.x, self.location.y)
    }
}

/// 多段线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    vertices: Vec<PolylineVertex>,
    is_closed: bool,
    elevation: f64,
    thickness: f64,
    normal: UnitVector3,
}

impl Polyline {
    pub fn new(vertices: Vec<PolylineVertex>, is_closed: bool) -> Self {
        Self {
            vertices,
            is_closed,
            elevation: 0.0,
            thickness: 0.0,
            normal: Vector3::z_axis(),
        }
    }

    /// 从点列表创建（所有顶点都是直线连接）
    pub fn from_points(points: impl IntoIterator<Item = Point2>, is_closed: bool) -> Self {
        Self::new(
            points
                .into_iter()
                .map(|p| PolylineVertex::new(p.x, p.y))
                .collect(),
            is_closed,
        )
    }

    /// 设置法向量
    pub fn with_normal(mut self, normal: Vector3) -> Result<Self> {
        self.set_normal(normal)?;
        Ok(self)
    }

    pub fn vertices(&self) -> &[PolylineVertex] {
        &self.vertices
    }

    pub fn push_vertex(&mut self, vertex: PolylineVertex) {
        self.vertices.push(vertex);
    }

    /// 修改指定顶点的凸度
    pub fn set_bulge(&mut self, index: usize, bulge: f64) -> Result<()> {
        let count = self.vertices.len();
        let vertex = self.vertices.get_mut(index).ok_or_else(|| {
            Error::invalid(format!("vertex index {index} out of range ({count} vertices)"))
        })?;
        vertex.bulge = bulge;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    pub fn set_closed(&mut self, is_closed: bool) {
        self.is_closed = is_closed;
    }

    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    pub fn set_elevation(&mut self, elevation: f64) {
        self.elevation = elevation;
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn set_thickness(&mut self, thickness: f64) {
        self.thickness = thickness;
    }

    /// 线段数量
    pub fn segment_count(&self) -> usize {
        match self.vertices.len() {
            0 | 1 => 0,
            n if self.is_closed => n,
            n => n - 1,
        }
    }

    /// 将多段线离散为点列（对象坐标系）
    ///
    /// - `bulge_precision`：每段弧内部插入的点数，0 表示忽略凸度
    /// - `weld_threshold`：小于此距离的两点视为同一点
    /// - `bulge_threshold`：弦长小于此值时忽略凸度
    pub fn polygonal_vertices(
        &self,
        bulge_precision: usize,
        weld_threshold: f64,
        bulge_threshold: f64,
    ) -> Result<Vec<Point2>> {
        for (name, value) in [
            ("weld threshold", weld_threshold),
            ("bulge threshold", bulge_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid(format!(
                    "{name} must be a non-negative finite number, got {value}"
                )));
            }
        }

        let count = self.vertices.len();
        let mut points = Vec::with_capacity(count * (bulge_precision + 1));
        if count == 0 {
            return Ok(points);
        }

        for i in 0..self.segment_count() {
            let vertex = &self.vertices[i];
            let p1 = vertex.xy();
            let p2 = self.vertices[(i + 1) % count].xy();

            // 零长度线段
            if points_within(&p1, &p2, weld_threshold) {
                continue;
            }

            points.push(p1);
            if vertex.bulge.abs() < EPSILON || bulge_precision == 0 {
                continue;
            }

            let chord = p2 - p1;
            let c = chord.norm();
            if c < bulge_threshold {
                continue;
            }

            let bulge = vertex.bulge;
            let sagitta = 0.5 * c * bulge.abs();
            let radius = ((0.5 * c).powi(2) + sagitta * sagitta) / (2.0 * sagitta);
            let theta = 4.0 * bulge.abs().atan();
            let gamma = 0.5 * (PI - theta);
            let phi = if bulge > 0.0 {
                polar_angle(&chord) + gamma
            } else {
                polar_angle(&chord) - gamma
            };
            let center = p1 + Vector2::new(phi.cos(), phi.sin()) * radius;
            let a1 = p1 - center;
            let step = 4.0 * bulge.atan() / (bulge_precision + 1) as f64;

            for j in 1..=bulge_precision {
                let curve_point = center + rotate2(&a1, step * j as f64);
                let welds_previous = points
                    .last()
                    .is_some_and(|prev| points_within(&curve_point, prev, weld_threshold));
                if !welds_previous && !points_within(&curve_point, &p2, weld_threshold) {
                    points.push(curve_point);
                }
            }
        }

        // 开放多段线的末顶点不是任何线段的起点；
        // 闭合多段线的各边全部焊接时（如单顶点）保留首顶点
        if !self.is_closed {
            points.push(self.vertices[count - 1].xy());
        } else if points.is_empty() {
            points.push(self.vertices[0].xy());
        }

        Ok(points)
    }

    /// 计算变换后的多段线，不修改自身
    fn transformed(&self, transform: &AffineTransform3) -> Self {
        let (normal, normal_scale) = transformed_normal(transform, &self.normal);
        let old_to_world = arbitrary_axis(&self.normal);
        let world_to_new = arbitrary_axis(&normal).transpose();
        let carry = |p: &Point3| {
            let world = Point3::from(old_to_world * Vector3::new(p.x, p.y, self.elevation + p.z));
            Point3::from(world_to_new * transform.transform_point(&world).coords)
        };

        let elevation = match self.vertices.first() {
            Some(v) => carry(&v.location).z,
            None => carry(&Point3::origin()).z,
        };
        let mirrored = transform.is_mirroring();

        let vertices = self
            .vertices
            .iter()
            .map(|v| {
                let p = carry(&v.location);
                PolylineVertex {
                    location: Point3::new(p.x, p.y, p.z - elevation),
                    bulge: if mirrored { -v.bulge } else { v.bulge },
                    ..v.clone()
                }
            })
            .collect();

        Self {
            vertices,
            is_closed: self.is_closed,
            elevation,
            thickness: self.thickness * normal_scale,
            normal,
        }
    }
}

impl HasNormal for Polyline {
    fn normal(&self) -> &UnitVector3 {
        &self.normal
    }

    fn set_normal(&mut self, normal: Vector3) -> Result<()> {
        self.normal = validated_normal(&normal)?;
        Ok(())
    }
}

impl Transformable for Polyline {
    fn transform_by(&mut self, transform: &AffineTransform3) -> Result<TransformReport> {
        *self = self.transformed(transform);
        Ok(TransformReport::default())
    }
}

impl Tessellable for Polyline {
    fn tessellate(&self, config: &TessellationConfig) -> Result<Vec<Point2>> {
        self.polygonal_vertices(
            config.bulge_precision,
            config.weld_threshold,
            config.bulge_threshold,
        )
    }

    fn elevation(&self) -> f64 {
        self.elevation
    }
}
