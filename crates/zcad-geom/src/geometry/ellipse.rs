//! 椭圆与椭圆弧
//!
//! 椭圆的仿射像仍是椭圆，但角度参数化不随仿射变换保持，因此不能直接变换参数。
//! 变换时取外切矩形四边的中点（它们都在椭圆上，且仿射变换保持中点），
//! 再用共轭直径作图求出第五个点，通过五点拟合重建椭圆参数。

use super::{
    transformed_normal, validated_length, validated_normal, HasNormal, Polyline, PolylineVertex,
    Tessellable, TransformReport, Transformable,
};
use crate::conic::fit_ellipse;
use crate::error::{Error, Result};
use crate::math::{
    approx_eq_tol, line_intersection, normalize_angle_degrees, polar_angle, rotate2, Point2,
    Point3, UnitVector3, Vector2, Vector3, EPSILON,
};
use crate::ocs::{arbitrary_axis, transform_point, CoordinateSystem};
use crate::tessellate::TessellationConfig;
use crate::transform::AffineTransform3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::{debug, warn};

/// 起止角相等的判定容差（度）
const ANGLE_TOLERANCE: f64 = 1e-9;

/// 变换后半轴长的下限
const MIN_SEMI_AXIS: f64 = EPSILON;

/// 椭圆
///
/// - 中心使用世界坐标
/// - 长轴/短轴为全长（直径），不强制 长轴 ≥ 短轴，变换后会重新排序
/// - 旋转角为长轴在对象坐标系中相对X轴的角度（度）
/// - 起止角是相对中心、从长轴方向量起的极角（度）；二者相等表示完整椭圆
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    center: Point3,
    major_axis: f64,
    minor_axis: f64,
    rotation: f64,
    start_angle: f64,
    end_angle: f64,
    thickness: f64,
    normal: UnitVector3,
}

impl Ellipse {
    /// 创建完整椭圆，法向量默认为 +Z
    pub fn new(center: Point3, major_axis: f64, minor_axis: f64) -> Result<Self> {
        Ok(Self {
            center,
            major_axis: validated_length(major_axis, "ellipse major axis")?,
            minor_axis: validated_length(minor_axis, "ellipse minor axis")?,
            rotation: 0.0,
            start_angle: 0.0,
            end_angle: 0.0,
            thickness: 0.0,
            normal: Vector3::z_axis(),
        })
    }

    pub(crate) fn from_arc_parts(
        center: Point3,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        thickness: f64,
        normal: UnitVector3,
    ) -> Self {
        Self {
            center,
            major_axis: 2.0 * radius,
            minor_axis: 2.0 * radius,
            rotation: 0.0,
            start_angle,
            end_angle,
            thickness,
            normal,
        }
    }

    /// 设置旋转角（度）
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.set_rotation(rotation);
        self
    }

    /// 设置起止角（度），使之成为椭圆弧
    pub fn with_angles(mut self, start_angle: f64, end_angle: f64) -> Self {
        self.set_start_angle(start_angle);
        self.set_end_angle(end_angle);
        self
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

    pub fn major_axis(&self) -> f64 {
        self.major_axis
    }

    pub fn set_major_axis(&mut self, value: f64) -> Result<()> {
        self.major_axis = validated_length(value, "ellipse major axis")?;
        Ok(())
    }

    pub fn minor_axis(&self) -> f64 {
        self.minor_axis
    }

    pub fn set_minor_axis(&mut self, value: f64) -> Result<()> {
        self.minor_axis = validated_length(value, "ellipse minor axis")?;
        Ok(())
    }

    /// 旋转角（度，[0, 360)）
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = normalize_angle_degrees(rotation);
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

    /// 是否为完整椭圆
    pub fn is_full(&self) -> bool {
        let diff = (self.end_angle - self.start_angle).rem_euclid(360.0);
        diff < ANGLE_TOLERANCE || diff > 360.0 - ANGLE_TOLERANCE
    }

    /// 中心在对象坐标系中的位置
    pub fn ocs_center(&self) -> Point3 {
        transform_point(
            &self.center,
            &self.normal,
            CoordinateSystem::World,
            CoordinateSystem::Object,
        )
    }

    /// 未旋转椭圆上极角为 `angle`（度）的点，相对中心
    pub fn polar_point(&self, angle: f64) -> Vector2 {
        let a = 0.5 * self.major_axis;
        let b = 0.5 * self.minor_axis;
        let (sin, cos) = angle.to_radians().sin_cos();
        let radius = a * b / ((b * cos).powi(2) + (a * sin).powi(2)).sqrt();
        Vector2::new(radius * cos, radius * sin)
    }

    /// 极角（度）对应的椭圆参数角（弧度）
    fn parametric_angle(&self, angle: f64) -> f64 {
        let p = self.polar_point(angle);
        (p.y / (0.5 * self.minor_axis)).atan2(p.x / (0.5 * self.major_axis))
    }

    /// 将椭圆离散为点列（对象坐标系）
    ///
    /// 完整椭圆在 [0, 2π) 上均匀取 `precision` 个点；
    /// 椭圆弧在参数角上取 `precision` 个点，首尾恰为起止点。
    pub fn polygonal_vertices(&self, precision: usize) -> Result<Vec<Point2>> {
        if precision < 2 {
            return Err(Error::invalid(format!(
                "ellipse precision must be at least 2, got {precision}"
            )));
        }

        let c = self.ocs_center();
        let rotation = self.rotation.to_radians();
        let a = 0.5 * self.major_axis;
        let b = 0.5 * self.minor_axis;
        let sample = |alpha: f64| {
            let local = rotate2(&Vector2::new(a * alpha.cos(), b * alpha.sin()), rotation);
            Point2::new(c.x + local.x, c.y + local.y)
        };

        if self.is_full() {
            let delta = TAU / precision as f64;
            return Ok((0..precision).map(|i| sample(delta * i as f64)).collect());
        }

        let start = self.parametric_angle(self.start_angle);
        let mut end = self.parametric_angle(self.end_angle);
        if end < start {
            end += TAU;
        }
        let delta = (end - start) / (precision - 1) as f64;
        Ok((0..precision).map(|i| sample(start + delta * i as f64)).collect())
    }

    /// 转换为等价的折线（完整椭圆为闭合折线）
    pub fn to_polyline(&self, precision: usize) -> Result<Polyline> {
        let vertices = self
            .polygonal_vertices(precision)?
            .into_iter()
            .map(|p| PolylineVertex::new(p.x, p.y))
            .collect();

        let mut polyline = Polyline::new(vertices, self.is_full());
        polyline.set_elevation(self.ocs_center().z);
        polyline.set_thickness(self.thickness);
        polyline.set_normal(self.normal.into_inner())?;
        Ok(polyline)
    }

    /// 计算变换后的椭圆，不修改自身
    fn transformed(&self, transform: &AffineTransform3) -> Result<(Self, TransformReport)> {
        let a = 0.5 * self.major_axis;
        let b = 0.5 * self.minor_axis;
        let rotation = self.rotation.to_radians();

        let (normal, normal_scale) = transformed_normal(transform, &self.normal);
        let old_to_world = arbitrary_axis(&self.normal);
        let world_to_new = arbitrary_axis(&normal).transpose();
        // 旧 OCS 中相对中心的向量 -> 新 OCS 平面坐标
        let carry = |v: Vector2| {
            let w = world_to_new
                * transform.transform_vector(&(old_to_world * Vector3::new(v.x, v.y, 0.0)));
            Point2::new(w.x, w.y)
        };

        // 外切矩形角点
        let corners = [(a, b), (-a, b), (-a, -b), (a, -b)]
            .map(|(x, y)| carry(rotate2(&Vector2::new(x, y), rotation)));
        let midpoint = |p: &Point2, q: &Point2| Point2::from((p.coords + q.coords) * 0.5);
        let m = midpoint(&corners[3], &corners[0]);
        let n = midpoint(&corners[1], &corners[2]);
        let h = midpoint(&corners[0], &corners[1]);
        let k = midpoint(&corners[2], &corners[3]);

        // MN 与 HK 是一对共轭直径，交点为中心
        let o = line_intersection(&m, &(n - m), &h, &(k - h))?;
        let u = m - o;
        let aux = o + (h - o) * 0.5;
        let tangent = h + u * 0.5;
        let z = line_intersection(&n, &(aux - n), &m, &(tangent - m))?;

        let fit = fit_ellipse(&[m, n, h, k, z])?;

        let mut report = TransformReport::default();
        let mut clamp = |semi: f64| {
            if semi < MIN_SEMI_AXIS {
                report.axis_clamped = true;
                MIN_SEMI_AXIS
            } else {
                semi
            }
        };
        let semi_major = clamp(fit.semi_major);
        let semi_minor = clamp(fit.semi_minor);
        if report.axis_clamped {
            warn!(
                "Ellipse axis collapsed under transform ({}, {}), clamped to {}",
                fit.semi_major, fit.semi_minor, MIN_SEMI_AXIS
            );
        }

        // 拟合角只确定到 180°，取与原长轴像方向更接近的一侧；近似圆时直接沿用该方向
        let reference = polar_angle(&u).to_degrees();
        let new_rotation = if approx_eq_tol(semi_major, semi_minor, 1e-9 * semi_major) {
            reference
        } else {
            let diff = (fit.rotation - reference).rem_euclid(360.0);
            if diff > 90.0 && diff < 270.0 {
                fit.rotation + 180.0
            } else {
                fit.rotation
            }
        };
        let new_rotation = normalize_angle_degrees(new_rotation);

        let offset = arbitrary_axis(&normal) * Vector3::new(fit.center.x, fit.center.y, 0.0);
        let center = transform.transform_point(&self.center) + offset;

        let (mut start_angle, mut end_angle) = (self.start_angle, self.end_angle);
        if !self.is_full() {
            let measure = |angle: f64| {
                let p = carry(rotate2(&self.polar_point(angle), rotation)) - fit.center;
                normalize_angle_degrees(polar_angle(&p).to_degrees() - new_rotation)
            };
            start_angle = measure(self.start_angle);
            end_angle = measure(self.end_angle);
            if transform.is_mirroring() {
                std::mem::swap(&mut start_angle, &mut end_angle);
            }
        }

        let ellipse = Self {
            center,
            major_axis: 2.0 * semi_major,
            minor_axis: 2.0 * semi_minor,
            rotation: new_rotation,
            start_angle,
            end_angle,
            thickness: self.thickness * normal_scale,
            normal,
        };
        Ok((ellipse, report))
    }
}

impl HasNormal for Ellipse {
    fn normal(&self) -> &UnitVector3 {
        &self.normal
    }

    fn set_normal(&mut self, normal: Vector3) -> Result<()> {
        self.normal = validated_normal(&normal)?;
        Ok(())
    }
}

impl Transformable for Ellipse {
    /// 变换椭圆；构造或拟合失败时保持原状并返回错误
    fn transform_by(&mut self, transform: &AffineTransform3) -> Result<TransformReport> {
        match self.transformed(transform) {
            Ok((ellipse, report)) => {
                *self = ellipse;
                Ok(report)
            }
            Err(e) => {
                debug!("Ellipse transform rejected: {}", e);
                Err(e)
            }
        }
    }
}

impl Tessellable for Ellipse {
    fn tessellate(&self, config: &TessellationConfig) -> Result<Vec<Point2>> {
        self.polygonal_vertices(config.ellipse_precision)
    }

    fn elevation(&self) -> f64 {
        self.ocs_center().z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, points_approx_eq, Matrix3};
    use std::f64::consts::FRAC_PI_2;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "{} != {} (tolerance {})",
            actual,
            expected,
            tol
        );
    }

    /// 检查世界坐标点是否位于椭圆上
    fn lies_on(ellipse: &Ellipse, p: &Point3) -> bool {
        let local = transform_point(
            p,
            ellipse.normal(),
            CoordinateSystem::World,
            CoordinateSystem::Object,
        );
        let c = ellipse.ocs_center();
        let v = rotate2(
            &Vector2::new(local.x - c.x, local.y - c.y),
            -ellipse.rotation().to_radians(),
        );
        let a = 0.5 * ellipse.major_axis();
        let b = 0.5 * ellipse.minor_axis();
        ((v.x / a).powi(2) + (v.y / b).powi(2) - 1.0).abs() < 1e-6 && (local.z - c.z).abs() < 1e-6
    }

    #[test]
    fn test_invalid_axes() {
        assert!(Ellipse::new(Point3::origin(), 0.0, 1.0).is_err());
        assert!(Ellipse::new(Point3::origin(), 2.0, -1.0).is_err());

        let mut e = Ellipse::new(Point3::origin(), 4.0, 2.0).unwrap();
        assert!(e.set_minor_axis(0.0).is_err());
        assert!(approx_eq(e.minor_axis(), 2.0));
    }

    #[test]
    fn test_full_detection() {
        let e = Ellipse::new(Point3::origin(), 4.0, 2.0).unwrap();
        assert!(e.is_full());
        assert!(e.clone().with_angles(0.0, 360.0).is_full());
        assert!(!e.clone().with_angles(0.0, 90.0).is_full());
    }

    #[test]
    fn test_polar_point() {
        let e = Ellipse::new(Point3::origin(), 4.0, 2.0).unwrap();
        let p = e.polar_point(0.0);
        assert!(approx_eq(p.x, 2.0) && approx_eq(p.y, 0.0));

        let p = e.polar_point(90.0);
        assert!(approx_eq(p.x, 0.0) && approx_eq(p.y, 1.0));

        // 45° 方向上 x = y，且满足椭圆方程
        let p = e.polar_point(45.0);
        assert!(approx_eq(p.x, p.y));
        assert!(approx_eq((p.x / 2.0).powi(2) + p.y.powi(2), 1.0));
    }

    #[test]
    fn test_tessellate_full() {
        let e = Ellipse::new(Point3::origin(), 4.0, 2.0).unwrap();
        let points = e.polygonal_vertices(4).unwrap();

        assert_eq!(points.len(), 4);
        assert!(points_approx_eq(&points[0], &Point2::new(2.0, 0.0)));
        assert!(points_approx_eq(&points[1], &Point2::new(0.0, 1.0)));
        assert!(points_approx_eq(&points[2], &Point2::new(-2.0, 0.0)));
        assert!(points_approx_eq(&points[3], &Point2::new(0.0, -1.0)));
    }

    #[test]
    fn test_tessellate_precision_below_two_fails() {
        let e = Ellipse::new(Point3::origin(), 4.0, 2.0).unwrap();
        assert!(matches!(e.polygonal_vertices(1), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_tessellate_partial_hits_boundaries() {
        let e = Ellipse::new(Point3::new(1.0, -1.0, 0.0), 6.0, 2.0)
            .unwrap()
            .with_rotation(30.0)
            .with_angles(20.0, 300.0);
        let points = e.polygonal_vertices(16).unwrap();
        assert_eq!(points.len(), 16);

        let expected = |angle: f64| {
            let v = rotate2(&e.polar_point(angle), 30f64.to_radians());
            Point2::new(1.0 + v.x, -1.0 + v.y)
        };
        assert!((points[0] - expected(20.0)).norm() < 1e-9);
        assert!((points[15] - expected(300.0)).norm() < 1e-9);
    }

    #[test]
    fn test_tessellate_partial_wraps() {
        // 起始角大于终止角时跨过长轴方向
        let e = Ellipse::new(Point3::origin(), 4.0, 2.0)
            .unwrap()
            .with_angles(270.0, 90.0);
        let points = e.polygonal_vertices(3).unwrap();

        assert!(points_approx_eq(&points[0], &Point2::new(0.0, -1.0)));
        assert!(points_approx_eq(&points[1], &Point2::new(2.0, 0.0)));
        assert!(points_approx_eq(&points[2], &Point2::new(0.0, 1.0)));
    }

    #[test]
    fn test_identity_transform_is_noop() {
        let mut e = Ellipse::new(Point3::new(3.0, -2.0, 1.0), 8.0, 3.0)
            .unwrap()
            .with_rotation(30.0)
            .with_angles(10.0, 200.0);
        let before = e.clone();
        let report = e.transform_by(&AffineTransform3::identity()).unwrap();

        assert!(!report.axis_clamped);
        assert!((e.center() - before.center()).norm() < 1e-9);
        assert_close(e.major_axis(), 8.0, 1e-9);
        assert_close(e.minor_axis(), 3.0, 1e-9);
        assert_close(e.rotation(), 30.0, 1e-6);
        assert_close(e.start_angle(), 10.0, 1e-6);
        assert_close(e.end_angle(), 200.0, 1e-6);
        assert_eq!(e.normal(), before.normal());
    }

    #[test]
    fn test_identity_keeps_rotation_past_180() {
        let mut e = Ellipse::new(Point3::origin(), 5.0, 2.0)
            .unwrap()
            .with_rotation(250.0);
        e.transform_by(&AffineTransform3::identity()).unwrap();
        assert_close(e.rotation(), 250.0, 1e-6);
    }

    #[test]
    fn test_uniform_scale() {
        let mut e = Ellipse::new(Point3::new(1.0, 2.0, 0.0), 4.0, 2.0)
            .unwrap()
            .with_rotation(30.0);
        e.transform_by(&AffineTransform3::scale(2.0, 2.0, 1.0)).unwrap();

        assert!((e.center() - Point3::new(2.0, 4.0, 0.0)).norm() < 1e-9);
        assert_close(e.major_axis(), 8.0, 1e-9);
        assert_close(e.minor_axis(), 4.0, 1e-9);
        assert_close(e.rotation(), 30.0, 1e-6);
        assert!(approx_eq(e.normal().z, 1.0));
    }

    fn angle_gap(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    /// 恒等变换与均匀缩放下的轴长、中心和旋转角
    fn assert_keeps_shape(major: f64, minor: f64, rotation: f64) {
        let center = Point3::new(0.5 * major, -0.25 * major, 0.0);
        let original = Ellipse::new(center, major, minor)
            .unwrap()
            .with_rotation(rotation);
        let tol = 1e-9 * major;

        let mut e = original.clone();
        let report = e.transform_by(&AffineTransform3::identity()).unwrap();
        assert!(!report.axis_clamped);
        assert!((e.center() - center).norm() <= tol);
        assert_close(e.major_axis(), major, tol);
        assert_close(e.minor_axis(), minor, 1e-6 * minor);
        assert!(angle_gap(e.rotation(), rotation) < 1e-6);

        let mut e = original;
        e.transform_by(&AffineTransform3::uniform_scale(2.0)).unwrap();
        assert!((e.center() - center * 2.0).norm() <= 2.0 * tol);
        assert_close(e.major_axis(), 2.0 * major, 2.0 * tol);
        assert_close(e.minor_axis(), 2.0 * minor, 2e-6 * minor);
        assert!(angle_gap(e.rotation(), rotation) < 1e-6);
    }

    #[test]
    fn test_large_circle_keeps_shape() {
        assert_keeps_shape(4000.0, 4000.0, 0.0);
    }

    #[test]
    fn test_large_ellipse_keeps_shape() {
        assert_keeps_shape(1.0e4, 5.0e3, 0.0);
        assert_keeps_shape(1.0e4, 5.0e3, 30.0);
    }

    #[test]
    fn test_thin_ellipse_keeps_shape() {
        assert_keeps_shape(2.0, 2e-6, 0.0);
    }

    #[test]
    fn test_tiny_minor_axis_is_clamped() {
        let mut e = Ellipse::new(Point3::origin(), 2e-9, 2e-11).unwrap();
        let report = e.transform_by(&AffineTransform3::identity()).unwrap();

        assert!(report.axis_clamped);
        assert_close(e.major_axis(), 2e-9, 1e-18);
        assert_close(e.minor_axis(), 2.0 * MIN_SEMI_AXIS, 1e-20);
    }

    #[test]
    fn test_transform_restores_axis_order() {
        let original = Ellipse::new(Point3::origin(), 2.0, 4.0)
            .unwrap()
            .with_angles(10.0, 80.0);
        let mut e = original.clone();
        e.transform_by(&AffineTransform3::identity()).unwrap();

        assert_close(e.major_axis(), 4.0, 1e-9);
        assert_close(e.minor_axis(), 2.0, 1e-9);
        assert_close(e.rotation(), 90.0, 1e-6);
        assert_close(e.start_angle(), 280.0, 1e-6);
        assert_close(e.end_angle(), 350.0, 1e-6);

        let before = original.polygonal_vertices(2).unwrap();
        let after = e.polygonal_vertices(2).unwrap();
        assert!((after[0] - before[0]).norm() < 1e-9);
        assert!((after[1] - before[1]).norm() < 1e-9);
    }

    #[test]
    fn test_rotation_transform() {
        let mut e = Ellipse::new(Point3::new(1.0, 0.0, 0.0), 4.0, 2.0).unwrap();
        e.transform_by(&AffineTransform3::rotation_z(FRAC_PI_2)).unwrap();

        assert!((e.center() - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-9);
        assert_close(e.rotation(), 90.0, 1e-6);
        assert_close(e.major_axis(), 4.0, 1e-9);
    }

    #[test]
    fn test_non_uniform_scale_keeps_points_on_image() {
        let original = Ellipse::new(Point3::new(1.0, 1.0, 0.0), 4.0, 2.0)
            .unwrap()
            .with_rotation(30.0);
        let t = AffineTransform3::scale(3.0, 1.0, 1.0)
            .then(&AffineTransform3::translation(0.5, -2.0, 0.0));
        let mut e = original.clone();
        e.transform_by(&t).unwrap();

        assert!(e.major_axis() >= e.minor_axis());
        let samples = original
            .tessellate_world(&TessellationConfig::default())
            .unwrap();
        for p in samples {
            assert!(lies_on(&e, &t.transform_point(&p)));
        }
    }

    #[test]
    fn test_tilted_normal_transform() {
        let original = Ellipse::new(Point3::new(0.0, 2.0, 1.0), 6.0, 2.0)
            .unwrap()
            .with_normal(Vector3::new(1.0, 1.0, 1.0))
            .unwrap()
            .with_rotation(45.0);
        let t = AffineTransform3::rotation(&Vector3::new(0.0, 1.0, 0.0), 0.7)
            .unwrap()
            .then(&AffineTransform3::uniform_scale(1.5));
        let mut e = original.clone();
        e.transform_by(&t).unwrap();

        assert_close(e.major_axis(), 9.0, 1e-7);
        assert_close(e.minor_axis(), 3.0, 1e-7);
        let samples = original
            .tessellate_world(&TessellationConfig::default())
            .unwrap();
        for p in samples {
            assert!(lies_on(&e, &t.transform_point(&p)));
        }
    }

    #[test]
    fn test_partial_ellipse_boundaries_follow_transform() {
        let original = Ellipse::new(Point3::origin(), 4.0, 2.0)
            .unwrap()
            .with_rotation(20.0)
            .with_angles(15.0, 160.0);
        let t = AffineTransform3::scale(1.0, 2.5, 1.0);
        let mut e = original.clone();
        e.transform_by(&t).unwrap();

        let before = original.polygonal_vertices(2).unwrap();
        let after = e.polygonal_vertices(2).unwrap();
        let map = |p: &Point2| {
            let q = t.transform_point(&Point3::new(p.x, p.y, 0.0));
            Point2::new(q.x, q.y)
        };
        assert!((after[0] - map(&before[0])).norm() < 1e-6);
        assert!((after[1] - map(&before[1])).norm() < 1e-6);
    }

    #[test]
    fn test_mirror_keeps_winding() {
        let mut e = Ellipse::new(Point3::origin(), 4.0, 2.0)
            .unwrap()
            .with_angles(0.0, 90.0);
        e.transform_by(&AffineTransform3::mirror(&Vector3::x()).unwrap())
            .unwrap();

        // 第一象限的弧镜像到第二象限，逆时针方向从 (0, 1) 到 (-2, 0)
        let points = e.polygonal_vertices(3).unwrap();
        assert!((points[0] - Point2::new(0.0, 1.0)).norm() < 1e-6);
        assert!((points[2] - Point2::new(-2.0, 0.0)).norm() < 1e-6);
        assert!(points[1].x < 0.0 && points[1].y > 0.0);
    }

    #[test]
    fn test_degenerate_transform_leaves_entity_unchanged() {
        let mut e = Ellipse::new(Point3::new(1.0, 1.0, 0.0), 4.0, 2.0)
            .unwrap()
            .with_rotation(10.0)
            .with_angles(30.0, 100.0);
        let before = e.clone();

        let collapse = AffineTransform3::new(
            Matrix3::new(
                1.0, 0.0, 0.0,
                0.0, 0.0, 0.0,
                0.0, 0.0, 1.0,
            ),
            Vector3::new(5.0, 5.0, 5.0),
        );
        let err = e.transform_by(&collapse).unwrap_err();

        assert!(err.is_degenerate());
        assert_eq!(e, before);
    }
}
