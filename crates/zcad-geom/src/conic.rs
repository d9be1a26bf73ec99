//! 二次曲线重建
//!
//! 五点确定一条二次曲线。先用四点构造两条退化二次曲线（直线对），
//! 二者张成的曲线束 `C1 + λ·C2` 都经过这四个点，再由第五点求出 λ。
//! 若得到的曲线是椭圆，提取中心、半轴长和旋转角。
//!
//! 二次曲线方程：`A·x² + B·xy + C·y² + D·x + E·y + F = 0`

use crate::error::{Error, Result};
use crate::math::{Point2, Vector2, EPSILON};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// 判别式相对 `A² + B² + C²` 的容差，低于此值视为抛物线
const DISCRIMINANT_TOLERANCE: f64 = 1e-13;

/// 直线隐式方程 `a·x + b·y + c = 0` 的系数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl LineCoefficients {
    /// 在点处求值
    pub fn evaluate(&self, p: &Point2) -> f64 {
        self.a * p.x + self.b * p.y + self.c
    }
}

/// 一般二次曲线的系数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conic {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Conic {
    /// 在点处求值
    pub fn evaluate(&self, p: &Point2) -> f64 {
        self.a * p.x * p.x
            + self.b * p.x * p.y
            + self.c * p.y * p.y
            + self.d * p.x
            + self.e * p.y
            + self.f
    }

    /// 判别式 `B² - 4AC`：小于零为椭圆，等于零为抛物线，大于零为双曲线
    pub fn discriminant(&self) -> f64 {
        self.b * self.b - 4.0 * self.a * self.c
    }

    /// 系数绝对值的最大值
    pub fn magnitude(&self) -> f64 {
        [self.a, self.b, self.c, self.d, self.e, self.f]
            .iter()
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// 曲线束中的成员 `self + λ·other`
    pub fn combine(&self, other: &Conic, lambda: f64) -> Conic {
        Conic {
            a: self.a + lambda * other.a,
            b: self.b + lambda * other.b,
            c: self.c + lambda * other.c,
            d: self.d + lambda * other.d,
            e: self.e + lambda * other.e,
            f: self.f + lambda * other.f,
        }
    }

    fn scaled(&self, s: f64) -> Conic {
        Conic {
            a: self.a * s,
            b: self.b * s,
            c: self.c * s,
            d: self.d * s,
            e: self.e * s,
            f: self.f * s,
        }
    }
}

/// 椭圆拟合结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EllipseFit {
    pub center: Point2,
    /// 长半轴
    pub semi_major: f64,
    /// 短半轴
    pub semi_minor: f64,
    /// 长轴相对X轴的旋转角（度，[0, 180)）
    pub rotation: f64,
}

/// 过两点的直线系数
pub fn line_coefficients(p1: &Point2, p2: &Point2) -> LineCoefficients {
    LineCoefficients {
        a: p1.y - p2.y,
        b: p2.x - p1.x,
        c: p1.x * p2.y - p2.x * p1.y,
    }
}

/// 两条直线之积构成的退化二次曲线
pub fn product_of_lines(l1: &LineCoefficients, l2: &LineCoefficients) -> Conic {
    Conic {
        a: l1.a * l2.a,
        b: l1.a * l2.b + l2.a * l1.b,
        c: l1.b * l2.b,
        d: l1.a * l2.c + l2.a * l1.c,
        e: l1.b * l2.c + l2.b * l1.c,
        f: l1.c * l2.c,
    }
}

/// 求 λ 使 `conic1 + λ·conic2` 经过 `p5`
///
/// `conic2` 在 `p5` 处为零（舍入误差量级内）时返回 `NoConic`。
pub fn pencil_parameter(conic1: &Conic, conic2: &Conic, p5: &Point2) -> Result<f64> {
    let denominator = conic2.evaluate(p5);
    let scale = conic2.magnitude() * (1.0 + p5.coords.norm_squared());
    if !scale.is_normal() || denominator.abs() <= f64::EPSILON * scale {
        return Err(Error::NoConic);
    }
    Ok(-conic1.evaluate(p5) / denominator)
}

/// `p` 是否落在直线上，距离按点集尺寸 `extent` 归一
fn on_line(line: &LineCoefficients, p: &Point2, extent: f64) -> bool {
    let length = line.a.hypot(line.b);
    length == 0.0 || line.evaluate(p).abs() <= EPSILON * extent * length
}

/// 过五点的二次曲线
///
/// 第五点落在 p1p3 或 p2p4 上（含重复点）时返回 `NoConic`。
pub fn conic_through(points: &[Point2; 5]) -> Result<Conic> {
    let [p1, p2, p3, p4, p5] = points;
    let extent = points
        .iter()
        .map(|p| (p - p1).norm())
        .fold(0.0_f64, f64::max);

    let l13 = line_coefficients(p1, p3);
    let l24 = line_coefficients(p2, p4);
    if on_line(&l13, p5, extent) || on_line(&l24, p5, extent) {
        return Err(Error::NoConic);
    }

    let conic1 = product_of_lines(&line_coefficients(p1, p2), &line_coefficients(p3, p4));
    let conic2 = product_of_lines(&l13, &l24);
    let lambda = pencil_parameter(&conic1, &conic2, p5)?;

    let conic = conic1.combine(&conic2, lambda);
    let magnitude = conic.magnitude();
    if !magnitude.is_normal() {
        return Err(Error::NoConic);
    }
    Ok(conic.scaled(1.0 / magnitude))
}

/// 过五点拟合椭圆
///
/// 拟合前将点平移到质心并缩放到单位尺寸，判定容差因此与图形大小无关。
pub fn fit_ellipse(points: &[Point2; 5]) -> Result<EllipseFit> {
    let centroid = Point2::from(
        points
            .iter()
            .fold(Vector2::zeros(), |acc, p| acc + p.coords)
            / points.len() as f64,
    );
    let spread = points
        .iter()
        .map(|p| (p - centroid).norm())
        .fold(0.0_f64, f64::max);
    if !spread.is_normal() {
        return Err(Error::NoConic);
    }
    let unit = points.map(|p| Point2::from((p - centroid) / spread));

    let Conic { a, b, c, d, e, f } = conic_through(&unit)?;

    let q = b * b - 4.0 * a * c;
    if q >= -DISCRIMINANT_TOLERANCE * (a * a + b * b + c * c) {
        return Err(Error::NotAnEllipse { discriminant: q });
    }

    let center = Point2::new((2.0 * c * d - b * e) / q, (2.0 * a * e - b * d) / q);

    // (A+C)² - m² = -q，较小的一项由商求得以避免相消
    let m = ((a - c) * (a - c) + b * b).sqrt();
    let n = 2.0 * (a * e * e + c * d * d - b * d * e + q * f);
    let (plus, minus) = if a + c >= 0.0 {
        let plus = a + c + m;
        (plus, -q / plus)
    } else {
        let minus = a + c - m;
        (-q / minus, minus)
    };
    let axis1 = -(n * plus).max(0.0).sqrt() / q * spread;
    let axis2 = -(n * minus).max(0.0).sqrt() / q * spread;

    // axis1 对应的方向
    let mut rotation = if b.abs() < EPSILON {
        if a < c || (a - c).abs() < EPSILON {
            0.0
        } else {
            FRAC_PI_2
        }
    } else {
        ((c - a - m) / b).atan()
    };

    let (semi_major, semi_minor) = if axis1 < axis2 {
        rotation += FRAC_PI_2;
        (axis2, axis1)
    } else {
        (axis1, axis2)
    };

    Ok(EllipseFit {
        center: centroid + center.coords * spread,
        semi_major,
        semi_minor,
        rotation: rotation.to_degrees().rem_euclid(180.0),
    })
}
