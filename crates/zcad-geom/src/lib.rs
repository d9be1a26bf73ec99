//! ZCAD 几何内核
//!
//! 为 CAD 交换格式提供曲线图元的坐标系变换、保形仿射变换和离散功能。
//!
//! # 架构设计
//!
//! 自底向上：
//! - `math`: 基于 nalgebra 的向量/矩阵类型与可失败的基础运算
//! - `ocs`: 任意轴算法，世界坐标系与对象坐标系之间的转换
//! - `conic`: 五点拟合二次曲线并提取椭圆参数
//! - `geometry`: 圆弧、椭圆、带凸度多段线，支持变换与离散
//! - `tessellate`: 离散精度配置与批量离散
//!
//! 所有操作同步执行，内核不持有任何全局状态。
//!
//! # 示例
//!
//! ```rust
//! use zcad_geom::prelude::*;
//!
//! // 创建一个椭圆并均匀放大
//! let mut ellipse = Ellipse::new(Point3::origin(), 4.0, 2.0).unwrap();
//! ellipse.transform_by(&AffineTransform3::uniform_scale(2.0)).unwrap();
//!
//! // 离散为点列
//! let points = ellipse.polygonal_vertices(36).unwrap();
//! println!("Points: {}", points.len());
//! ```

pub mod conic;
pub mod error;
pub mod geometry;
pub mod math;
pub mod ocs;
pub mod tessellate;
pub mod transform;

pub use error::{Error, Result};

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{
        Arc, Ellipse, Geometry, HasNormal, Polyline, PolylineVertex, Tessellable,
        TransformReport, Transformable,
    };
    pub use crate::math::{Matrix3, Point2, Point3, UnitVector3, Vector2, Vector3};
    pub use crate::ocs::CoordinateSystem;
    pub use crate::tessellate::TessellationConfig;
    pub use crate::transform::AffineTransform3;
}
