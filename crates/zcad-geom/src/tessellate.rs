//! 曲线离散配置与批量离散
//!
//! 图元之间互不共享状态，批量离散时按图元并行（rayon），结果顺序与输入一致。

use crate::error::{Error, Result};
use crate::geometry::{Geometry, Tessellable};
use crate::math::Point2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// 离散精度配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationConfig {
    /// 圆弧分段数（≥ 2）
    pub arc_precision: usize,
    /// 椭圆采样点数（≥ 2）
    pub ellipse_precision: usize,
    /// 多段线每段弧内部插入的点数，0 表示忽略凸度
    pub bulge_precision: usize,
    /// 焊接距离：小于此距离的两点视为同一点
    pub weld_threshold: f64,
    /// 弦长小于此值时忽略凸度
    pub bulge_threshold: f64,
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            arc_precision: 72,
            ellipse_precision: 72,
            bulge_precision: 8,
            weld_threshold: 1e-8,
            bulge_threshold: 1e-8,
        }
    }
}

impl TessellationConfig {
    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.arc_precision < 2 {
            return Err(Error::invalid(format!(
                "arc precision must be at least 2, got {}",
                self.arc_precision
            )));
        }
        if self.ellipse_precision < 2 {
            return Err(Error::invalid(format!(
                "ellipse precision must be at least 2, got {}",
                self.ellipse_precision
            )));
        }
        for (name, value) in [
            ("weld threshold", self.weld_threshold),
            ("bulge threshold", self.bulge_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid(format!(
                    "{name} must be a non-negative finite number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// 并行离散一组图元，每个图元对应一个结果
///
/// 配置无效时直接返回错误，不离散任何图元。
pub fn tessellate_all(
    geometries: &[Geometry],
    config: &TessellationConfig,
) -> Result<Vec<Result<Vec<Point2>>>> {
    config.validate()?;
    Ok(geometries
        .par_iter()
        .map(|g| g.tessellate(config))
        .collect())
}
