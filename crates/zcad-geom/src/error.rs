//! 几何内核错误定义

use thiserror::Error;

/// 几何操作的结果类型
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Degenerate vector: zero-length vector has no direction")]
    DegenerateVector,

    #[error("Singular matrix: determinant is zero")]
    SingularMatrix,

    #[error("No conic passes through the given points (duplicate or collinear input)")]
    NoConic,

    #[error("Fitted conic is not an ellipse (discriminant {discriminant})")]
    NotAnEllipse { discriminant: f64 },

    #[error("Lines are parallel, no intersection")]
    ParallelLines,
}

impl Error {
    /// 是否为数值退化类错误（相对于参数错误）
    pub fn is_degenerate(&self) -> bool {
        !matches!(self, Error::InvalidArgument(_))
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}
