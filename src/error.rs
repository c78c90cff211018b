//! Construction-time contract violations
//!
//! Runtime numeric edge cases (zero directions, wrap flags) are handled by
//! policy inside the simulation and never surface here.

use thiserror::Error;

/// Invalid geometry handed to a constructor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("polygon needs at least 3 vertices, got {count}")]
    TooFewVertices { count: usize },
    #[error("asteroid needs at least 3 vertices, got {count}")]
    TooFewAsteroidVertices { count: usize },
}
