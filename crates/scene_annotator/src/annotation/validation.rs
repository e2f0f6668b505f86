//! Bounding box validation
//!
//! A box is kept only when it has area and every edge lies strictly more
//! than `epsilon` pixels inside the render frame. Boxes touching a border
//! usually belong to objects cut off by the frame, whose visible part says
//! little about the object's true extent.

use std::fmt;

use super::bbox::BoundingBox2D;

/// Default minimum distance in pixels between a box edge and the frame border
pub const DEFAULT_EDGE_EPSILON: f64 = 1.0;

/// Why a box was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Zero width or zero height
    Degenerate,
    /// Left edge too close to or beyond the left border
    LeftEdge,
    /// Right edge too close to or beyond the right border
    RightEdge,
    /// Top edge too close to or beyond the top border
    TopEdge,
    /// Bottom edge too close to or beyond the bottom border
    BottomEdge,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Degenerate => "degenerate box",
            Self::LeftEdge => "touches left border",
            Self::RightEdge => "touches right border",
            Self::TopEdge => "touches top border",
            Self::BottomEdge => "touches bottom border",
        };
        f.write_str(reason)
    }
}

/// Signed inward distances from each box edge to the matching frame border
///
/// Negative values mean the edge lies outside the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeDistances {
    /// Left edge to left border
    pub left: f64,
    /// Right edge to right border
    pub right: f64,
    /// Top edge to top border
    pub top: f64,
    /// Bottom edge to bottom border
    pub bottom: f64,
}

impl EdgeDistances {
    /// Measure a box against a frame of the given size
    pub fn measure(bbox: &BoundingBox2D, render_width: f64, render_height: f64) -> Self {
        Self {
            left: bbox.x,
            right: render_width - bbox.right(),
            top: bbox.y,
            bottom: render_height - bbox.bottom(),
        }
    }
}

/// Rejects degenerate and border-touching boxes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBoxValidator {
    epsilon: f64,
}

impl Default for BoundingBoxValidator {
    fn default() -> Self {
        Self::new(DEFAULT_EDGE_EPSILON)
    }
}

impl BoundingBoxValidator {
    /// Create a validator with the given border margin in pixels
    pub const fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Border margin in pixels
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Check a box, reporting the first failed condition
    pub fn check(&self, bbox: &BoundingBox2D, render_width: f64, render_height: f64) -> Result<(), Rejection> {
        if bbox.is_degenerate() {
            return Err(Rejection::Degenerate);
        }

        let distances = EdgeDistances::measure(bbox, render_width, render_height);
        let checks = [
            (distances.left, Rejection::LeftEdge),
            (distances.right, Rejection::RightEdge),
            (distances.top, Rejection::TopEdge),
            (distances.bottom, Rejection::BottomEdge),
        ];
        match checks.into_iter().find(|(distance, _)| *distance <= self.epsilon) {
            Some((_, rejection)) => Err(rejection),
            None => Ok(()),
        }
    }

    /// True when the box passes [`check`](Self::check)
    pub fn is_valid(&self, bbox: &BoundingBox2D, render_width: f64, render_height: f64) -> bool {
        self.check(bbox, render_width, render_height).is_ok()
    }
}
