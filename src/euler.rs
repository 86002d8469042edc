//! Euler's formula `e^(i theta) = cos theta + i sin theta` and the
//! logarithmic spiral `e^((a + i) theta)`.

use serde::Serialize;

use crate::error::{Result, SimError};

/// A point in the complex plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn modulus(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

pub fn euler(theta: f64) -> Point {
    Point {
        x: theta.cos(),
        y: theta.sin(),
    }
}

pub fn spiral_point(a: f64, theta: f64) -> Point {
    let r = (a * theta).exp();
    Point {
        x: r * theta.cos(),
        y: r * theta.sin(),
    }
}

/// Upper bound on the points of one spiral path.
pub const MAX_PATH_POINTS: usize = 1_000_000;

/// Points of the spiral for `theta = 0, step, 2 step, ...` up to `max_theta`.
pub fn spiral_path(a: f64, max_theta: f64, step: f64) -> Result<Vec<Point>> {
    if !step.is_finite() || step <= 0.0 {
        return Err(SimError::invalid("step", format!("{step} must be positive")));
    }
    if !max_theta.is_finite() {
        return Err(SimError::invalid("max_theta", format!("{max_theta} must be finite")));
    }
    let expected = (max_theta / step).floor().max(-1.0) + 1.0;
    if expected > MAX_PATH_POINTS as f64 {
        return Err(SimError::invalid(
            "max_theta",
            format!("{expected} points exceed maximum {MAX_PATH_POINTS}"),
        ));
    }

    let mut points = Vec::with_capacity(expected as usize);
    let mut theta = 0.0;
    while theta <= max_theta {
        points.push(spiral_point(a, theta));
        theta += step;
    }
    Ok(points)
}
