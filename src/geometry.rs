//! Coordinate triples handed to the presentation layer, and their validation.

use serde::Serialize;
use thiserror::Error;

/// A point in scene space.
pub type Vec3 = [f64; 3];

const AXES: [char; 3] = ['x', 'y', 'z'];

/// A straight line between two scene points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
}

impl Segment {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        distance(self.start, self.end)
    }
}

/// Malformed geometry rejected before rendering.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("coordinate {axis} is not finite ({value})")]
    NonFinite { axis: char, value: f64 },
    #[error("segment {endpoint} point: {source}")]
    Endpoint {
        endpoint: &'static str,
        #[source]
        source: Box<GeometryError>,
    },
    #[error("polyline needs at least two points, got {0}")]
    TooFewPoints(usize),
}

/// Reject points with NaN or infinite coordinates.
pub fn validate_point(p: &Vec3) -> Result<(), GeometryError> {
    for (axis, &value) in AXES.iter().zip(p.iter()) {
        if !value.is_finite() {
            return Err(GeometryError::NonFinite { axis: *axis, value });
        }
    }
    Ok(())
}

pub fn validate_segment(s: &Segment) -> Result<(), GeometryError> {
    validate_point(&s.start).map_err(|e| GeometryError::Endpoint {
        endpoint: "start",
        source: Box::new(e),
    })?;
    validate_point(&s.end).map_err(|e| GeometryError::Endpoint {
        endpoint: "end",
        source: Box::new(e),
    })
}

/// A line strip needs two points and every point must be finite.
pub fn validate_polyline(points: &[Vec3]) -> Result<(), GeometryError> {
    if points.len() < 2 {
        return Err(GeometryError::TooFewPoints(points.len()));
    }
    points.iter().try_for_each(validate_point)
}

pub fn offset(p: Vec3, origin: Vec3) -> Vec3 {
    [p[0] + origin[0], p[1] + origin[1], p[2] + origin[2]]
}

pub fn distance(a: Vec3, b: Vec3) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
}
