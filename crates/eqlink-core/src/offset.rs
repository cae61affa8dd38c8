use serde::{Deserialize, Serialize};

use crate::point::Point;

/// A parent-relative translation plus a rotation delta about the vertical
/// axis. Stored values are rounded to 6 decimals so they survive
/// serialization round-trips unchanged.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Offset {
    #[serde(default)]
    pub x_inches: f64,
    #[serde(default)]
    pub y_inches: f64,
    #[serde(default)]
    pub z_inches: f64,
    #[serde(default)]
    pub rotation_deg: f64,
}

impl Offset {
    #[must_use]
    pub fn new(x_inches: f64, y_inches: f64, z_inches: f64, rotation_deg: f64) -> Self {
        Self {
            x_inches,
            y_inches,
            z_inches,
            rotation_deg,
        }
    }

    #[must_use]
    pub fn translation(&self) -> Point {
        Point::new(self.x_inches, self.y_inches, self.z_inches)
    }
}

/// Rotate the X/Y components of `v` by `angle_deg` (counter-clockwise) about
/// the vertical axis. Z passes through. Non-finite angles count as 0.
#[must_use]
pub fn rotate_xy(v: Point, angle_deg: f64) -> Point {
    let a = finite_or_zero(angle_deg).to_radians();
    let (s, c) = a.sin_cos();
    Point::new(v.x * c - v.y * s, v.x * s + v.y * c, v.z)
}

/// Reduce an angle to the open-closed interval `(-180, 180]`.
#[must_use]
pub fn normalize_angle(angle_deg: f64) -> f64 {
    let mut value = finite_or_zero(angle_deg);
    while value > 180.0 {
        value -= 360.0;
    }
    while value <= -180.0 {
        value += 360.0;
    }
    value
}

/// Express the pose of `child_point` in the local frame of a parent at
/// `parent_point` rotated by `parent_rotation_deg`. Either point missing
/// yields the zero offset.
#[must_use]
pub fn offset_from_points(
    parent_point: Option<Point>,
    parent_rotation_deg: f64,
    child_point: Option<Point>,
    child_rotation_deg: f64,
) -> Offset {
    let (Some(parent), Some(child)) = (parent_point, child_point) else {
        return Offset::default();
    };
    let local = rotate_xy(child - parent, -finite_or_zero(parent_rotation_deg));
    Offset {
        x_inches: round6(local.x),
        y_inches: round6(local.y),
        z_inches: round6(local.z),
        rotation_deg: round6(normalize_angle(
            finite_or_zero(child_rotation_deg) - finite_or_zero(parent_rotation_deg),
        )),
    }
}

/// Inverse of [`offset_from_points`]: the world point reached by applying
/// `offset` in the frame of a parent at `parent_point`. A missing parent
/// point counts as the world origin.
#[must_use]
pub fn target_point_from_offset(
    parent_point: Option<Point>,
    parent_rotation_deg: f64,
    offset: &Offset,
) -> Point {
    let parent = parent_point.unwrap_or_default();
    parent + rotate_xy(offset.translation(), parent_rotation_deg)
}

#[must_use]
pub fn child_rotation_from_offset(parent_rotation_deg: f64, offset: &Offset) -> f64 {
    normalize_angle(finite_or_zero(parent_rotation_deg) + finite_or_zero(offset.rotation_deg))
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}
