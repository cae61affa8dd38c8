pub mod offset;
pub mod point;

pub use offset::{
    Offset, child_rotation_from_offset, normalize_angle, offset_from_points, rotate_xy,
    target_point_from_offset,
};
pub use point::Point;
