//! Transform types for variant and element rotations.

use super::Axis;
use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Variant-level transform from a blockstate entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BlockTransform {
    /// X rotation in degrees (0, 90, 180, 270).
    pub x: i32,
    /// Y rotation in degrees (0, 90, 180, 270).
    pub y: i32,
}

impl BlockTransform {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Check if this is an identity transform (no rotation).
    pub fn is_identity(&self) -> bool {
        self.x.rem_euclid(360) == 0 && self.y.rem_euclid(360) == 0
    }

    /// Rotation matrix applying X then Y.
    ///
    /// Angles are negated: variant rotations are clockwise when looking down
    /// the axis, glam follows the right-hand rule.
    pub fn matrix(&self) -> Mat3 {
        let x_rot = Mat3::from_rotation_x((-self.x as f32).to_radians());
        let y_rot = Mat3::from_rotation_y((-self.y as f32).to_radians());
        y_rot * x_rot
    }

    /// Rotate a block-local position (0-1) about the block center.
    pub fn apply_position(&self, position: [f32; 3]) -> [f32; 3] {
        if self.is_identity() {
            return position;
        }
        let center = Vec3::splat(0.5);
        let p = self.matrix() * (Vec3::from(position) - center) + center;
        p.to_array()
    }

    /// Rotate a direction vector.
    pub fn apply_normal(&self, normal: [f32; 3]) -> [f32; 3] {
        if self.is_identity() {
            return normal;
        }
        (self.matrix() * Vec3::from(normal)).to_array()
    }
}

/// Element-level rotation from a model element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRotation {
    /// Origin point for rotation (in 0-16 model coordinates).
    #[serde(default = "default_origin")]
    pub origin: [f32; 3],
    /// Axis to rotate around.
    pub axis: Axis,
    /// Rotation angle in degrees (-45 to 45, in 22.5 increments).
    pub angle: f32,
    /// Whether to rescale the element after rotation.
    #[serde(default)]
    pub rescale: bool,
}

fn default_origin() -> [f32; 3] {
    [8.0, 8.0, 8.0]
}

impl ElementRotation {
    /// Origin in block-local (0-1) coordinates.
    pub fn normalized_origin(&self) -> Vec3 {
        Vec3::from(self.origin) / 16.0
    }

    /// Get the angle in radians.
    pub fn angle_radians(&self) -> f32 {
        self.angle.to_radians()
    }

    /// Scale applied to the two axes perpendicular to the rotation axis.
    pub fn rescale_factor(&self) -> f32 {
        if self.rescale {
            1.0 / self.angle_radians().cos()
        } else {
            1.0
        }
    }

    /// Rotation matrix for this element.
    pub fn matrix(&self) -> Mat3 {
        let angle = self.angle_radians();
        match self.axis {
            Axis::X => Mat3::from_rotation_x(angle),
            Axis::Y => Mat3::from_rotation_y(angle),
            Axis::Z => Mat3::from_rotation_z(angle),
        }
    }

    /// Rotate a block-local position about the origin, rescaling if requested.
    pub fn apply_position(&self, position: [f32; 3]) -> [f32; 3] {
        let origin = self.normalized_origin();
        let rotated = self.matrix() * (Vec3::from(position) - origin);
        let rescale = self.rescale_factor();
        let scaled = match self.axis {
            Axis::X => Vec3::new(rotated.x, rotated.y * rescale, rotated.z * rescale),
            Axis::Y => Vec3::new(rotated.x * rescale, rotated.y, rotated.z * rescale),
            Axis::Z => Vec3::new(rotated.x * rescale, rotated.y * rescale, rotated.z),
        };
        (scaled + origin).to_array()
    }

    /// Rotate a normal (never rescaled).
    pub fn apply_normal(&self, normal: [f32; 3]) -> [f32; 3] {
        (self.matrix() * Vec3::from(normal)).normalize_or_zero().to_array()
    }
}
