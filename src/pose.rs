//! Head transformation matrix to rotation angles.

use crate::angle_mapper::RotationAngles;
use nalgebra::Matrix4;

/// Extract head rotation from the model's facial transformation matrix.
///
/// The upper-left 3x3 block is decomposed as `Rz(θz) · Ry(θy) · Rx(θx)`.
/// Looking up rotates the face model negatively around x, so pitch is
/// reported as `-θx`; roll is `θz` and yaw is `θy`. Translation and uniform
/// scale do not affect the result. A missing transform is a neutral pose.
#[must_use]
pub fn rotation_angles(head_transform: Option<&Matrix4<f64>>) -> RotationAngles {
    let Some(m) = head_transform else {
        return RotationAngles::neutral();
    };

    let (r11, r21) = (m[(0, 0)], m[(1, 0)]);
    let (r31, r32, r33) = (m[(2, 0)], m[(2, 1)], m[(2, 2)]);

    let theta_x = r32.atan2(r33);
    let theta_y = (-r31).atan2(r32.hypot(r33));
    let theta_z = r21.atan2(r11);

    let angles = RotationAngles::new(theta_z.to_degrees(), -theta_x.to_degrees(), theta_y.to_degrees());
    if angles.roll.is_finite() && angles.pitch.is_finite() && angles.yaw.is_finite() {
        angles
    } else {
        RotationAngles::neutral()
    }
}
