//! Math utilities and types
//!
//! Vector, matrix and quaternion types come straight from nalgebra. They are
//! plain `Copy` values, so scratch math lives on the stack instead of in
//! per-type object pools.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type (column vectors, `world = parent * local`)
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Build a translation * rotation * scale matrix
pub fn trs_matrix(position: &Vec3, rotation: &Quat, scale: &Vec3) -> Mat4 {
    Mat4::new_translation(position)
        * rotation.to_homogeneous()
        * Mat4::new_nonuniform_scaling(scale)
}

/// Translation column of an affine matrix
pub fn translation_of(matrix: &Mat4) -> Vec3 {
    Vec3::new(matrix.m14, matrix.m24, matrix.m34)
}

/// Rotation part of an affine matrix with the column scale removed
pub fn rotation_of(matrix: &Mat4) -> Quat {
    let mut basis: Mat3 = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    for mut column in basis.column_iter_mut() {
        let length = column.norm();
        if length > 0.0 {
            column /= length;
        }
    }
    Quat::from_matrix(&basis)
}

/// Transform a point by an affine matrix
pub fn transform_point(matrix: &Mat4, point: &Vec3) -> Vec3 {
    matrix.transform_point(&Point3::from(*point)).coords
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_trs_matrix_translation_and_rotation_roundtrip() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), 0.6);
        let matrix = trs_matrix(&Vec3::new(1.0, 2.0, 3.0), &rotation, &Vec3::new(2.0, 2.0, 2.0));

        assert_relative_eq!(translation_of(&matrix), Vec3::new(1.0, 2.0, 3.0), epsilon = 1e-6);
        let recovered = rotation_of(&matrix);
        assert!(recovered.coords.dot(&rotation.coords).abs() > 0.9999);
    }

    #[test]
    fn test_transform_point_applies_scale_before_translation() {
        let matrix = trs_matrix(&Vec3::new(0.0, 1.0, 0.0), &Quat::identity(), &Vec3::new(2.0, 3.0, 4.0));
        let point = transform_point(&matrix, &Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(point, Vec3::new(2.0, 4.0, 4.0), epsilon = 1e-6);
    }
}
