// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides 3x3 and 4x4 column-major matrix types for linear algebra.

use super::{Vec3, Vec4, EPSILON};
use serde::{Deserialize, Serialize};
use std::ops::{Index, Mul};

// --- Mat3 ---

/// A 3x3 column-major matrix, used for normal transforms and tangent frames.
#[derive(
    Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct Mat3 {
    /// The columns of the matrix. `cols[0]` is the first column.
    pub cols: [Vec3; 3],
}

impl Mat3 {
    /// The 3x3 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec3::X, Vec3::Y, Vec3::Z],
    };

    /// Creates a new matrix from three column vectors.
    #[inline]
    pub const fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self { cols: [c0, c1, c2] }
    }

    /// Creates a matrix from column arrays, the layout used by GPU buffers.
    #[inline]
    pub fn from_cols_array_2d(m: &[[f32; 3]; 3]) -> Self {
        Self::from_cols(m[0].into(), m[1].into(), m[2].into())
    }

    /// Returns the columns as arrays, the layout used by GPU buffers.
    #[inline]
    pub fn to_cols_array_2d(&self) -> [[f32; 3]; 3] {
        [
            self.cols[0].to_array(),
            self.cols[1].to_array(),
            self.cols[2].to_array(),
        ]
    }

    /// Creates a `Mat3` from the upper-left 3x3 corner of a [`Mat4`],
    /// discarding translation.
    #[inline]
    pub fn from_mat4(m4: &Mat4) -> Self {
        Self::from_cols(
            m4.cols[0].truncate(),
            m4.cols[1].truncate(),
            m4.cols[2].truncate(),
        )
    }

    /// Computes the determinant (the scalar triple product of the columns).
    #[inline]
    pub fn determinant(&self) -> f32 {
        self.cols[0].dot(self.cols[1].cross(self.cols[2]))
    }

    /// Returns the transpose of the matrix, where rows and columns are swapped.
    #[inline]
    pub fn transpose(&self) -> Self {
        let [a, b, c] = self.cols;
        Self::from_cols(
            Vec3::new(a.x, b.x, c.x),
            Vec3::new(a.y, b.y, c.y),
            Vec3::new(a.z, b.z, c.z),
        )
    }

    /// Computes the transpose of the inverse directly from the columns.
    ///
    /// This is the matrix that carries surface normals through a transform with
    /// non-uniform scale. Returns `None` when the matrix is singular.
    pub fn inverse_transpose(&self) -> Option<Self> {
        let [a, b, c] = self.cols;
        let det = self.determinant();
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        Some(Self::from_cols(
            b.cross(c) * inv_det,
            c.cross(a) * inv_det,
            a.cross(b) * inv_det,
        ))
    }

    /// Computes the inverse of the matrix, or `None` if it is singular.
    #[inline]
    pub fn inverse(&self) -> Option<Self> {
        self.inverse_transpose().map(|m| m.transpose())
    }
}

impl Default for Mat3 {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z
    }
}

impl Mul<Mat3> for Mat3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Mat3) -> Self {
        Self::from_cols(self * rhs.cols[0], self * rhs.cols[1], self * rhs.cols[2])
    }
}

impl Index<usize> for Mat3 {
    type Output = Vec3;
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.cols[index]
    }
}

// --- Mat4 ---

/// A 4x4 column-major matrix, used for affine and projective transformations.
#[derive(
    Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct Mat4 {
    /// The columns of the matrix. `cols[0]` is the first column.
    pub cols: [Vec4; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    /// Creates a new matrix from four column vectors.
    #[inline]
    pub const fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Creates a matrix from column arrays, the layout used by GPU buffers.
    #[inline]
    pub fn from_cols_array_2d(m: &[[f32; 4]; 4]) -> Self {
        Self::from_cols(m[0].into(), m[1].into(), m[2].into(), m[3].into())
    }

    /// Returns the columns as arrays, the layout used by GPU buffers.
    #[inline]
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.cols.map(Vec4::to_array)
    }

    /// Retrieves a row of the matrix as a `Vec4`.
    #[inline]
    pub fn get_row(&self, index: usize) -> Vec4 {
        Vec4::new(
            self.cols[0][index],
            self.cols[1][index],
            self.cols[2][index],
            self.cols[3][index],
        )
    }

    /// Creates a translation matrix.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        Self::from_cols(Vec4::X, Vec4::Y, Vec4::Z, v.extend(1.0))
    }

    /// Creates a (possibly non-uniform) scaling matrix.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self::from_cols(
            Vec4::new(scale.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, scale.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, scale.z, 0.0),
            Vec4::W,
        )
    }

    /// Creates a rotation of `angle` radians around the X axis.
    #[inline]
    pub fn from_rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::X,
            Vec4::new(0.0, c, s, 0.0),
            Vec4::new(0.0, -s, c, 0.0),
            Vec4::W,
        )
    }

    /// Creates a rotation of `angle` radians around the Y axis.
    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::new(c, 0.0, -s, 0.0),
            Vec4::Y,
            Vec4::new(s, 0.0, c, 0.0),
            Vec4::W,
        )
    }

    /// Creates a rotation of `angle` radians around the Z axis.
    #[inline]
    pub fn from_rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::new(c, s, 0.0, 0.0),
            Vec4::new(-s, c, 0.0, 0.0),
            Vec4::Z,
            Vec4::W,
        )
    }

    /// Creates a right-handed perspective projection with a `[0, 1]` depth range.
    ///
    /// * `fov_y_radians`: Vertical field of view in radians.
    /// * `aspect_ratio`: Width divided by height of the viewport.
    /// * `z_near`, `z_far`: Clip plane distances; `0 < z_near < z_far`.
    ///
    /// # Panics
    ///
    /// Panics if the clip plane distances are out of order.
    #[inline]
    pub fn perspective_rh_zo(fov_y_radians: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        assert!(z_near > 0.0 && z_far > z_near);
        let f = 1.0 / (fov_y_radians * 0.5).tan();
        let range = z_far / (z_near - z_far);
        Self::from_cols(
            Vec4::new(f / aspect_ratio, 0.0, 0.0, 0.0),
            Vec4::new(0.0, f, 0.0, 0.0),
            Vec4::new(0.0, 0.0, range, -1.0),
            Vec4::new(0.0, 0.0, range * z_near, 0.0),
        )
    }

    /// Creates a right-handed view matrix for an eye at `eye` looking along `dir`.
    ///
    /// Returns `None` if `dir` is zero-length or parallel to `up`.
    pub fn look_to_rh(eye: Vec3, dir: Vec3, up: Vec3) -> Option<Self> {
        let f = dir.normalize();
        let s = f.cross(up).normalize();
        if f == Vec3::ZERO || s == Vec3::ZERO {
            return None;
        }
        let u = s.cross(f);
        Some(Self::from_cols(
            Vec4::new(s.x, u.x, -f.x, 0.0),
            Vec4::new(s.y, u.y, -f.y, 0.0),
            Vec4::new(s.z, u.z, -f.z, 0.0),
            Vec4::new(-eye.dot(s), -eye.dot(u), eye.dot(f), 1.0),
        ))
    }

    /// Creates a right-handed view matrix for an eye at `eye` looking at `target`.
    #[inline]
    pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Option<Self> {
        Self::look_to_rh(eye, target - eye, up)
    }

    /// Returns the transpose of the matrix, where rows and columns are swapped.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(self.get_row(0), self.get_row(1), self.get_row(2), self.get_row(3))
    }

    /// Transforms a point (`w = 1`) and returns the `xyz` part without a perspective divide.
    #[inline]
    pub fn transform_point3(&self, p: Vec3) -> Vec3 {
        (*self * p.extend(1.0)).truncate()
    }

    /// Computes the determinant by Gaussian elimination with partial pivoting.
    pub fn determinant(&self) -> f32 {
        let mut rows = self.rows();
        let mut det = 1.0;
        for col in 0..4 {
            let pivot = pivot_row(&rows, col);
            if rows[pivot][col] == 0.0 {
                return 0.0;
            }
            if pivot != col {
                rows.swap(pivot, col);
                det = -det;
            }
            let pivot_values = rows[col];
            det *= pivot_values[col];
            for row in rows.iter_mut().skip(col + 1) {
                let factor = row[col] / pivot_values[col];
                for k in col..4 {
                    row[k] -= factor * pivot_values[k];
                }
            }
        }
        det
    }

    /// Computes the inverse by Gauss-Jordan elimination.
    ///
    /// Returns `None` if the matrix is singular (a pivot smaller than [`EPSILON`]).
    pub fn inverse(&self) -> Option<Self> {
        let mut rows = self.rows();
        let mut inv = Self::IDENTITY.rows();
        for col in 0..4 {
            let pivot = pivot_row(&rows, col);
            if rows[pivot][col].abs() < EPSILON {
                return None;
            }
            rows.swap(pivot, col);
            inv.swap(pivot, col);

            let scale = 1.0 / rows[col][col];
            for k in 0..4 {
                rows[col][k] *= scale;
                inv[col][k] *= scale;
            }

            let (pivot_values, pivot_inv) = (rows[col], inv[col]);
            for row in 0..4 {
                if row == col {
                    continue;
                }
                let factor = rows[row][col];
                for k in 0..4 {
                    rows[row][k] -= factor * pivot_values[k];
                    inv[row][k] -= factor * pivot_inv[k];
                }
            }
        }
        Some(Self::from_cols(inv[0].into(), inv[1].into(), inv[2].into(), inv[3].into()).transpose())
    }

    fn rows(&self) -> [[f32; 4]; 4] {
        [0, 1, 2, 3].map(|r| self.get_row(r).to_array())
    }
}

/// Index of the row at or below `col` with the largest magnitude in column `col`.
fn pivot_row(rows: &[[f32; 4]; 4], col: usize) -> usize {
    let mut best = col;
    for row in col + 1..4 {
        if rows[row][col].abs() > rows[best][col].abs() {
            best = row;
        }
    }
    best
}

impl Default for Mat4 {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Self;
    /// Multiplies this matrix by another `Mat4`. `a * b` applies `b` first.
    #[inline]
    fn mul(self, rhs: Mat4) -> Self {
        Self {
            cols: rhs.cols.map(|col| self * col),
        }
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    #[inline]
    fn mul(self, rhs: Vec4) -> Vec4 {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z + self.cols[3] * rhs.w
    }
}

impl Index<usize> for Mat4 {
    type Output = Vec4;
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.cols[index]
    }
}
