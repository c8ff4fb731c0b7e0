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

//! Per-instance transform data (shader locations 5 to 11).
//!
//! A vertex attribute slot holds at most one four-component vector, so the
//! 4x4 model matrix travels as four `Float32x4` columns and the 3x3 normal
//! matrix as three `Float32x3` columns. [`InstanceRaw`] is that packed form;
//! [`InstanceTransform`] is the typed value the vertex stage works with.

use crate::math::{Mat3, Mat4, Vec3, Vec4};
use crate::renderer::api::pipeline::{
    VertexAttributeDescriptor, VertexBufferLayoutDescriptor, VertexFormat, VertexStepMode,
};
use std::borrow::Cow;
use std::mem::size_of;

/// First shader location of the model matrix columns.
pub const MODEL_MATRIX_LOCATION: u32 = 5;
/// First shader location of the normal matrix columns.
pub const NORMAL_MATRIX_LOCATION: u32 = 9;

/// The packed per-instance record as it sits in the instance buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    /// Model matrix columns.
    pub model: [[f32; 4]; 4],
    /// Normal matrix columns: the inverse-transpose of the model's upper 3x3.
    pub normal: [[f32; 3]; 3],
}

const ATTRIBUTES: [VertexAttributeDescriptor; 7] = [
    VertexAttributeDescriptor {
        shader_location: MODEL_MATRIX_LOCATION,
        format: VertexFormat::Float32x4,
        offset: 0,
    },
    VertexAttributeDescriptor {
        shader_location: MODEL_MATRIX_LOCATION + 1,
        format: VertexFormat::Float32x4,
        offset: 16,
    },
    VertexAttributeDescriptor {
        shader_location: MODEL_MATRIX_LOCATION + 2,
        format: VertexFormat::Float32x4,
        offset: 32,
    },
    VertexAttributeDescriptor {
        shader_location: MODEL_MATRIX_LOCATION + 3,
        format: VertexFormat::Float32x4,
        offset: 48,
    },
    VertexAttributeDescriptor {
        shader_location: NORMAL_MATRIX_LOCATION,
        format: VertexFormat::Float32x3,
        offset: 64,
    },
    VertexAttributeDescriptor {
        shader_location: NORMAL_MATRIX_LOCATION + 1,
        format: VertexFormat::Float32x3,
        offset: 76,
    },
    VertexAttributeDescriptor {
        shader_location: NORMAL_MATRIX_LOCATION + 2,
        format: VertexFormat::Float32x3,
        offset: 88,
    },
];

impl InstanceRaw {
    /// An instance placed at the origin, unscaled and unrotated.
    pub const IDENTITY: Self = Self {
        model: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
        normal: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Packs a model matrix, precomputing its normal matrix.
    ///
    /// A singular model matrix has no inverse-transpose; the normal matrix then
    /// falls back to identity and the failure is logged.
    pub fn from_model(model: Mat4) -> Self {
        let normal = Mat3::from_mat4(&model)
            .inverse_transpose()
            .unwrap_or_else(|| {
                log::error!("InstanceRaw: singular model matrix, using identity normal matrix");
                Mat3::IDENTITY
            });
        InstanceTransform { model, normal }.to_raw()
    }

    /// The per-instance buffer layout.
    pub fn layout() -> VertexBufferLayoutDescriptor<'static> {
        VertexBufferLayoutDescriptor {
            array_stride: size_of::<InstanceRaw>() as u64,
            step_mode: VertexStepMode::Instance,
            attributes: Cow::Borrowed(&ATTRIBUTES),
        }
    }

    /// The model matrix column delivered at location `5 + index`.
    #[inline]
    pub fn model_column(&self, index: usize) -> Vec4 {
        self.model[index].into()
    }

    /// The normal matrix column delivered at location `9 + index`.
    #[inline]
    pub fn normal_column(&self, index: usize) -> Vec3 {
        self.normal[index].into()
    }

    /// Reassembles the typed transform from its attribute columns.
    #[inline]
    pub fn transform(&self) -> InstanceTransform {
        InstanceTransform {
            model: Mat4::from_cols(
                self.model_column(0),
                self.model_column(1),
                self.model_column(2),
                self.model_column(3),
            ),
            normal: Mat3::from_cols(
                self.normal_column(0),
                self.normal_column(1),
                self.normal_column(2),
            ),
        }
    }
}

impl Default for InstanceRaw {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// An instance's object-to-world transform paired with its normal matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    model: Mat4,
    normal: Mat3,
}

impl InstanceTransform {
    /// Pairs a model matrix with an explicitly supplied normal matrix.
    pub fn new(model: Mat4, normal: Mat3) -> Self {
        Self { model, normal }
    }

    /// The object-to-world matrix.
    #[inline]
    pub fn model_matrix(&self) -> Mat4 {
        self.model
    }

    /// The matrix that carries object-space normals to world space.
    #[inline]
    pub fn normal_matrix(&self) -> Mat3 {
        self.normal
    }

    /// Transforms an object-space position to a homogeneous world position.
    #[inline]
    pub fn world_position(&self, position: Vec3) -> Vec4 {
        self.model * position.extend(1.0)
    }

    /// Transforms an object-space direction by the normal matrix. Not normalized.
    #[inline]
    pub fn world_direction(&self, direction: Vec3) -> Vec3 {
        self.normal * direction
    }

    /// Packs the transform into its buffer form.
    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw {
            model: self.model.to_cols_array_2d(),
            normal: self.normal.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;
    use crate::renderer::api::pipeline::validate_vertex_buffers;
    use crate::renderer::api::scene::ModelVertex;

    #[test]
    fn test_instance_layout_occupies_locations_5_to_11() {
        assert_eq!(size_of::<InstanceRaw>(), 100);
        let layout = InstanceRaw::layout();
        let locations: Vec<u32> = layout.attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, (5..=11).collect::<Vec<_>>());
        assert_eq!(layout.step_mode, VertexStepMode::Instance);
        assert!(validate_vertex_buffers(&[ModelVertex::layout(), layout]).is_ok());
    }

    #[test]
    fn test_roundtrip_through_columns() {
        let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
            * Mat4::from_rotation_z(0.4)
            * Mat4::from_scale(Vec3::new(1.0, 3.0, 0.5));
        let raw = InstanceRaw::from_model(model);
        let transform = raw.transform();
        assert_eq!(transform.model_matrix(), model);
        assert_eq!(transform.to_raw(), raw);
    }

    #[test]
    fn test_normal_matrix_handles_non_uniform_scale() {
        // Squash along Y: a 45 degree slope's normal must tilt towards Y.
        let raw = InstanceRaw::from_model(Mat4::from_scale(Vec3::new(1.0, 0.5, 1.0)));
        let n = raw.transform().world_direction(Vec3::new(1.0, 1.0, 0.0)).normalize();
        let surface = raw.transform().world_position(Vec3::new(1.0, -1.0, 0.0)).truncate();
        assert!(approx_eq(n.dot(surface), 0.0));
    }

    #[test]
    fn test_identity_matches_packed_identity_model() {
        assert_eq!(InstanceRaw::from_model(Mat4::IDENTITY), InstanceRaw::IDENTITY);
        assert_eq!(InstanceRaw::default(), InstanceRaw::IDENTITY);
    }

    #[test]
    fn test_singular_model_falls_back_to_identity_normals() {
        let raw = InstanceRaw::from_model(Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0)));
        assert_eq!(raw.transform().normal_matrix(), Mat3::IDENTITY);
    }
}
