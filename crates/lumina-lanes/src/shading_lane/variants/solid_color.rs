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

use crate::shading_lane::vertex_stage::{clip_position, world_position};
use crate::shading_lane::{ShadingStages, VaryingSet, VertexOutput};
use lumina_core::math::LinearRgba;
use lumina_core::renderer::api::{CameraUniform, InstanceRaw, ModelVertex, VertexAttributes};

/// A fixed color for every fragment, ignoring material, light and environment.
///
/// Only the clip transform runs, which isolates vertex-stage problems.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor<'a> {
    camera: &'a CameraUniform,
    color: LinearRgba,
}

impl<'a> SolidColor<'a> {
    /// Creates the stage pair.
    pub fn new(camera: &'a CameraUniform, color: LinearRgba) -> Self {
        Self { camera, color }
    }
}

impl ShadingStages for SolidColor<'_> {
    type Varying = ();

    const NAME: &'static str = "SolidColor";
    const REQUIRED_ATTRIBUTES: VertexAttributes = VertexAttributes::POSITION;
    const VARYINGS_WRITTEN: VaryingSet = VaryingSet::NONE;
    const VARYINGS_READ: VaryingSet = VaryingSet::NONE;

    fn vertex(&self, vertex: &ModelVertex, instance: &InstanceRaw) -> VertexOutput<Self::Varying> {
        VertexOutput {
            clip_position: clip_position(self.camera, world_position(&instance.transform(), vertex)),
            varying: (),
        }
    }

    fn fragment(&self, _varying: &Self::Varying) -> LinearRgba {
        self.color
    }
}
