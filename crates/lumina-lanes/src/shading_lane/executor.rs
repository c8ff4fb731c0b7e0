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

//! Data-parallel execution of the stages.
//!
//! The vertex stage is mapped over every `(instance, vertex)` pair and the
//! fragment stage over every [`FragmentSample`] handed over by the
//! rasterizer. Invocations are independent and run on the `rayon` pool in
//! no particular order; results come back in input order.

use super::error::ShadingError;
use super::varying::Interpolate;
use super::{ShadingStages, VertexOutput};
use lumina_core::math::{LinearRgba, Vec3, Vec4};
use lumina_core::renderer::api::{InstanceRaw, ModelVertex};
use rayon::prelude::*;

/// One fragment to shade: a point inside one triangle of one instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentSample {
    /// Instance the triangle belongs to.
    pub instance: u32,
    /// Vertex indices of the triangle.
    pub triangle: [u32; 3],
    /// Barycentric weights of the three vertices, summing to one.
    pub barycentric: Vec3,
}

impl FragmentSample {
    /// A sample sitting exactly on one vertex.
    pub fn at_vertex(instance: u32, vertex: u32) -> Self {
        Self {
            instance,
            triangle: [vertex; 3],
            barycentric: Vec3::X,
        }
    }
}

/// The vertex stage outputs of a draw, instance-major.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBatch<V> {
    outputs: Vec<VertexOutput<V>>,
    vertex_count: usize,
}

impl<V> VertexBatch<V> {
    /// Vertices per instance.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of instances.
    pub fn instance_count(&self) -> usize {
        if self.vertex_count == 0 {
            0
        } else {
            self.outputs.len() / self.vertex_count
        }
    }

    /// Total number of outputs.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Whether the batch holds no output.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// All outputs, instance-major.
    pub fn outputs(&self) -> &[VertexOutput<V>] {
        &self.outputs
    }

    /// Output for `vertex` of `instance`.
    pub fn get(&self, instance: usize, vertex: usize) -> Option<&VertexOutput<V>> {
        if vertex >= self.vertex_count {
            return None;
        }
        self.outputs.get(instance * self.vertex_count + vertex)
    }

    /// Clip positions in batch order.
    pub fn clip_positions(&self) -> Vec<Vec4> {
        self.outputs.iter().map(|output| output.clip_position).collect()
    }

    fn covers(&self, sample: &FragmentSample) -> bool {
        (sample.instance as usize) < self.instance_count()
            && sample
                .triangle
                .iter()
                .all(|&vertex| (vertex as usize) < self.vertex_count)
    }
}

/// Runs the vertex stage over every vertex of every instance.
pub fn run_vertex_stage<S: ShadingStages>(
    stages: &S,
    vertices: &[ModelVertex],
    instances: &[InstanceRaw],
) -> VertexBatch<S::Varying> {
    let vertex_count = vertices.len();
    let outputs = (0..instances.len() * vertex_count)
        .into_par_iter()
        .map(|index| stages.vertex(&vertices[index % vertex_count], &instances[index / vertex_count]))
        .collect();
    VertexBatch { outputs, vertex_count }
}

/// Interpolates each sample's varyings and runs the fragment stage on it.
///
/// Samples are checked against the batch up front; an out-of-range index
/// fails the whole call before any fragment runs.
pub fn run_fragment_stage<S: ShadingStages>(
    stages: &S,
    batch: &VertexBatch<S::Varying>,
    samples: &[FragmentSample],
) -> Result<Vec<LinearRgba>, ShadingError> {
    if let Some(index) = samples.iter().position(|sample| !batch.covers(sample)) {
        return Err(ShadingError::SampleOutOfRange { index });
    }
    let base = |sample: &FragmentSample| sample.instance as usize * batch.vertex_count;
    Ok(samples
        .par_iter()
        .map(|sample| {
            let [a, b, c] = sample
                .triangle
                .map(|vertex| &batch.outputs[base(sample) + vertex as usize].varying);
            stages.fragment(&Interpolate::interpolate(a, b, c, sample.barycentric))
        })
        .collect())
}

/// Runs both stages for one draw.
pub fn shade<S: ShadingStages>(
    stages: &S,
    vertices: &[ModelVertex],
    instances: &[InstanceRaw],
    samples: &[FragmentSample],
) -> Result<Vec<LinearRgba>, ShadingError> {
    let batch = run_vertex_stage(stages, vertices, instances);
    log::debug!(
        "{}: shaded {} vertices ({} instances), {} fragments queued",
        S::NAME,
        batch.len(),
        batch.instance_count(),
        samples.len()
    );
    run_fragment_stage(stages, &batch, samples)
}
