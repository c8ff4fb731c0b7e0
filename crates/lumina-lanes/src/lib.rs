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

//! # Lumina Lanes
//!
//! The forward shading lane: a family of vertex/fragment stage pairs sharing
//! one set of transform, tangent-basis and lighting functions.
//!
//! A [`ShadingRecipe`](shading_lane::ShadingRecipe) names the effects a draw
//! wants. [`ShadingProgram::build`](shading_lane::ShadingProgram::build)
//! selects the matching variant, validates it against the mesh layout and the
//! bound resources, and returns a program that runs the stages as parallel
//! maps. [`shaders`] emits the equivalent WGSL for the GPU.

#![warn(missing_docs)]

pub mod shaders;
pub mod shading_lane;
