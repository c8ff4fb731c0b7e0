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

//! The concrete stage pairs.
//!
//! Each variant is a closed unit: it declares its attributes and varyings,
//! borrows only the bindings it reads, and shares its math through
//! [`vertex_stage`](super::vertex_stage) and
//! [`fragment_stage`](super::fragment_stage). A new variant is a new module
//! here plus an arm in [`ShadingVariant`](super::recipe::ShadingVariant).

mod basic_lit;
mod skybox;
mod solid_color;
mod tangent_normal;
mod unlit;
mod world_normal;

pub use basic_lit::BasicLit;
pub use skybox::Skybox;
pub use solid_color::SolidColor;
pub use tangent_normal::NormalMappedTangent;
pub use unlit::UnlitTextured;
pub use world_normal::NormalMappedWorld;
