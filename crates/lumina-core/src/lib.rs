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

//! # Lumina Core
//!
//! Foundational crate for the lumina shading pipeline: linear algebra, the
//! GPU-facing vertex/instance/uniform records, CPU-side sampled textures and
//! the layout descriptors through which the shading lanes and the engine that
//! owns the device agree on bindings.

#![warn(missing_docs)]

pub mod math;
pub mod renderer;
