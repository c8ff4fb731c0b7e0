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

//! CPU-resident sampled textures.
//!
//! These stand in for the (texture, sampler) pairs the collaborator binds on
//! the GPU, so the stage functions can be evaluated off-device. Sampling is a
//! pure read: nothing here is mutated after construction.

use crate::math::{LinearRgba, Vec2, Vec3, EPSILON};
use crate::renderer::error::TextureError;

/// How texture coordinates outside `[0, 1]` are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressMode {
    /// Coordinates are clamped to the edge texels.
    #[default]
    ClampToEdge,
    /// The texture tiles.
    Repeat,
    /// The texture tiles, flipping on every other repetition.
    MirrorRepeat,
}

/// How texels are combined when a coordinate falls between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// The closest texel is returned.
    Nearest,
    /// The four closest texels are blended bilinearly.
    #[default]
    Linear,
}

/// Sampling state shared by every texture lookup through one binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sampler {
    /// Address mode applied on both axes.
    pub address_mode: AddressMode,
    /// Filter applied for both magnification and minification.
    pub filter: FilterMode,
}

impl Sampler {
    /// Bilinear filtering, clamped to the edges.
    pub const LINEAR_CLAMP: Self = Self {
        address_mode: AddressMode::ClampToEdge,
        filter: FilterMode::Linear,
    };
    /// Bilinear filtering, tiling.
    pub const LINEAR_REPEAT: Self = Self {
        address_mode: AddressMode::Repeat,
        filter: FilterMode::Linear,
    };
    /// Nearest-texel lookup, clamped to the edges.
    pub const NEAREST_CLAMP: Self = Self {
        address_mode: AddressMode::ClampToEdge,
        filter: FilterMode::Nearest,
    };
}

/// Resolves an integer texel index against a texture dimension.
fn wrap_index(i: i64, size: u32, mode: AddressMode) -> usize {
    let n = i64::from(size);
    let wrapped = match mode {
        AddressMode::ClampToEdge => i.clamp(0, n - 1),
        AddressMode::Repeat => i.rem_euclid(n),
        AddressMode::MirrorRepeat => {
            let m = i.rem_euclid(2 * n);
            if m >= n {
                2 * n - 1 - m
            } else {
                m
            }
        }
    };
    wrapped as usize
}

/// A two-dimensional RGBA texture with linear `f32` texels, row-major from the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture2d {
    width: u32,
    height: u32,
    texels: Vec<LinearRgba>,
}

impl Texture2d {
    /// Creates a texture, checking that `texels` holds `width * height` entries.
    pub fn new(width: u32, height: u32, texels: Vec<LinearRgba>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        if texels.len() != width as usize * height as usize {
            return Err(TextureError::DimensionMismatch {
                width,
                height,
                texels: texels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// A 1x1 texture of a single color.
    pub fn solid(color: LinearRgba) -> Self {
        Self {
            width: 1,
            height: 1,
            texels: vec![color],
        }
    }

    /// Width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The largest color channel over all texels.
    pub fn max_channel(&self) -> f32 {
        self.texels
            .iter()
            .map(LinearRgba::max_channel)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    fn texel(&self, x: i64, y: i64, mode: AddressMode) -> LinearRgba {
        let x = wrap_index(x, self.width, mode);
        let y = wrap_index(y, self.height, mode);
        self.texels[y * self.width as usize + x]
    }

    /// Samples the texture at `uv`, where `(0, 0)` is the top-left corner.
    pub fn sample(&self, sampler: &Sampler, uv: Vec2) -> LinearRgba {
        let x = uv.x * self.width as f32;
        let y = uv.y * self.height as f32;
        match sampler.filter {
            FilterMode::Nearest => {
                self.texel(x.floor() as i64, y.floor() as i64, sampler.address_mode)
            }
            FilterMode::Linear => {
                // Texel centers sit at half-integer coordinates.
                let (x, y) = (x - 0.5, y - 0.5);
                let (x0, y0) = (x.floor(), y.floor());
                let (fx, fy) = (x - x0, y - y0);
                // The float-to-int cast saturates, so the neighbour must too.
                let (x0, y0) = (x0 as i64, y0 as i64);
                let (x1, y1) = (x0.saturating_add(1), y0.saturating_add(1));
                let mode = sampler.address_mode;
                let top = lerp_color(self.texel(x0, y0, mode), self.texel(x1, y0, mode), fx);
                let bottom = lerp_color(self.texel(x0, y1, mode), self.texel(x1, y1, mode), fx);
                lerp_color(top, bottom, fy)
            }
        }
    }
}

#[inline]
fn lerp_color(a: LinearRgba, b: LinearRgba, t: f32) -> LinearRgba {
    a + (b - a) * t
}

/// A cube map: six square faces in +X, -X, +Y, -Y, +Z, -Z order.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeTexture {
    faces: [Texture2d; 6],
}

impl CubeTexture {
    /// Creates a cube map, checking that every face is square and the same size.
    pub fn new(faces: [Texture2d; 6]) -> Result<Self, TextureError> {
        let size = faces[0].width;
        for (index, face) in faces.iter().enumerate() {
            if face.width != size || face.height != size {
                return Err(TextureError::InvalidCubeFace { face: index });
            }
        }
        Ok(Self { faces })
    }

    /// A cube map whose every face is one color.
    pub fn solid(color: LinearRgba) -> Self {
        Self {
            faces: std::array::from_fn(|_| Texture2d::solid(color)),
        }
    }

    /// Edge length of each face in texels.
    pub fn size(&self) -> u32 {
        self.faces[0].width
    }

    /// The largest color channel over all faces.
    pub fn max_channel(&self) -> f32 {
        self.faces
            .iter()
            .map(Texture2d::max_channel)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Maps a direction to a face index and the face-local coordinate.
    ///
    /// A zero-length direction resolves to the centre of the +X face.
    pub fn face_coords(direction: Vec3) -> (usize, Vec2) {
        let Vec3 { x, y, z } = direction;
        let (ax, ay, az) = (x.abs(), y.abs(), z.abs());
        let (face, sc, tc, ma) = if ax >= ay && ax >= az {
            if x >= 0.0 {
                (0, -z, -y, ax)
            } else {
                (1, z, -y, ax)
            }
        } else if ay >= az {
            if y >= 0.0 {
                (2, x, z, ay)
            } else {
                (3, x, -z, ay)
            }
        } else if z >= 0.0 {
            (4, x, -y, az)
        } else {
            (5, -x, -y, az)
        };
        if ma < EPSILON {
            return (0, Vec2::new(0.5, 0.5));
        }
        (face, Vec2::new((sc / ma + 1.0) * 0.5, (tc / ma + 1.0) * 0.5))
    }

    /// Samples the cube along `direction`. The direction need not be normalized.
    ///
    /// Filtering stays within the selected face; addressing is always clamped.
    pub fn sample(&self, sampler: &Sampler, direction: Vec3) -> LinearRgba {
        let (face, uv) = Self::face_coords(direction);
        let face_sampler = Sampler {
            address_mode: AddressMode::ClampToEdge,
            ..*sampler
        };
        self.faces[face].sample(&face_sampler, uv)
    }
}

/// A 2D texture bound together with its sampler (bindings `n` and `n + 1`).
#[derive(Debug, Clone, Copy)]
pub struct TextureBinding<'a> {
    /// The bound texture.
    pub texture: &'a Texture2d,
    /// The sampler bound next to it.
    pub sampler: &'a Sampler,
}

impl<'a> TextureBinding<'a> {
    /// Pairs a texture with a sampler.
    pub fn new(texture: &'a Texture2d, sampler: &'a Sampler) -> Self {
        Self { texture, sampler }
    }

    /// Samples the bound texture.
    #[inline]
    pub fn sample(&self, uv: Vec2) -> LinearRgba {
        self.texture.sample(self.sampler, uv)
    }
}

/// A cube texture bound together with its sampler.
#[derive(Debug, Clone, Copy)]
pub struct CubeBinding<'a> {
    /// The bound cube map.
    pub texture: &'a CubeTexture,
    /// The sampler bound next to it.
    pub sampler: &'a Sampler,
}

impl<'a> CubeBinding<'a> {
    /// Pairs a cube map with a sampler.
    pub fn new(texture: &'a CubeTexture, sampler: &'a Sampler) -> Self {
        Self { texture, sampler }
    }

    /// Samples the bound cube map along `direction`.
    #[inline]
    pub fn sample(&self, direction: Vec3) -> LinearRgba {
        self.texture.sample(self.sampler, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn checker() -> Texture2d {
        Texture2d::new(
            2,
            2,
            vec![
                LinearRgba::BLACK,
                LinearRgba::WHITE,
                LinearRgba::WHITE,
                LinearRgba::BLACK,
            ],
        )
        .expect("2x2 texture")
    }

    #[test]
    fn test_new_rejects_bad_dimensions() {
        assert_eq!(Texture2d::new(0, 4, vec![]), Err(TextureError::Empty));
        assert_eq!(
            Texture2d::new(2, 2, vec![LinearRgba::WHITE; 3]),
            Err(TextureError::DimensionMismatch {
                width: 2,
                height: 2,
                texels: 3
            })
        );
    }

    #[test]
    fn test_nearest_sampling() {
        let tex = checker();
        assert_eq!(tex.sample(&Sampler::NEAREST_CLAMP, Vec2::new(0.25, 0.25)), LinearRgba::BLACK);
        assert_eq!(tex.sample(&Sampler::NEAREST_CLAMP, Vec2::new(0.75, 0.25)), LinearRgba::WHITE);
        // Clamped beyond the right edge.
        assert_eq!(tex.sample(&Sampler::NEAREST_CLAMP, Vec2::new(3.0, 0.25)), LinearRgba::WHITE);
    }

    #[test]
    fn test_linear_sampling_survives_extreme_coordinates() {
        let tex = Texture2d::solid(LinearRgba::WHITE);
        for sampler in [Sampler::LINEAR_REPEAT, Sampler::LINEAR_CLAMP] {
            assert_eq!(tex.sample(&sampler, Vec2::new(1.0e19, 0.5)), LinearRgba::WHITE);
            assert_eq!(tex.sample(&sampler, Vec2::new(0.5, -1.0e19)), LinearRgba::WHITE);
            // Non-finite coordinates give an unspecified color but must not panic.
            let _ = tex.sample(&sampler, Vec2::new(f32::INFINITY, f32::NEG_INFINITY));
            let _ = tex.sample(&sampler, Vec2::new(f32::NAN, 0.5));
        }
    }

    #[test]
    fn test_linear_sampling_blends_at_center() {
        let tex = checker();
        let c = tex.sample(&Sampler::LINEAR_CLAMP, Vec2::new(0.5, 0.5));
        assert_relative_eq!(c.r, 0.5, epsilon = 1e-6);
        assert_relative_eq!(c.a, 1.0, epsilon = 1e-6);
        // At a texel center the filter returns that texel exactly.
        let c = tex.sample(&Sampler::LINEAR_CLAMP, Vec2::new(0.25, 0.25));
        assert_relative_eq!(c.r, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_wrap_modes() {
        assert_eq!(wrap_index(-1, 4, AddressMode::Repeat), 3);
        assert_eq!(wrap_index(-1, 4, AddressMode::ClampToEdge), 0);
        assert_eq!(wrap_index(4, 4, AddressMode::MirrorRepeat), 3);
        assert_eq!(wrap_index(-1, 4, AddressMode::MirrorRepeat), 0);
        assert_eq!(wrap_index(9, 4, AddressMode::MirrorRepeat), 1);
    }

    #[test]
    fn test_cube_face_selection() {
        assert_eq!(CubeTexture::face_coords(Vec3::X).0, 0);
        assert_eq!(CubeTexture::face_coords(-Vec3::X).0, 1);
        assert_eq!(CubeTexture::face_coords(Vec3::Y).0, 2);
        assert_eq!(CubeTexture::face_coords(-Vec3::Y).0, 3);
        assert_eq!(CubeTexture::face_coords(Vec3::Z).0, 4);
        assert_eq!(CubeTexture::face_coords(-Vec3::Z).0, 5);
        let (_, uv) = CubeTexture::face_coords(Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(uv, Vec2::new(0.5, 0.5));
        assert_eq!(CubeTexture::face_coords(Vec3::ZERO), (0, Vec2::new(0.5, 0.5)));
    }

    #[test]
    fn test_cube_sampling_reads_the_right_face() {
        let colors = [
            LinearRgba::rgb(1.0, 0.0, 0.0),
            LinearRgba::rgb(0.0, 1.0, 0.0),
            LinearRgba::rgb(0.0, 0.0, 1.0),
            LinearRgba::rgb(1.0, 1.0, 0.0),
            LinearRgba::rgb(0.0, 1.0, 1.0),
            LinearRgba::rgb(1.0, 0.0, 1.0),
        ];
        let cube = CubeTexture::new(colors.map(Texture2d::solid)).expect("uniform faces");
        let sampler = Sampler::LINEAR_CLAMP;
        assert_eq!(cube.sample(&sampler, Vec3::new(0.1, -3.0, 0.2)), colors[3]);
        assert_eq!(cube.sample(&sampler, Vec3::new(0.1, 0.2, -0.9)), colors[5]);
        assert_eq!(cube.max_channel(), 1.0);
    }

    #[test]
    fn test_cube_rejects_mismatched_faces() {
        let mut faces: [Texture2d; 6] = std::array::from_fn(|_| Texture2d::solid(LinearRgba::WHITE));
        faces[2] = checker();
        assert_eq!(
            CubeTexture::new(faces),
            Err(TextureError::InvalidCubeFace { face: 2 })
        );
    }
}
