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

use criterion::{criterion_group, criterion_main, Criterion};
use lumina_core::math::{LinearRgba, Mat4, Vec2, Vec3, FRAC_PI_4};
use lumina_core::renderer::api::{
    CameraUniform, CubeBinding, CubeTexture, InstanceRaw, LightUniform, ModelVertex, Sampler,
    Texture2d, TextureBinding, VertexAttributes,
};
use lumina_lanes::shading_lane::{
    BindingSet, FragmentSample, ShadingProgram, ShadingSettings, ShadingVariant,
};
use std::hint::black_box;

const GRID: u32 = 32;

fn grid_mesh() -> Vec<ModelVertex> {
    let step = 2.0 / (GRID - 1) as f32;
    (0..GRID * GRID)
        .map(|i| {
            let (x, y) = ((i % GRID) as f32, (i / GRID) as f32);
            ModelVertex::new(
                Vec3::new(-1.0 + x * step, -1.0 + y * step, 0.0),
                Vec2::new(x / (GRID - 1) as f32, y / (GRID - 1) as f32),
                Vec3::Z,
            )
            .with_tangent_basis(Vec3::X, Vec3::Y)
        })
        .collect()
}

fn bench_shading(c: &mut Criterion) {
    let eye = Vec3::new(0.0, 0.5, 4.0);
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y).expect("eye is off the origin");
    let camera = CameraUniform::from_matrices(eye, view, Mat4::perspective_rh_zo(FRAC_PI_4, 1.0, 0.1, 100.0));
    let light = LightUniform::new(Vec3::new(2.0, 2.0, 2.0), Vec3::ONE);
    let diffuse = Texture2d::solid(LinearRgba::rgb(0.8, 0.7, 0.6));
    let normal_map = Texture2d::solid(LinearRgba::new(0.55, 0.45, 0.95, 1.0));
    let environment = CubeTexture::solid(LinearRgba::rgb(0.3, 0.4, 0.5));
    let sampler = Sampler::LINEAR_REPEAT;
    let bindings = BindingSet::new()
        .with_camera(&camera)
        .with_light(&light)
        .with_diffuse(TextureBinding::new(&diffuse, &sampler))
        .with_normal_map(TextureBinding::new(&normal_map, &sampler))
        .with_environment(CubeBinding::new(&environment, &sampler));

    let vertices = grid_mesh();
    // 64 instances along a line
    let instances: Vec<InstanceRaw> = (0..64)
        .map(|i| InstanceRaw::from_model(Mat4::from_translation(Vec3::new(i as f32 * 0.1, 0.0, -(i as f32)))))
        .collect();
    let samples: Vec<FragmentSample> = (0..instances.len() as u32)
        .flat_map(|instance| {
            (0..GRID - 1).map(move |x| FragmentSample {
                instance,
                triangle: [x, x + 1, x + GRID],
                barycentric: Vec3::new(0.2, 0.3, 0.5),
            })
        })
        .collect();

    let mut group = c.benchmark_group("Shading Lane");

    for variant in [
        ShadingVariant::UnlitTextured,
        ShadingVariant::BasicLit { reflection: true },
        ShadingVariant::NormalMappedTangent,
        ShadingVariant::NormalMappedWorld { reflection: true },
    ] {
        let program = ShadingProgram::build(
            &variant.recipe(),
            VertexAttributes::ALL,
            &bindings,
            &ShadingSettings::default(),
        )
        .expect("benchmark variants build");

        group.bench_function(format!("{} vertex stage", variant.name()), |b| {
            b.iter(|| black_box(program.clip_positions(black_box(&vertices), black_box(&instances))));
        });

        group.bench_function(format!("{} full shade", variant.name()), |b| {
            b.iter(|| {
                let colors = program
                    .shade(black_box(&vertices), black_box(&instances), black_box(&samples))
                    .expect("samples in range");
                black_box(colors)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_shading);
criterion_main!(benches);
