//! Foam and spark particle fields riding the wave surface.
//!
//! Planar positions and per-particle motion parameters are drawn once at
//! construction from a seeded generator; heights are derived every tick from
//! the height field and never persisted between frames.

use crate::heightfield;
use crate::params::{FoamParams, SparkParams, SurfaceParams};
use crate::surface::ColorVertex;

/// Simple xorshift random number generator
pub struct ParticleRng {
    state: u32,
}

impl ParticleRng {
    pub fn new(seed: u32) -> Self {
        Self {
            // xorshift has a single absorbing zero state
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    /// Next sample in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        (self.state >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Next sample in [lo, hi)
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }
}

/// Foam point cloud: fixed planar scatter, height glued to the wave surface
pub struct FoamField {
    base_xz: Vec<[f32; 2]>,
    pub points: Vec<ColorVertex>,
    lift_m: f32,
    dirty: bool,
}

impl FoamField {
    pub fn new(params: &FoamParams, surface: &SurfaceParams) -> Self {
        let mut rng = ParticleRng::new(params.seed);
        let half_x = surface.extent_x_m / 2.0;
        let half_z = surface.extent_z_m / 2.0;

        let base_xz: Vec<[f32; 2]> = (0..params.count)
            .map(|_| [rng.range(-half_x, half_x), rng.range(-half_z, half_z)])
            .collect();

        let points = base_xz
            .iter()
            .map(|&[x, z]| ColorVertex {
                position: [x, params.lift_m, z],
                color: params.color,
            })
            .collect();

        Self {
            base_xz,
            points,
            lift_m: params.lift_m,
            dirty: true,
        }
    }

    pub fn update(&mut self, t: f32) {
        for (i, &[x, z]) in self.base_xz.iter().enumerate() {
            self.points[i].position[1] = heightfield::height(x, z, t) + self.lift_m;
        }
        self.dirty = true;
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

/// Per-spark motion parameters, assigned at construction and immutable for
/// the particle's lifetime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparkMotion {
    /// Vertical bob speed (rad/s)
    pub speed: f32,
    /// Vertical bob phase offset (radians)
    pub phase: f32,
}

/// Spark point cloud: surface height plus a personal sinusoidal bob
pub struct SparkField {
    base_xz: Vec<[f32; 2]>,
    motions: Vec<SparkMotion>,
    pub points: Vec<ColorVertex>,
    bob_amplitude_m: f32,
    lift_m: f32,
    dirty: bool,
}

impl SparkField {
    pub fn new(params: &SparkParams, surface: &SurfaceParams) -> Self {
        let mut rng = ParticleRng::new(params.seed);
        let half_x = surface.extent_x_m / 2.0;
        let half_z = surface.extent_z_m / 2.0;
        let (speed_lo, speed_hi) = params.speed_range;

        let mut base_xz = Vec::with_capacity(params.count);
        let mut motions = Vec::with_capacity(params.count);
        let mut points = Vec::with_capacity(params.count);
        for _ in 0..params.count {
            let x = rng.range(-half_x, half_x);
            let z = rng.range(-half_z, half_z);
            base_xz.push([x, z]);
            motions.push(SparkMotion {
                speed: rng.range(speed_lo, speed_hi),
                phase: rng.range(0.0, std::f32::consts::TAU),
            });
            // Warm spark tint, varied per particle
            points.push(ColorVertex {
                position: [x, params.lift_m, z],
                color: [
                    rng.range(0.4, 1.0),
                    rng.range(0.5, 1.0),
                    rng.range(0.4, 1.0),
                    0.8,
                ],
            });
        }

        Self {
            base_xz,
            motions,
            points,
            bob_amplitude_m: params.bob_amplitude_m,
            lift_m: params.lift_m,
            dirty: true,
        }
    }

    pub fn update(&mut self, t: f32) {
        for (i, &[x, z]) in self.base_xz.iter().enumerate() {
            let motion = self.motions[i];
            let bob = (t * motion.speed + motion.phase).sin() * self.bob_amplitude_m;
            self.points[i].position[1] = heightfield::height(x, z, t) + bob + self.lift_m;
        }
        self.dirty = true;
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn motion(&self, index: usize) -> SparkMotion {
        self.motions[index]
    }
}
