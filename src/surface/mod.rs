//! Wave surface: solid grid mesh plus two translucent wire overlays, kept
//! synchronized to the height field every tick.

mod mesh;

pub use mesh::{ColorVertex, GridMesh, SurfaceVertex};

use glam::Vec3;

use crate::heightfield;
use crate::params::SurfaceParams;

/// The animated wave surface.
///
/// Three parallel vertex buffers share one fixed topology: the solid lit
/// surface and two wire overlays offset by small vertical biases. `update`
/// rewrites heights from the height field and marks the buffers dirty for
/// re-upload; topology never changes after construction.
pub struct WaveSurface {
    pub mesh: GridMesh,
    pub solid: Vec<SurfaceVertex>,
    pub overlays: [Vec<ColorVertex>; 2],
    overlay_bias_m: [f32; 2],
    solid_dirty: bool,
    overlays_dirty: bool,
}

impl WaveSurface {
    pub fn new(params: &SurfaceParams) -> Self {
        let mesh = GridMesh::new(params);

        let solid = mesh
            .base_xz
            .iter()
            .map(|&[x, z]| SurfaceVertex {
                position: [x, 0.0, z],
                normal: [0.0, 1.0, 0.0],
            })
            .collect();

        let overlays = [0, 1].map(|k| {
            mesh.base_xz
                .iter()
                .map(|&[x, z]| ColorVertex {
                    position: [x, params.overlay_bias_m[k], z],
                    color: params.overlay_color[k],
                })
                .collect::<Vec<_>>()
        });

        let mut surface = Self {
            mesh,
            solid,
            overlays,
            overlay_bias_m: params.overlay_bias_m,
            solid_dirty: true,
            overlays_dirty: true,
        };
        surface.update(0.0);
        surface
    }

    /// Rewrite every vertex height for time `t` and recompute solid normals.
    pub fn update(&mut self, t: f32) {
        for (i, &[x, z]) in self.mesh.base_xz.iter().enumerate() {
            let h = heightfield::height(x, z, t);
            self.solid[i].position[1] = h;
            self.overlays[0][i].position[1] = h + self.overlay_bias_m[0];
            self.overlays[1][i].position[1] = h + self.overlay_bias_m[1];
        }
        self.recompute_normals();
        self.solid_dirty = true;
        self.overlays_dirty = true;
    }

    /// Area-weighted smooth vertex normals for the solid surface.
    fn recompute_normals(&mut self) {
        for vertex in &mut self.solid {
            vertex.normal = [0.0; 3];
        }
        for tri in self.mesh.tri_indices.chunks_exact(3) {
            let [ia, ib, ic] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let a = Vec3::from_array(self.solid[ia].position);
            let b = Vec3::from_array(self.solid[ib].position);
            let c = Vec3::from_array(self.solid[ic].position);
            // Unnormalized cross product weights by triangle area
            let face = (b - a).cross(c - a);
            for &i in &[ia, ib, ic] {
                let n = Vec3::from_array(self.solid[i].normal) + face;
                self.solid[i].normal = n.to_array();
            }
        }
        for vertex in &mut self.solid {
            let n = Vec3::from_array(vertex.normal);
            vertex.normal = if n.length_squared() > 1e-12 {
                n.normalize().to_array()
            } else {
                [0.0, 1.0, 0.0]
            };
        }
    }

    /// True once since the last call if the solid buffer needs re-upload
    pub fn take_solid_dirty(&mut self) -> bool {
        std::mem::take(&mut self.solid_dirty)
    }

    /// True once since the last call if the overlay buffers need re-upload
    pub fn take_overlays_dirty(&mut self) -> bool {
        std::mem::take(&mut self.overlays_dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_invariant_across_updates() {
        let params = SurfaceParams::default();
        let mut surface = WaveSurface::new(&params);

        let tri_before = surface.mesh.tri_indices.clone();
        let base_before = surface.mesh.base_xz.clone();
        let count_before = surface.solid.len();

        surface.update(1.0);
        surface.update(17.3);

        assert_eq!(surface.mesh.tri_indices, tri_before);
        assert_eq!(surface.mesh.base_xz, base_before);
        assert_eq!(surface.solid.len(), count_before);
    }

    #[test]
    fn test_heights_follow_height_field() {
        let params = SurfaceParams::default();
        let mut surface = WaveSurface::new(&params);
        let t = 2.5;
        surface.update(t);

        for (i, &[x, z]) in surface.mesh.base_xz.iter().enumerate().step_by(97) {
            let expected = heightfield::height(x, z, t);
            assert_eq!(surface.solid[i].position[1], expected);
        }
    }

    #[test]
    fn test_overlay_bias_offsets() {
        let params = SurfaceParams::default();
        let mut surface = WaveSurface::new(&params);
        surface.update(4.2);

        for i in (0..surface.solid.len()).step_by(53) {
            let h = surface.solid[i].position[1];
            for k in 0..2 {
                let overlay_h = surface.overlays[k][i].position[1];
                assert!((overlay_h - h - params.overlay_bias_m[k]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_normals_are_unit_length() {
        let params = SurfaceParams::default();
        let mut surface = WaveSurface::new(&params);
        surface.update(0.9);

        for vertex in surface.solid.iter().step_by(31) {
            let n = Vec3::from_array(vertex.normal);
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_dirty_flags_reset_on_take() {
        let params = SurfaceParams::default();
        let mut surface = WaveSurface::new(&params);

        assert!(surface.take_solid_dirty());
        assert!(!surface.take_solid_dirty());

        surface.update(1.0);
        assert!(surface.take_solid_dirty());
        assert!(surface.take_overlays_dirty());
        assert!(!surface.take_overlays_dirty());
    }
}
