//! Fixed-topology wave grid: base positions and index buffers, built once.

use bytemuck::{Pod, Zeroable};

use crate::params::SurfaceParams;

/// Vertex data for the solid wave surface (position + normal)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SurfaceVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Vertex data for unlit geometry: wire overlays and point clouds
/// (position + RGBA color)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Immutable grid topology shared by the solid surface and its overlays.
///
/// Base (x, z) positions and adjacency are fixed for the scene's lifetime;
/// only vertex heights are rewritten by the per-tick updater.
pub struct GridMesh {
    /// Base horizontal position per vertex, row-major (z rows, x columns)
    pub base_xz: Vec<[f32; 2]>,
    /// Triangle list for the solid surface (counter-clockwise winding)
    pub tri_indices: Vec<u32>,
    /// Line list tracing grid rows and columns, used by the wire overlays
    pub line_indices: Vec<u32>,
    cols: usize,
    rows: usize,
}

impl GridMesh {
    pub fn new(params: &SurfaceParams) -> Self {
        let cols = params.segs_x + 1;
        let rows = params.segs_z + 1;
        let step_x = params.extent_x_m / params.segs_x as f32;
        let step_z = params.extent_z_m / params.segs_z as f32;
        let half_x = params.extent_x_m / 2.0;
        let half_z = params.extent_z_m / 2.0;

        let mut base_xz = Vec::with_capacity(cols * rows);
        for z in 0..rows {
            for x in 0..cols {
                base_xz.push([x as f32 * step_x - half_x, z as f32 * step_z - half_z]);
            }
        }

        let mut tri_indices = Vec::with_capacity(params.segs_x * params.segs_z * 6);
        for z in 0..params.segs_z {
            for x in 0..params.segs_x {
                let top_left = (z * cols + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * cols + x) as u32;
                let bottom_right = bottom_left + 1;

                tri_indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        // Grid rows and columns as line segments
        let mut line_indices =
            Vec::with_capacity((params.segs_x * rows + params.segs_z * cols) * 2);
        for z in 0..rows {
            for x in 0..params.segs_x {
                let i = (z * cols + x) as u32;
                line_indices.extend_from_slice(&[i, i + 1]);
            }
        }
        for x in 0..cols {
            for z in 0..params.segs_z {
                let i = (z * cols + x) as u32;
                line_indices.extend_from_slice(&[i, i + cols as u32]);
            }
        }

        Self {
            base_xz,
            tri_indices,
            line_indices,
            cols,
            rows,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.cols * self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_mesh_counts() {
        let params = SurfaceParams::default();
        let mesh = GridMesh::new(&params);

        // Vertex count: (segs_x + 1) * (segs_z + 1)
        assert_eq!(
            mesh.vertex_count(),
            (params.segs_x + 1) * (params.segs_z + 1)
        );
        assert_eq!(mesh.base_xz.len(), mesh.vertex_count());

        // Triangle count: segs_x * segs_z cells, 2 triangles each
        assert_eq!(mesh.tri_indices.len(), params.segs_x * params.segs_z * 6);

        // Line count: one segment per cell edge along each axis
        let expected_lines = params.segs_x * (params.segs_z + 1) + params.segs_z * (params.segs_x + 1);
        assert_eq!(mesh.line_indices.len(), expected_lines * 2);
    }

    #[test]
    fn test_grid_is_centered() {
        let params = SurfaceParams::default();
        let mesh = GridMesh::new(&params);

        let first = mesh.base_xz[0];
        let last = mesh.base_xz[mesh.base_xz.len() - 1];
        assert!((first[0] + last[0]).abs() < 1e-4);
        assert!((first[1] + last[1]).abs() < 1e-4);
    }

    #[test]
    fn test_indices_in_range() {
        let params = SurfaceParams::default();
        let mesh = GridMesh::new(&params);
        let count = mesh.vertex_count() as u32;

        assert!(mesh.tri_indices.iter().all(|&i| i < count));
        assert!(mesh.line_indices.iter().all(|&i| i < count));
    }
}
