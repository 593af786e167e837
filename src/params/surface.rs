//! Wave surface and particle field parameters.

/// Wave surface grid parameters
#[derive(Debug, Clone)]
pub struct SurfaceParams {
    /// Grid segments along X (vertex columns = segs_x + 1)
    pub segs_x: usize,

    /// Grid segments along Z (vertex rows = segs_z + 1)
    pub segs_z: usize,

    /// Total grid extent along X (meters), centered on the origin
    pub extent_x_m: f32,

    /// Total grid extent along Z (meters), centered on the origin
    pub extent_z_m: f32,

    /// Vertical bias of each translucent wire overlay above the solid
    /// surface (meters)
    pub overlay_bias_m: [f32; 2],

    /// Overlay line colors (RGBA, premultiplied alpha baked into vertices)
    pub overlay_color: [[f32; 4]; 2],

    /// Solid surface base color (RGB)
    pub solid_color: [f32; 3],
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            segs_x: 96,
            segs_z: 96,
            extent_x_m: 48.0,
            extent_z_m: 48.0,
            overlay_bias_m: [0.04, 0.09],
            overlay_color: [
                [0.60, 0.27, 1.00, 0.28], // violet wire
                [0.08, 0.95, 0.58, 0.18], // teal wire
            ],
            solid_color: [0.06, 0.07, 0.14],
        }
    }
}

/// Foam particle field parameters
#[derive(Debug, Clone)]
pub struct FoamParams {
    /// Fixed number of foam points
    pub count: usize,

    /// Height above the wave surface (meters)
    pub lift_m: f32,

    /// Point color (RGBA)
    pub color: [f32; 4],

    /// Scatter RNG seed
    pub seed: u32,
}

impl Default for FoamParams {
    fn default() -> Self {
        Self {
            count: 900,
            lift_m: 0.12,
            color: [0.92, 0.96, 1.00, 0.55],
            seed: 0x00F0_0A17,
        }
    }
}

/// Spark particle field parameters
#[derive(Debug, Clone)]
pub struct SparkParams {
    /// Fixed number of spark points
    pub count: usize,

    /// Per-particle bob speed range (rad/s), drawn once at construction
    pub speed_range: (f32, f32),

    /// Vertical bob amplitude (meters)
    pub bob_amplitude_m: f32,

    /// Height above the wave surface before bob (meters)
    pub lift_m: f32,

    /// Scatter RNG seed
    pub seed: u32,
}

impl Default for SparkParams {
    fn default() -> Self {
        Self {
            count: 200,
            speed_range: (0.8, 2.0),
            bob_amplitude_m: 0.35,
            lift_m: 0.6,
            seed: 0x5EED_CAFE,
        }
    }
}

/// Ambient halo point cloud parameters
#[derive(Debug, Clone)]
pub struct HaloParams {
    /// Fixed number of halo points
    pub count: usize,

    /// Ring radius range (meters)
    pub radius_range_m: (f32, f32),

    /// Vertical spread, +/- around halo center (meters)
    pub height_spread_m: f32,

    /// Halo center height (meters)
    pub center_y_m: f32,

    /// Constant rotation rate (rad/s)
    pub spin_rate_rad_per_s: f32,

    /// Scatter RNG seed
    pub seed: u32,
}

impl Default for HaloParams {
    fn default() -> Self {
        Self {
            count: 1400,
            radius_range_m: (20.0, 34.0),
            height_spread_m: 6.0,
            center_y_m: 4.0,
            spin_rate_rad_per_s: 0.02,
            seed: 0x0414_10E5,
        }
    }
}
