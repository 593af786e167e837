//! Light rig and camera sway parameters.

/// One tweened point light: base and travel endpoints plus loop period
#[derive(Debug, Clone)]
pub struct PointLightParams {
    /// Light color (RGB, linear)
    pub color: [f32; 3],

    /// Intensity multiplier (dimensionless)
    pub intensity: f32,

    /// Tween start position (meters)
    pub from: [f32; 3],

    /// Tween end position (meters)
    pub to: [f32; 3],

    /// Full one-way tween duration (seconds); the loop ping-pongs forever
    pub period_s: f32,
}

/// Scene light rig: one ambient term plus three tweened point lights
#[derive(Debug, Clone)]
pub struct LightRigParams {
    /// Ambient light color (RGB, linear)
    pub ambient_color: [f32; 3],

    /// Ambient intensity (dimensionless)
    pub ambient_intensity: f32,

    /// The three point lights, in draw order
    pub lights: [PointLightParams; 3],
}

impl Default for LightRigParams {
    fn default() -> Self {
        Self {
            ambient_color: [0.25, 0.25, 0.38],
            ambient_intensity: 0.9,
            lights: [
                // Violet key light, 7 s loop
                PointLightParams {
                    color: [0.60, 0.27, 1.00],
                    intensity: 2.5,
                    from: [-6.0, 4.0, -8.0],
                    to: [8.0, 6.0, -4.0],
                    period_s: 7.0,
                },
                // Teal fill light, 9 s loop
                PointLightParams {
                    color: [0.08, 0.95, 0.58],
                    intensity: 2.3,
                    from: [6.0, 4.0, 6.0],
                    to: [-8.0, 6.0, 8.0],
                    period_s: 9.0,
                },
                // Blue back light, 11 s loop
                PointLightParams {
                    color: [0.27, 0.40, 1.00],
                    intensity: 1.8,
                    from: [0.0, 2.0, -16.0],
                    to: [0.0, 8.0, -12.0],
                    period_s: 11.0,
                },
            ],
        }
    }
}

/// Camera micro-motion parameters: small oscillation around a base position,
/// always re-aimed at a fixed look-at target
#[derive(Debug, Clone)]
pub struct CameraSway {
    /// Base eye position (meters)
    pub base_position: [f32; 3],

    /// Horizontal sway amplitude (meters)
    pub sway_x_amplitude_m: f32,

    /// Horizontal sway frequency (Hz)
    pub sway_x_freq_hz: f32,

    /// Vertical sway amplitude (meters)
    pub sway_y_amplitude_m: f32,

    /// Vertical sway frequency (Hz)
    pub sway_y_freq_hz: f32,

    /// Fixed look-at target (meters)
    pub look_at: [f32; 3],
}

impl Default for CameraSway {
    fn default() -> Self {
        Self {
            base_position: [0.0, 6.5, 22.0],
            sway_x_amplitude_m: 1.8,
            sway_x_freq_hz: 0.05,
            sway_y_amplitude_m: 0.7,
            sway_y_freq_hz: 0.08,
            look_at: [0.0, 0.0, 0.0],
        }
    }
}
