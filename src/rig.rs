//! Scene rig: tweened point lights, ambient halo, and camera micro-motion.
//!
//! Every animated quantity here is a pure function of elapsed time, so the
//! rig is restartable from any clock value and cannot accumulate drift. The
//! light tweens are entries in one `TweenSet` scheduler, cancelled as a
//! group on teardown.

use glam::{Mat4, Vec3};

use crate::params::{CameraSway, HaloParams, LightRigParams, RenderConfig};
use crate::particles::ParticleRng;
use crate::surface::ColorVertex;

/// Sine in-out easing over normalized progress `s` in [0, 1]
fn sine_in_out(s: f32) -> f32 {
    0.5 - 0.5 * (std::f32::consts::PI * s).cos()
}

/// Infinite-repeat ping-pong interpolation between two positions
#[derive(Debug, Clone)]
pub struct Tween {
    from: Vec3,
    to: Vec3,
    period_s: f32,
}

impl Tween {
    pub fn new(from: Vec3, to: Vec3, period_s: f32) -> Self {
        Self { from, to, period_s }
    }

    /// Position at elapsed time `t`: forward over one period, back over the
    /// next, eased sine in-out, forever
    pub fn sample(&self, t: f32) -> Vec3 {
        let cycle = (t / self.period_s).rem_euclid(2.0);
        let s = if cycle < 1.0 { cycle } else { 2.0 - cycle };
        self.from.lerp(self.to, sine_in_out(s))
    }
}

/// Central tween scheduler: owns every light tween and cancels them as a
/// group on teardown
pub struct TweenSet {
    entries: Vec<(usize, Tween)>,
    cancelled: bool,
}

impl TweenSet {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cancelled: false,
        }
    }

    /// Register a tween driving the light at `target` index
    pub fn register(&mut self, target: usize, tween: Tween) {
        self.entries.push((target, tween));
    }

    /// Apply every live tween for time `t`
    pub fn advance(&self, t: f32, lights: &mut [PointLight]) {
        if self.cancelled {
            return;
        }
        for (target, tween) in &self.entries {
            lights[*target].position = tween.sample(t);
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Default for TweenSet {
    fn default() -> Self {
        Self::new()
    }
}

/// One point light as read by the renderer
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Ambient term plus three tweened point lights
pub struct LightRig {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub lights: [PointLight; 3],
    tweens: TweenSet,
}

impl LightRig {
    pub fn new(params: &LightRigParams) -> Self {
        let lights = [0, 1, 2].map(|i| {
            let p = &params.lights[i];
            PointLight {
                position: Vec3::from_array(p.from),
                color: p.color,
                intensity: p.intensity,
            }
        });

        let mut tweens = TweenSet::new();
        for (i, p) in params.lights.iter().enumerate() {
            tweens.register(
                i,
                Tween::new(Vec3::from_array(p.from), Vec3::from_array(p.to), p.period_s),
            );
        }

        Self {
            ambient_color: params.ambient_color,
            ambient_intensity: params.ambient_intensity,
            lights,
            tweens,
        }
    }

    /// Drive light positions from the scene clock
    pub fn advance(&mut self, t: f32) {
        let Self { tweens, lights, .. } = self;
        tweens.advance(t, lights);
    }

    /// Kill the whole tween group; positions freeze where they are
    pub fn cancel_tweens(&mut self) {
        self.tweens.cancel();
    }

    pub fn tweens_cancelled(&self) -> bool {
        self.tweens.is_cancelled()
    }
}

/// Distant ambient point halo rotating at a constant angular rate
pub struct HaloField {
    base: Vec<ColorVertex>,
    pub points: Vec<ColorVertex>,
    spin_rate_rad_per_s: f32,
    dirty: bool,
}

impl HaloField {
    pub fn new(params: &HaloParams) -> Self {
        let mut rng = ParticleRng::new(params.seed);
        let (r_lo, r_hi) = params.radius_range_m;

        let base: Vec<ColorVertex> = (0..params.count)
            .map(|_| {
                let radius = rng.range(r_lo, r_hi);
                let angle = rng.range(0.0, std::f32::consts::TAU);
                let y = params.center_y_m + rng.range(-1.0, 1.0) * params.height_spread_m;
                // Cool dust tint
                let tint = rng.range(0.5, 1.0);
                ColorVertex {
                    position: [radius * angle.cos(), y, radius * angle.sin()],
                    color: [0.6 * tint, 0.55 * tint, tint, 0.35],
                }
            })
            .collect();

        let points = base.clone();
        Self {
            base,
            points,
            spin_rate_rad_per_s: params.spin_rate_rad_per_s,
            dirty: true,
        }
    }

    /// Rotation angle at elapsed time `t` (not integrated)
    pub fn angle_at(&self, t: f32) -> f32 {
        self.spin_rate_rad_per_s * t
    }

    /// Rewrite rotated positions for time `t`
    pub fn update(&mut self, t: f32) {
        let angle = self.angle_at(t);
        let (sin, cos) = angle.sin_cos();
        for (point, base) in self.points.iter_mut().zip(&self.base) {
            let [x, y, z] = base.position;
            point.position = [x * cos - z * sin, y, x * sin + z * cos];
        }
        self.dirty = true;
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

/// Camera with small-amplitude sway, always re-aimed at a fixed target
pub struct CameraRig {
    params: CameraSway,
}

impl CameraRig {
    pub fn new(params: CameraSway) -> Self {
        Self { params }
    }

    /// Eye position at elapsed time `t`
    pub fn eye_at(&self, t: f32) -> Vec3 {
        let p = &self.params;
        let tau = std::f32::consts::TAU;
        Vec3::new(
            p.base_position[0] + (t * p.sway_x_freq_hz * tau).sin() * p.sway_x_amplitude_m,
            p.base_position[1] + (t * p.sway_y_freq_hz * tau).sin() * p.sway_y_amplitude_m,
            p.base_position[2],
        )
    }

    /// View-projection matrix and eye position for time `t`
    pub fn view_proj(&self, t: f32, render_config: &RenderConfig) -> (Mat4, Vec3) {
        let eye = self.eye_at(t);
        let target = Vec3::from_array(self.params.look_at);

        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            render_config.aspect_ratio(),
            render_config.near_plane_m,
            render_config.far_plane_m,
        );

        (proj * view, eye)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_yoyo_endpoints() {
        let from = Vec3::new(-6.0, 4.0, -8.0);
        let to = Vec3::new(8.0, 6.0, -4.0);
        let tween = Tween::new(from, to, 7.0);

        assert!(tween.sample(0.0).distance(from) < 1e-4);
        assert!(tween.sample(7.0).distance(to) < 1e-4);
        // Back where it started after the return leg
        assert!(tween.sample(14.0).distance(from) < 1e-4);
    }

    #[test]
    fn test_tween_stays_on_segment() {
        let from = Vec3::ZERO;
        let to = Vec3::new(10.0, 0.0, 0.0);
        let tween = Tween::new(from, to, 9.0);

        for i in 0..90 {
            let p = tween.sample(i as f32 * 0.37);
            assert!(p.x >= -1e-4 && p.x <= 10.0 + 1e-4);
            assert_eq!(p.y, 0.0);
        }
    }

    #[test]
    fn test_light_rig_advance_and_group_cancel() {
        let mut rig = LightRig::new(&LightRigParams::default());
        let start = rig.lights[0].position;

        rig.advance(3.5);
        let moved = rig.lights[0].position;
        assert!(moved.distance(start) > 1e-3);

        rig.cancel_tweens();
        rig.advance(100.0);
        assert_eq!(rig.lights[0].position, moved);
        assert!(rig.tweens_cancelled());
    }

    #[test]
    fn test_halo_rotation_preserves_radius() {
        let params = HaloParams::default();
        let mut halo = HaloField::new(&params);
        let radii: Vec<f32> = halo
            .points
            .iter()
            .map(|p| (p.position[0].powi(2) + p.position[2].powi(2)).sqrt())
            .collect();

        halo.update(123.0);
        for (point, r0) in halo.points.iter().zip(&radii) {
            let r1 = (point.position[0].powi(2) + point.position[2].powi(2)).sqrt();
            assert!((r1 - r0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_halo_angle_is_linear_in_time() {
        let halo = HaloField::new(&HaloParams::default());
        let a = halo.angle_at(10.0);
        let b = halo.angle_at(20.0);
        assert!((b - 2.0 * a).abs() < 1e-6);
    }

    #[test]
    fn test_camera_sway_is_pure_in_time() {
        let rig = CameraRig::new(CameraSway::default());
        assert_eq!(rig.eye_at(4.2), rig.eye_at(4.2));
        assert_ne!(rig.eye_at(0.0), rig.eye_at(2.0));
    }

    #[test]
    fn test_view_proj_is_valid() {
        let rig = CameraRig::new(CameraSway::default());
        let (view_proj, eye) = rig.view_proj(1.0, &RenderConfig::default());

        assert_ne!(view_proj, Mat4::IDENTITY);
        assert!(eye.x.is_finite() && eye.y.is_finite() && eye.z.is_finite());

        // The look-at target projects to the screen center
        let clip = view_proj * Vec3::from_array(CameraSway::default().look_at).extend(1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
    }
}
