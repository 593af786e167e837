//! Owning scene context and render-loop lifecycle.
//!
//! All mutable scene state lives in one `Scene` struct handed to
//! attach/tick/detach; there are no module-level globals. The lifecycle is
//! a small state machine; once torn down, every tick is a no-op, so a frame
//! callback already in flight at detach time can never touch dead buffers.

use glam::{Mat4, Vec3};
use log::{debug, warn};

use crate::params::{RenderConfig, SceneParams};
use crate::particles::{FoamField, SparkField};
use crate::rig::{CameraRig, HaloField, LightRig};
use crate::surface::WaveSurface;

/// Longest clock step a single tick may consume (seconds); a stalled frame
/// must not jump the animation
const MAX_STEP_S: f32 = 0.1;

/// Render-loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Before the hosting view attaches
    Uninitialized,
    /// One update per display frame
    Running,
    /// Terminal; reached on detach
    TornDown,
}

/// The complete animated scene
pub struct Scene {
    pub surface: WaveSurface,
    pub foam: FoamField,
    pub sparks: SparkField,
    pub halo: HaloField,
    pub lights: LightRig,
    pub camera: CameraRig,
    render_config: RenderConfig,
    clock_s: f32,
    lifecycle: Lifecycle,
}

impl Scene {
    pub fn new(params: &SceneParams) -> Self {
        Self {
            surface: WaveSurface::new(&params.surface),
            foam: FoamField::new(&params.foam, &params.surface),
            sparks: SparkField::new(&params.sparks, &params.surface),
            halo: HaloField::new(&params.halo),
            lights: LightRig::new(&params.lights),
            camera: CameraRig::new(params.camera.clone()),
            render_config: RenderConfig::default(),
            clock_s: 0.0,
            lifecycle: Lifecycle::Uninitialized,
        }
    }

    /// Begin the render loop against a display surface of the given size.
    ///
    /// Happens at most once; a zero-sized mount target means the scene does
    /// not start. Returns whether the scene is now running.
    pub fn attach(&mut self, width: u32, height: u32) -> bool {
        if self.lifecycle != Lifecycle::Uninitialized {
            return self.lifecycle == Lifecycle::Running;
        }
        if width == 0 || height == 0 {
            warn!("attach skipped: zero-sized mount target ({width}x{height})");
            return false;
        }
        self.render_config.width = width;
        self.render_config.height = height;
        self.lifecycle = Lifecycle::Running;
        debug!("scene attached at {width}x{height}");
        true
    }

    /// Advance the scene by one frame's delta time.
    ///
    /// No-op unless running: the liveness check that guards every buffer
    /// mutation after teardown.
    pub fn tick(&mut self, dt_s: f32) {
        if self.lifecycle != Lifecycle::Running {
            return;
        }
        self.clock_s += dt_s.clamp(0.0, MAX_STEP_S);

        let t = self.clock_s;
        self.surface.update(t);
        self.foam.update(t);
        self.sparks.update(t);
        self.halo.update(t);
        self.lights.advance(t);
    }

    /// Tear the scene down: cancel the tween group and go terminal.
    /// Idempotent; safe to call from any state.
    pub fn detach(&mut self) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        self.lights.cancel_tweens();
        self.lifecycle = Lifecycle::TornDown;
        debug!("scene torn down at t={:.2}s", self.clock_s);
    }

    /// Track a host resize. Updates the projection aspect only; elapsed
    /// time and particle assignments are untouched.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.lifecycle != Lifecycle::Running || width == 0 || height == 0 {
            return;
        }
        self.render_config.width = width;
        self.render_config.height = height;
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub fn clock_s(&self) -> f32 {
        self.clock_s
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render_config
    }

    /// Current view-projection matrix and eye position
    pub fn view_proj(&self) -> (Mat4, Vec3) {
        self.camera.view_proj(self.clock_s, &self.render_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::PointLight;

    fn positions(lights: &[PointLight; 3]) -> [Vec3; 3] {
        [lights[0].position, lights[1].position, lights[2].position]
    }

    #[test]
    fn test_attach_happens_once() {
        let mut scene = Scene::new(&SceneParams::default());
        assert_eq!(scene.lifecycle(), Lifecycle::Uninitialized);

        assert!(scene.attach(800, 600));
        assert!(scene.is_running());

        // Second attach is a no-op but reports the running state
        assert!(scene.attach(100, 100));
        assert_eq!(scene.render_config().width, 800);
    }

    #[test]
    fn test_zero_sized_mount_does_not_start() {
        let mut scene = Scene::new(&SceneParams::default());
        assert!(!scene.attach(0, 600));
        assert!(!scene.is_running());

        scene.tick(0.016);
        assert_eq!(scene.clock_s(), 0.0);
    }

    #[test]
    fn test_tick_advances_clock_with_clamp() {
        let mut scene = Scene::new(&SceneParams::default());
        scene.attach(800, 600);

        scene.tick(0.016);
        assert!((scene.clock_s() - 0.016).abs() < 1e-6);

        // A stalled frame cannot jump the animation
        scene.tick(10.0);
        assert!((scene.clock_s() - 0.116).abs() < 1e-6);
    }

    #[test]
    fn test_tick_after_detach_mutates_nothing() {
        let mut scene = Scene::new(&SceneParams::default());
        scene.attach(800, 600);
        scene.tick(0.5);
        scene.tick(0.1);

        let clock = scene.clock_s();
        let solid: Vec<[f32; 3]> = scene.surface.solid.iter().map(|v| v.position).collect();
        let sparks: Vec<[f32; 3]> = scene.sparks.points.iter().map(|v| v.position).collect();
        let lights = positions(&scene.lights.lights);

        scene.detach();
        assert_eq!(scene.lifecycle(), Lifecycle::TornDown);

        // Simulate a frame callback that was already scheduled at detach time
        scene.tick(0.1);

        assert_eq!(scene.clock_s(), clock);
        assert!(scene
            .surface
            .solid
            .iter()
            .zip(&solid)
            .all(|(v, old)| v.position == *old));
        assert!(scene
            .sparks
            .points
            .iter()
            .zip(&sparks)
            .all(|(v, old)| v.position == *old));
        assert_eq!(positions(&scene.lights.lights), lights);
    }

    #[test]
    fn test_detach_is_idempotent() {
        let mut scene = Scene::new(&SceneParams::default());
        scene.attach(800, 600);
        scene.detach();
        scene.detach();
        assert_eq!(scene.lifecycle(), Lifecycle::TornDown);
        assert!(scene.lights.tweens_cancelled());
    }

    #[test]
    fn test_resize_preserves_clock_and_particles() {
        let mut scene = Scene::new(&SceneParams::default());
        scene.attach(800, 600);
        scene.tick(0.05);
        scene.tick(0.05);

        let clock = scene.clock_s();
        let motion = scene.sparks.motion(7);
        let aspect_before = scene.render_config().aspect_ratio();

        scene.resize(1920, 1080);

        assert_eq!(scene.clock_s(), clock);
        assert_eq!(scene.sparks.motion(7), motion);
        assert_ne!(scene.render_config().aspect_ratio(), aspect_before);
        assert_eq!(scene.render_config().width, 1920);
    }

    #[test]
    fn test_resize_ignored_when_not_running() {
        let mut scene = Scene::new(&SceneParams::default());
        scene.resize(1920, 1080);
        assert_eq!(scene.render_config().width, RenderConfig::default().width);
    }
}
