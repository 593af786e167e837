//! Rendering and frame capture configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Display surface width (pixels)
    pub width: u32,

    /// Display surface height (pixels)
    pub height: u32,

    /// Field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (meters)
    pub near_plane_m: f32,

    /// Far clipping plane (meters)
    pub far_plane_m: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fov_degrees: 70.0,
            near_plane_m: 0.1,
            far_plane_m: 1000.0,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Frame capture configuration (fixed-step offline run)
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Duration to capture (seconds)
    pub duration_secs: f32,

    /// Output directory for frames
    pub output_dir: String,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl CaptureConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: "capture".to_string(),
            fps: 60,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil() as usize
    }

    /// Fixed time step per frame (seconds)
    pub fn step_s(&self) -> f32 {
        1.0 / self.fps as f32
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> String {
        format!("{}/frames", self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_frame_math() {
        let config = CaptureConfig::new(2.5);
        assert_eq!(config.total_frames(), 150);
        assert!((config.step_s() - 1.0 / 60.0).abs() < 1e-7);
    }

    #[test]
    fn test_aspect_ratio_guards_zero_height() {
        let config = RenderConfig {
            height: 0,
            ..RenderConfig::default()
        };
        assert!(config.aspect_ratio().is_finite());
    }
}
