//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (meters, seconds, Hz, etc.)
//! - Documented ranges and meanings
//! - Type safety where possible

mod render;
mod rig;
mod surface;
mod works;

// Re-export all types
pub use render::{CaptureConfig, RenderConfig};
pub use rig::{CameraSway, LightRigParams, PointLightParams};
pub use surface::{FoamParams, HaloParams, SparkParams, SurfaceParams};
pub use works::WorksApiConfig;

/// Aggregated scene construction parameters
#[derive(Debug, Clone, Default)]
pub struct SceneParams {
    pub surface: SurfaceParams,
    pub foam: FoamParams,
    pub sparks: SparkParams,
    pub halo: HaloParams,
    pub lights: LightRigParams,
    pub camera: CameraSway,
}
