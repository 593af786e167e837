//! Wavescape library - animated wave hero scene and portfolio works client

pub mod cli;
pub mod heightfield;
pub mod params;
pub mod particles;
pub mod rendering;
pub mod rig;
pub mod scene;
pub mod surface;
pub mod works;
