mod component;
mod config;
mod error;
mod field;
mod geometry;
mod render;
mod runtime;
mod state;
mod types;

pub use component::ParticleNetwork;
pub use config::{ArcConfig, DensityTiers, HighlightMode, NetworkConfig, PulseStyle};
pub use error::NetworkError;
pub use runtime::NetworkRuntime;
