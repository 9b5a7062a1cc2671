#![warn(clippy::all, rust_2018_idioms)]

mod app;
pub mod draw;
pub mod layout;
pub mod physics;
pub mod terrain;

pub use app::ShuttleTerrainApp;
pub use terrain::{FrameContext, Terrain, TerrainConfig, TerrainStats};
