//! Interactive paper-tear photo effect on wgpu.
//!
//! A drag gesture progressively tears a two-panel photo sheet apart;
//! releasing it either snaps back or throws the halves off-screen, cycles
//! to the next photo, and replays the intro flourish. The crate splits
//! into an animation state machine ([`model::TearModel`]) that turns time
//! and input into an immutable [`model::RenderState`] snapshot, and a
//! shader-parameter pipeline ([`renderer::SheetRenderer`]) that turns
//! snapshots into per-panel GPU parameters and draw calls. The model never
//! touches GPU objects; the renderer never mutates animation phase.

pub mod app;
pub mod config;
pub mod context;
pub mod ease;
pub mod math;
pub mod mesh;
pub mod model;
pub mod renderer;
pub mod rng;
pub mod texture_cache;
pub mod uniforms;

pub use config::{Assets, SheetConfig, TearConfig};
pub use context::GpuContext;
pub use model::{Phase, RenderState, TearModel, ThrowSide};
pub use renderer::SheetRenderer;
pub use rng::{TearRng, UniformRandom};
