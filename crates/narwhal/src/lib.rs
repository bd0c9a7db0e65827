#![forbid(unsafe_code)]

//! Headless bubble/force chart layout.
//!
//! Every item has a target position and size. Items start near their targets and, frame by
//! frame, are pulled toward them by a decaying "gravity" while overlapping items are pushed
//! apart with the help of a per-frame quadtree. Rendering is left to the caller: read
//! [`Simulation::items`] (or the `tick_update` hook) after each frame.

pub mod accessor;
pub mod collide;
pub mod config;
pub mod driver;
pub mod error;
pub mod gravity;
pub mod item;
pub mod quadtree;
mod rng;
pub mod simulation;

use serde::{Deserialize, Serialize};

pub use accessor::{Accessor, GravityResponse};
pub use collide::CollisionResolver;
pub use config::{ChartConfig, ChartOptions, Shape, TickHook};
pub use driver::{Driver, DriverOptions};
pub use error::{Error, Result};
pub use gravity::GravityField;
pub use item::{Item, Placement};
pub use quadtree::{Bounds, Quad, Quadtree};
pub use simulation::Simulation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub width: f64,
    pub height: f64,
    /// One entry per input record, in input order.
    pub placements: Vec<Placement>,
    pub ticks: usize,
}

/// Headless layout entry point: runs a simulation until its driver ends.
pub fn layout<T>(
    data: impl IntoIterator<Item = T>,
    config: &ChartConfig<T>,
) -> Result<LayoutResult> {
    let mut sim = Simulation::new(data, config)?;
    let ticks = sim.run();
    let (width, height) = sim.size();
    Ok(LayoutResult {
        width,
        height,
        placements: sim.placements(),
        ticks,
    })
}
