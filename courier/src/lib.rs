//! Route planning for a courier over the roads of a raster map.
//!
//! Road pixels are found by color, the map is overlaid with a lattice of points
//! `step` pixels apart and A* runs over the lattice points that are road (or
//! safely inside a road). Nothing here draws or owns the map, callers hand in
//! anything that implements [`Surface`].

pub mod classify;
pub mod courier;
pub mod find;
pub mod grid;
pub mod plan;
pub mod sampler;
pub mod surface;
pub mod util;

pub use classify::{Classifier, RoadPolicy, Strictness};
pub use courier::Courier;
pub use find::{Graph, NodeReference, PathFinder, PathFinderState, PathResult, SearchStats};
pub use grid::{Point, RoadGraph};
pub use plan::{Path, PlanOutcome, Planner, PlannerConfig};
pub use surface::{Color, SampleError, Surface};

/// Plan with the default configuration. Empty without a surface or a route.
pub fn plan<S: Surface + ?Sized>(start: Point, goal: Point, surface: Option<&S>) -> Path {
    Planner::default().plan(start, goal, surface)
}

/// Pick a random safe point with the default configuration, `(100, 100)` if there is none.
pub fn sample_random_safe<S: Surface + ?Sized>(surface: Option<&S>) -> Point {
    Planner::default().sample_random_safe(surface, &mut rand::thread_rng())
}

pub fn is_safe<S: Surface + ?Sized>(point: Point, surface: &S) -> bool {
    Classifier::default().is_safe(point, surface)
}
