use std::path::Path as FsPath;

use anyhow::Context as _;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::classify::{Classifier, RoadPolicy, Strictness, DEFAULT_STEP};
use crate::find::{PathFinder, PathFinderState};
use crate::grid::{Point, RoadGraph};
use crate::sampler::{self, FALLBACK_POINT};
use crate::surface::Surface;

/// Waypoints from the first move to the goal. Empty when there is no route
/// or nothing has been planned.
pub type Path = Vec<Point>;

/// Everything that shapes a plan. Missing fields take their defaults when deserializing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// pixels between lattice points, also the radius of the safety test
    pub step: u32,
    pub policy: RoadPolicy,
    /// what the search may enter, random start and goal points are always safe
    pub strictness: Strictness,
    /// keep the start point as the first waypoint
    pub include_start: bool,
    /// returned by the random sampler when nothing is safe
    pub fallback: Point,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            policy: RoadPolicy::default(),
            strictness: Strictness::Safe,
            include_start: false,
            fallback: FALLBACK_POINT,
        }
    }
}

impl PlannerConfig {
    /// Read a JSON config file
    pub fn load(path: impl AsRef<FsPath>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Result of a completed search
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanOutcome {
    NoRoute,
    Found { waypoints: Path, cost: usize },
}

impl PlanOutcome {
    pub fn into_path(self) -> Path {
        match self {
            PlanOutcome::NoRoute => Vec::new(),
            PlanOutcome::Found { waypoints, .. } => waypoints,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Planner {
    config: PlannerConfig,
    classifier: Classifier,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        let classifier = Classifier::new(config.policy, config.step);
        Self { config, classifier }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Run A* from `start` to `goal` over the road lattice of `surface`.
    ///
    /// Only the neighbors of a point are classified, the start itself may lie off-road.
    pub fn search<S: Surface + ?Sized>(&self, start: Point, goal: Point, surface: &S) -> PlanOutcome {
        let graph = RoadGraph::new(surface, &self.classifier, self.config.strictness);
        let (state, stats) = PathFinder::new(start, goal).finish(&graph);

        match state {
            PathFinderState::PathFound(mut result) => {
                if !self.config.include_start {
                    result.path.remove(0);
                }
                info!(
                    "route {} -> {}: {} steps ({})",
                    start, goal, result.total_cost, stats
                );
                PlanOutcome::Found {
                    waypoints: result.path,
                    cost: result.total_cost,
                }
            }
            _ => {
                info!("no route {} -> {} ({})", start, goal, stats);
                PlanOutcome::NoRoute
            }
        }
    }

    /// Waypoints from `start` to `goal`, empty without a surface or a route
    pub fn plan<S: Surface + ?Sized>(&self, start: Point, goal: Point, surface: Option<&S>) -> Path {
        match surface {
            Some(surface) => self.search(start, goal, surface).into_path(),
            None => {
                debug!("no map loaded, nothing to plan");
                Vec::new()
            }
        }
    }

    /// See [`sampler::sample_random_safe`]
    pub fn sample_random_safe<S, R>(&self, surface: Option<&S>, rng: &mut R) -> Point
    where
        S: Surface + ?Sized,
        R: Rng + ?Sized,
    {
        sampler::sample_random_safe(surface, &self.classifier, rng, self.config.fallback)
    }

    /// Every safe lattice point, O(area / step²)
    pub fn safe_points<S: Surface + ?Sized>(&self, surface: &S) -> Vec<Point> {
        sampler::safe_points(surface, &self.classifier)
    }

    pub fn is_safe<S: Surface + ?Sized>(&self, point: Point, surface: &S) -> bool {
        self.classifier.is_safe(point, surface)
    }
}
