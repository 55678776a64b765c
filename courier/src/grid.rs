use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::classify::{Classifier, Strictness};
use crate::find::{Graph, NodeReference};
use crate::surface::{self, Surface};

/// A pixel position, also used as the identity of a graph node
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Point {
        Point {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Wide enough for any pair of `i32` coordinates
    pub fn manhattan_distance(&self, other: &Point) -> u64 {
        u64::from(self.x.abs_diff(other.x)) + u64::from(self.y.abs_diff(other.y))
    }
}

impl NodeReference for Point {}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The lattice of points `step` pixels apart laid over a surface.
///
/// Nothing is precomputed, every expansion samples the surface again.
pub struct RoadGraph<'a, S: Surface + ?Sized> {
    surface: &'a S,
    classifier: &'a Classifier,
    strictness: Strictness,
}

impl<'a, S: Surface + ?Sized> RoadGraph<'a, S> {
    pub fn new(surface: &'a S, classifier: &'a Classifier, strictness: Strictness) -> Self {
        Self {
            surface,
            classifier,
            strictness,
        }
    }

    /// Up to four axis-aligned neighbors one step away that are inside the surface and passable
    pub fn neighbors(&self, point: Point) -> impl Iterator<Item = Point> + 'a {
        let (surface, classifier, strictness) = (self.surface, self.classifier, self.strictness);
        let step = classifier.step() as i32;
        [(-step, 0), (step, 0), (0, -step), (0, step)]
            .into_iter()
            .map(move |(dx, dy)| point.offset(dx, dy))
            .filter(move |p| surface::contains(surface, *p))
            .filter(move |p| classifier.is_passable(*p, surface, strictness))
    }
}

impl<S: Surface + ?Sized> Graph for RoadGraph<'_, S> {
    type Reference = Point;

    fn neighbors_of(&self, node: Point) -> impl Iterator<Item = (Point, usize)> {
        self.neighbors(node).map(|p| (p, 1))
    }

    /// Manhattan distance counted in whole steps along each axis
    fn heuristic(&self, node: Point, goal: Point) -> usize {
        let step = u64::from(self.classifier.step());
        let steps =
            u64::from(node.x.abs_diff(goal.x)) / step + u64::from(node.y.abs_diff(goal.y)) / step;
        usize::try_from(steps).unwrap_or(usize::MAX)
    }
}
