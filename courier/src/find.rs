use std::{
    cmp::Ordering,
    collections::BinaryHeap,
    fmt::{Debug, Display},
    hash::Hash,
};

use fxhash::FxHashMap;
use log::debug;

/// Supertrait that collects all the requirements on the NodeReference values
/// Must be copy, hashable and not references (hence 'static)
pub trait NodeReference: Copy + Eq + Hash + Debug + 'static {}

/// A graph that is only ever expanded on demand
pub trait Graph {
    /// The type that can be used to reference nodes in the graph
    type Reference: NodeReference;

    /// Return an iterator over the neighbors of the provided node and the cost required to go there
    fn neighbors_of(&self, node: Self::Reference)
        -> impl Iterator<Item = (Self::Reference, usize)>;

    /// Estimated remaining cost from `node` to `goal`. Must never overestimate.
    fn heuristic(&self, node: Self::Reference, goal: Self::Reference) -> usize;
}

/// The objects that we store in the priority queue
#[derive(Debug)]
struct ToVisit<R> {
    /// cost so far plus heuristic
    estimate: usize,
    cost: usize,
    /// insertion order, breaks ties between equal estimates
    seq: u64,
    point: R,
}

impl<R> Ord for ToVisit<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse for BinaryHeap to be a min-heap, earliest insertion first on ties
        self.estimate
            .cmp(&other.estimate)
            .then_with(|| self.seq.cmp(&other.seq))
            .reverse()
    }
}

impl<R> PartialOrd for ToVisit<R> {
    fn partial_cmp(&self, other: &ToVisit<R>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<R> PartialEq for ToVisit<R> {
    fn eq(&self, other: &ToVisit<R>) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<R> Eq for ToVisit<R> {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisitedItem<R> {
    pub cost: usize,
    pub from: Option<R>,
}

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct PathResult<R> {
    /// Every node from `start` to `goal`, both included
    pub path: Vec<R>,
    pub start: R,
    pub goal: R,
    pub total_cost: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathFinderState<R> {
    Computing,
    NoPathFound,
    PathFound(PathResult<R>),
}

impl<R> PathFinderState<R> {
    pub fn is_done(&self) -> bool {
        !matches!(self, PathFinderState::Computing)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// nodes whose neighbors were generated
    pub expanded: usize,
    /// popped entries that were superseded by a cheaper one
    pub stale: usize,
}

impl Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "expanded={} stale={}", self.expanded, self.stale)
    }
}

/// A* search that can be advanced one node at a time.
///
/// The frontier has no decrease-key: an improved node is pushed again and the
/// outdated entry is dropped when it surfaces (lazy deletion). Nodes with equal
/// estimates come out in the order they were pushed, so repeated searches over
/// the same graph return the same path.
#[derive(Debug)]
pub struct PathFinder<R: NodeReference> {
    start: R,
    goal: R,
    visited: FxHashMap<R, VisitedItem<R>>,
    visit_list: BinaryHeap<ToVisit<R>>,
    next_seq: u64,
    state: PathFinderState<R>,
    stats: SearchStats,
}

impl<R: NodeReference> PathFinder<R> {
    pub fn new(start: R, goal: R) -> Self {
        let mut visited = FxHashMap::default();
        visited.insert(
            start,
            VisitedItem {
                cost: 0,
                from: None,
            },
        );
        Self {
            start,
            goal,
            visited,
            visit_list: BinaryHeap::from([ToVisit {
                // the start is popped first no matter the estimate
                estimate: 0,
                cost: 0,
                seq: 0,
                point: start,
            }]),
            next_seq: 1,
            state: PathFinderState::Computing,
            stats: SearchStats::default(),
        }
    }

    pub fn finish<G: Graph<Reference = R>>(mut self, graph: &G) -> (PathFinderState<R>, SearchStats) {
        while !self.step(graph).is_done() {}
        (self.state, self.stats)
    }

    pub fn step<G: Graph<Reference = R>>(&mut self, graph: &G) -> &PathFinderState<R> {
        if self.state.is_done() {
            return &self.state;
        }

        let Some(visit) = self.visit_list.pop() else {
            debug!(
                "no path from {:?} to {:?} ({})",
                self.start, self.goal, self.stats
            );
            self.state = PathFinderState::NoPathFound;
            return &self.state;
        };

        // a cheaper way to this point was found after this entry was queued
        let best = self.visited.get(&visit.point).map_or(usize::MAX, |v| v.cost);
        if visit.cost > best {
            self.stats.stale += 1;
            return &self.state;
        }

        if visit.point == self.goal {
            let path = self.backtrack();
            debug!(
                "path from {:?} to {:?}: cost={} ({})",
                self.start, self.goal, visit.cost, self.stats
            );
            self.state = PathFinderState::PathFound(PathResult {
                path,
                start: self.start,
                goal: self.goal,
                total_cost: visit.cost,
            });
            return &self.state;
        }

        self.stats.expanded += 1;
        for (point, move_cost) in graph.neighbors_of(visit.point) {
            let cost = visit.cost + move_cost;
            let improved = self.visited.get(&point).map_or(true, |v| cost < v.cost);
            if improved {
                self.visited.insert(
                    point,
                    VisitedItem {
                        cost,
                        from: Some(visit.point),
                    },
                );
                self.visit_list.push(ToVisit {
                    estimate: cost.saturating_add(graph.heuristic(point, self.goal)),
                    cost,
                    seq: self.next_seq,
                    point,
                });
                self.next_seq += 1;
            }
        }

        &self.state
    }

    /// Follow the predecessor links from the goal back to the start
    fn backtrack(&self) -> Vec<R> {
        let mut path = vec![self.goal];
        let mut current = self.goal;
        while let Some(from) = self.visited.get(&current).and_then(|v| v.from) {
            path.push(from);
            current = from;
        }
        path.reverse();
        path
    }

    pub fn state(&self) -> &PathFinderState<R> {
        &self.state
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Best known cost and predecessor for every node reached so far
    pub fn get_visited(&self) -> &FxHashMap<R, VisitedItem<R>> {
        &self.visited
    }

    pub fn start(&self) -> R {
        self.start
    }

    pub fn goal(&self) -> R {
        self.goal
    }
}
