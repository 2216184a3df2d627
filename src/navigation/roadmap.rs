// src/navigation/roadmap.rs
// Grows a collision-free, time-aware random geometric graph (RRG) from the
// origin until a node lands inside the target zone.

// Dependencies
use super::collision::{Blockage, HazardCheck, HazardReport};
use super::planner::{CancelToken, PlanBudget};
use super::search::{self, Adjacency, HopIndex};
use super::{NavigationError, RoadmapConfig};
use crate::geometry::{Cell, Heading, Lattice, MazeLayout, Waypoint};
use indexmap::IndexSet;
use log::{info, trace, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

/// Undirected roadmap over lattice cells.
///
/// Nodes are never removed and every node other than the origin is inserted
/// together with an edge, so the graph stays a single connected component.
#[derive(Debug, Clone)]
pub struct Roadmap {
    lattice: Lattice,
    adjacency: Adjacency,
    hops: HopIndex,
}

impl Roadmap {
    /// Creates a roadmap holding only the origin, which has no neighbours
    pub fn new(lattice: Lattice) -> Self {
        let mut adjacency = Adjacency::new();
        adjacency.insert(Cell::ORIGIN, IndexSet::new());
        Roadmap {
            lattice,
            adjacency,
            hops: HopIndex::new(Cell::ORIGIN),
        }
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Always false: the origin is present from the start
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(IndexSet::len).sum::<usize>() / 2
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.adjacency.contains_key(&cell)
    }

    /// Nodes in insertion order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.adjacency.keys().copied()
    }

    /// Neighbours of `cell` in the order their edges were added
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        self.adjacency.get(&cell).into_iter().flatten().copied()
    }

    pub fn is_linked(&self, a: Cell, b: Cell) -> bool {
        self.adjacency.get(&a).is_some_and(|set| set.contains(&b))
    }

    /// Continuous coordinates of `cell`
    pub fn waypoint(&self, cell: Cell) -> Waypoint {
        self.lattice.waypoint(cell)
    }

    /// Edges between the origin and `cell`
    pub fn hops(&self, cell: Cell) -> Option<usize> {
        self.hops.get(cell)
    }

    /// Adds `cell` with an edge to the existing node `via`.
    ///
    /// Returns false, leaving the graph unchanged, if `cell` already exists
    /// or `via` does not.
    pub fn insert(&mut self, cell: Cell, via: Cell) -> bool {
        if self.contains(cell) || !self.contains(via) {
            return false;
        }
        let mut neighbours = IndexSet::new();
        neighbours.insert(via);
        self.adjacency.insert(cell, neighbours);
        if let Some(set) = self.adjacency.get_mut(&via) {
            set.insert(cell);
        }
        self.hops.attach(cell, via);
        true
    }

    /// Adds the undirected edge `a`–`b` between two existing nodes.
    ///
    /// Returns true only if a new edge was created.
    pub fn link(&mut self, a: Cell, b: Cell) -> bool {
        if a == b || !self.contains(a) || !self.contains(b) || self.is_linked(a, b) {
            return false;
        }
        if let Some(set) = self.adjacency.get_mut(&a) {
            set.insert(b);
        }
        if let Some(set) = self.adjacency.get_mut(&b) {
            set.insert(a);
        }
        self.hops.relax(&self.adjacency, a, b);
        true
    }

    /// Node closest to `(px, py)` under `sqrt(|Δx| + |Δy|)`.
    ///
    /// Ties go to the earliest-inserted node.
    pub fn nearest(&self, px: f64, py: f64) -> Option<(Cell, f64)> {
        let mut best: Option<(Cell, f64)> = None;
        for cell in self.cells() {
            let node = self.waypoint(cell);
            let distance = ((node.x - px).abs() + (node.y - py).abs()).sqrt();
            if best.is_none_or(|(_, shortest)| distance < shortest) {
                best = Some((cell, distance));
            }
        }
        best
    }

    /// Fewest-edge route from the origin to `end`
    pub fn path_to(&self, end: Cell) -> Option<Vec<Cell>> {
        search::bfs(&self.adjacency, Cell::ORIGIN, end)
    }
}

/// Outcome of one growth iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrowthStep {
    /// The sample produced no node; growth continues
    Rejected(Rejection),
    /// A node was added outside the target
    Inserted(Cell),
    /// A node was added inside the target; growth is over
    GoalReached(Cell),
}

/// Why a sample was discarded
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// Nearest node is further than one macro-step away
    TooFar {
        /// Distance to the nearest node
        distance: f64,
    },
    /// The macro-step from the nearest node is not collision-free
    Blocked(MoveFault),
    /// The candidate node already exists
    Duplicate(Cell),
}

/// First micro-step position that invalidated a move
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveFault {
    /// Outside the `[-M, M]²` square
    OutOfBounds(Waypoint),
    /// Inside a static wall
    Wall(Waypoint),
    /// Inside the danger band and blocked at that time
    Hazard(Waypoint, Blockage),
    /// The move starts from a node that is not in the roadmap
    Detached(Cell),
}

/// Resumable roadmap growth: sample, nearest, validate, insert, densify,
/// goal test. Each call to [`RoadmapBuilder::step`] consumes one sample.
pub struct RoadmapBuilder {
    config: RoadmapConfig,
    layout: MazeLayout,
    hazard: Box<dyn HazardCheck>,
    roadmap: Roadmap,
    rng: ChaCha8Rng,
    iterations: u64,
    goal: Option<Cell>,
    last_hazard: Option<HazardReport>,
    started: Option<Instant>,
}

impl RoadmapBuilder {
    /// Creates a builder whose roadmap holds only the layout's origin
    pub fn new(
        config: RoadmapConfig,
        layout: MazeLayout,
        hazard: Box<dyn HazardCheck>,
        seed: u64,
    ) -> Result<Self, NavigationError> {
        config.validate()?;
        let lattice = Lattice::new(layout.origin, config.step_resolution);
        Ok(RoadmapBuilder {
            config,
            layout,
            hazard,
            roadmap: Roadmap::new(lattice),
            rng: ChaCha8Rng::seed_from_u64(seed),
            iterations: 0,
            goal: None,
            last_hazard: None,
            started: None,
        })
    }

    pub fn roadmap(&self) -> &Roadmap {
        &self.roadmap
    }

    pub fn into_roadmap(self) -> Roadmap {
        self.roadmap
    }

    pub fn hazard(&self) -> &dyn HazardCheck {
        self.hazard.as_ref()
    }

    pub fn layout(&self) -> &MazeLayout {
        &self.layout
    }

    /// Samples consumed so far
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// First node found inside the target
    pub fn goal(&self) -> Option<Cell> {
        self.goal
    }

    /// Most recent obstacle footprint that rejected a move
    pub fn last_hazard(&self) -> Option<HazardReport> {
        self.last_hazard
    }

    /// Time index at which `cell` is reached: `hops(cell) · k`
    pub fn step_offset(&self, cell: Cell) -> Option<usize> {
        self.roadmap
            .hops(cell)
            .map(|hops| hops * self.config.step_size)
    }

    /// Walks the `k` micro-step positions of a macro-step from `from` along
    /// `heading` (the start position included, the end point excluded) and
    /// reports the first one that is out of bounds, in a wall, or blocked by
    /// the hazard at its time index.
    pub fn check_move(&self, from: Cell, heading: Heading) -> Result<(), MoveFault> {
        let start_step = self.step_offset(from).ok_or(MoveFault::Detached(from))?;
        let bound = self.config.map_size;

        for s in 0..self.config.step_size {
            let position = self
                .roadmap
                .lattice()
                .waypoint(from.offset(heading, s as i64));
            let (x, y) = (position.x, position.y);

            if x < -bound || x > bound || y < -bound || y > bound {
                return Err(MoveFault::OutOfBounds(position));
            }
            if self.layout.hits_wall(x, y) {
                return Err(MoveFault::Wall(position));
            }
            if self.layout.in_danger_band(x, y) {
                if let Some(blockage) = self.hazard.blocked(x, y, start_step + s) {
                    return Err(MoveFault::Hazard(position, blockage));
                }
            }
        }
        Ok(())
    }

    /// Draws one uniform sample from the map square and grows toward it
    pub fn step(&mut self) -> GrowthStep {
        if let Some(goal) = self.goal {
            return GrowthStep::GoalReached(goal);
        }
        let bound = self.config.map_size;
        let px = self.rng.random_range(-bound..=bound);
        let py = self.rng.random_range(-bound..=bound);
        self.propose(px, py)
    }

    /// Grows toward the sample `(px, py)`
    pub fn propose(&mut self, px: f64, py: f64) -> GrowthStep {
        if let Some(goal) = self.goal {
            return GrowthStep::GoalReached(goal);
        }
        self.iterations += 1;

        let Some((nearest, distance)) = self.roadmap.nearest(px, py) else {
            return GrowthStep::Rejected(Rejection::TooFar {
                distance: f64::INFINITY,
            });
        };
        if distance > self.config.agent_step() {
            return GrowthStep::Rejected(Rejection::TooFar { distance });
        }

        let heading = Heading::toward(
            self.roadmap.waypoint(nearest),
            px,
            py,
            self.config.direction_threshold,
        );
        if let Err(fault) = self.check_move(nearest, heading) {
            self.note_fault(fault);
            return GrowthStep::Rejected(Rejection::Blocked(fault));
        }

        let candidate = nearest.offset(heading, self.config.step_size as i64);
        if !self.roadmap.insert(candidate, nearest) {
            return GrowthStep::Rejected(Rejection::Duplicate(candidate));
        }
        let linked = self.densify(candidate, nearest);

        let node = self.roadmap.waypoint(candidate);
        trace!(
            "Inserted node {} via {} (+{} extra edges, {} nodes)",
            node,
            self.roadmap.waypoint(nearest),
            linked,
            self.roadmap.len()
        );

        if self.layout.target.contains(node.x, node.y) {
            info!(
                "Goal node {} reached after {} samples ({} nodes, {} edges)",
                node,
                self.iterations,
                self.roadmap.len(),
                self.roadmap.edge_count()
            );
            self.goal = Some(candidate);
            return GrowthStep::GoalReached(candidate);
        }
        GrowthStep::Inserted(candidate)
    }

    /// Runs [`RoadmapBuilder::step`] until the goal is reached, the budget
    /// runs out, or `cancel` fires.
    ///
    /// The time limit counts from the first call, so resuming growth does
    /// not restart the clock.
    pub fn grow(
        &mut self,
        budget: &PlanBudget,
        cancel: &CancelToken,
    ) -> Result<Cell, NavigationError> {
        let started = *self.started.get_or_insert_with(Instant::now);
        loop {
            if let Some(goal) = self.goal {
                return Ok(goal);
            }
            if cancel.is_cancelled() {
                warn!("Roadmap growth cancelled after {} samples", self.iterations);
                return Err(NavigationError::Cancelled {
                    iterations: self.iterations,
                });
            }
            if budget.is_exhausted(self.iterations, started.elapsed()) {
                warn!(
                    "Roadmap budget exhausted after {} samples ({} nodes)",
                    self.iterations,
                    self.roadmap.len()
                );
                return Err(NavigationError::NoPath {
                    iterations: self.iterations,
                });
            }
            if let GrowthStep::GoalReached(goal) = self.step() {
                return Ok(goal);
            }
        }
    }

    /// Links `node` to every other node one macro-step away (diagonally or
    /// along an axis) whose move toward `node` is valid. Returns the number
    /// of edges added.
    fn densify(&mut self, node: Cell, parent: Cell) -> usize {
        let k = self.config.step_size as i64;
        let target = self.roadmap.waypoint(node);
        let neighbours: Vec<Cell> = self
            .roadmap
            .cells()
            .filter(|&cell| cell != node && cell != parent)
            .filter(|&cell| {
                let (dx, dy) = ((cell.ix - node.ix).abs(), (cell.iy - node.iy).abs());
                (dx == 0 || dx == k) && (dy == 0 || dy == k)
            })
            .collect();

        let mut linked = 0;
        for cell in neighbours {
            let heading = Heading::toward(
                self.roadmap.waypoint(cell),
                target.x,
                target.y,
                self.config.direction_threshold,
            );
            if cell.offset(heading, k) != node {
                continue;
            }
            match self.check_move(cell, heading) {
                Ok(()) => {
                    if self.roadmap.link(cell, node) {
                        linked += 1;
                    }
                }
                Err(fault) => self.note_fault(fault),
            }
        }
        linked
    }

    fn note_fault(&mut self, fault: MoveFault) {
        if let MoveFault::Hazard(_, Blockage::Obstacle(report)) = fault {
            self.last_hazard = Some(report);
        }
    }
}


// Weaknesses:
// - Nearest-neighbour search and densification scan every node per sample.
// Future improvement: bucket cells by macro-step lattice position for O(1) adjacency lookups.
