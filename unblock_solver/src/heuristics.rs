//! Estimates of the number of moves left to solve a state.
//!
//! Every heuristic is a pure function of a puzzle and a state. None of them keep memory between
//! calls, so the same value can be reused across states and across solver runs. All of them
//! return 0 on a solved state and never return a negative value. Only
//! [`BlockingVehicles`](BlockingVehicles) is guaranteed to never overestimate, the others trade
//! that guarantee for a stronger pull towards the exit, which is exactly what makes comparing
//! them interesting.

use indexmap::IndexMap;
use unblock_board::{Direction, GameState, Move, Position, Puzzle, VehicleId};

/// An estimate of the number of moves needed to solve a state.
///
/// Implementations have to be pure: no interior state, no negative values and exactly 0 on
/// solved states. [`AStar`](crate::AStar) adds the estimate to the moves already made to order
/// its frontier.
pub trait Heuristic {
    /// Returns the human readable name of the heuristic.
    fn name(&self) -> &'static str;

    /// Estimates the number of moves needed to solve `state`.
    fn estimate(&self, puzzle: &Puzzle, state: &GameState) -> f64;
}

impl<H: Heuristic + ?Sized> Heuristic for Box<H> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn estimate(&self, puzzle: &Puzzle, state: &GameState) -> f64 {
        (**self).estimate(puzzle, state)
    }
}

impl<'a, H: Heuristic + ?Sized> Heuristic for &'a H {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn estimate(&self, puzzle: &Puzzle, state: &GameState) -> f64 {
        (**self).estimate(puzzle, state)
    }
}

/// Counts the vehicles sitting between the goal vehicle and the exit.
///
/// Every one of them has to slide out of the path at least once, so this never overestimates
/// the moves remaining.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingVehicles;

impl Heuristic for BlockingVehicles {
    fn name(&self) -> &'static str {
        "Blocking Vehicles"
    }

    fn estimate(&self, puzzle: &Puzzle, state: &GameState) -> f64 {
        blockers(puzzle, state).len() as f64
    }
}

/// Measures the distance from the goal vehicle's leading edge to the exit cell.
///
/// Distance is counted in cells along the goal vehicle's axis. A single slide can cross several
/// cells, so this may overestimate the number of moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManhattanDistance;

impl Heuristic for ManhattanDistance {
    fn name(&self) -> &'static str {
        "Manhattan Distance"
    }

    fn estimate(&self, puzzle: &Puzzle, state: &GameState) -> f64 {
        exit_path(puzzle, state).len() as f64
    }
}

/// Estimates the moves needed to physically clear the path to the exit.
///
/// A blocker that can leave the path with a single slide costs one move, a blocker that is
/// itself pinned costs two: one for whatever frees it and one for the blocker itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct CriticalPath;

impl Heuristic for CriticalPath {
    fn name(&self) -> &'static str {
        "Critical Path"
    }

    fn estimate(&self, puzzle: &Puzzle, state: &GameState) -> f64 {
        let path = exit_path(puzzle, state);
        let blocking = blockers(puzzle, state);
        if blocking.is_empty() {
            return 0.0;
        }

        let successors = state.reachable_states(puzzle);
        blocking
            .iter()
            .map(|&id| {
                if clearing_moves(puzzle, id, &path, &successors) > 0 {
                    1.0
                } else {
                    2.0
                }
            })
            .sum()
    }
}

/// Weighs every blocker by how constrained it is.
///
/// A blocker with many ways off the path contributes close to one move, a blocker with no way
/// off at all contributes two. The penalty per blocker is `1 + 1 / (1 + free)` where `free`
/// counts the slides taking it off the path.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingMobility;

impl Heuristic for BlockingMobility {
    fn name(&self) -> &'static str {
        "Blocking Mobility"
    }

    fn estimate(&self, puzzle: &Puzzle, state: &GameState) -> f64 {
        let path = exit_path(puzzle, state);
        let blocking = blockers(puzzle, state);
        if blocking.is_empty() {
            return 0.0;
        }

        let successors = state.reachable_states(puzzle);
        blocking
            .iter()
            .map(|&id| {
                let free = clearing_moves(puzzle, id, &path, &successors);
                1.0 + 1.0 / (1.0 + free as f64)
            })
            .sum()
    }
}

/// Looks one move ahead before judging the obstruction.
///
/// Takes the best [`BlockingMobility`](BlockingMobility) value over all one-slide successors
/// and adds the move leading there. This also notices vehicles that block the blockers, one
/// level deep.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoStepLookahead;

impl Heuristic for TwoStepLookahead {
    fn name(&self) -> &'static str {
        "Two-Step Lookahead"
    }

    fn estimate(&self, puzzle: &Puzzle, state: &GameState) -> f64 {
        if state.is_solved(puzzle) {
            return 0.0;
        }

        let best = state
            .reachable_states(puzzle)
            .iter()
            .map(|(successor, _)| BlockingMobility.estimate(puzzle, successor))
            .fold(f64::INFINITY, f64::min);

        if best.is_finite() {
            1.0 + best
        } else {
            // A state without a single legal move, judge it as it stands.
            1.0 + BlockingMobility.estimate(puzzle, state)
        }
    }
}

/// Returns all heuristics keyed by their registry name, in the order comparisons report them.
pub fn registry() -> IndexMap<&'static str, Box<dyn Heuristic>> {
    let mut heuristics: IndexMap<&'static str, Box<dyn Heuristic>> = IndexMap::new();
    heuristics.insert("blocking", Box::new(BlockingVehicles));
    heuristics.insert("manhattan", Box::new(ManhattanDistance));
    heuristics.insert("critical", Box::new(CriticalPath));
    heuristics.insert("mobility", Box::new(BlockingMobility));
    heuristics.insert("two-step", Box::new(TwoStepLookahead));
    heuristics
}

/// Looks up a single heuristic by its registry name.
pub fn by_name(name: &str) -> Option<Box<dyn Heuristic>> {
    registry().swap_remove(name)
}

/// Returns the cells between the goal vehicle's leading edge and the exit, exit included.
///
/// Empty exactly when the goal vehicle covers the exit cell.
fn exit_path(puzzle: &Puzzle, state: &GameState) -> Vec<Position> {
    let goal = puzzle.goal_vehicle();
    let vehicle = puzzle.vehicle(goal);
    let anchor = state.anchor(goal);
    let direction = puzzle.exit_direction();

    let front = match direction {
        Direction::Left | Direction::Up => anchor,
        Direction::Right | Direction::Down => vehicle
            .cells(anchor)
            .last()
            .expect("a vehicle occupies at least one cell"),
    };

    let mut cells = Vec::new();
    let mut cursor = front;
    while cursor != puzzle.exit() {
        match cursor.checked_step(direction, puzzle.rows(), puzzle.columns()) {
            Some(next) => {
                cells.push(next);
                cursor = next;
            }
            None => break,
        }
    }
    cells
}

/// Returns the distinct vehicles sitting on the exit path, in the order they are encountered.
fn blockers(puzzle: &Puzzle, state: &GameState) -> Vec<VehicleId> {
    let occupancy = state.occupancy(puzzle);
    let mut blocking = Vec::new();
    for cell in exit_path(puzzle, state) {
        if let Some(id) = occupancy.vehicle_at(cell) {
            if !blocking.contains(&id) {
                blocking.push(id);
            }
        }
    }
    blocking
}

/// Counts the single slides of `id` that take it completely off the exit path.
fn clearing_moves(
    puzzle: &Puzzle,
    id: VehicleId,
    path: &[Position],
    successors: &[(GameState, Move)],
) -> usize {
    successors
        .iter()
        .filter(|(successor, movement)| {
            movement.vehicle() == id
                && puzzle
                    .vehicle(id)
                    .cells(successor.anchor(id))
                    .all(|cell| !path.contains(&cell))
        })
        .count()
}
