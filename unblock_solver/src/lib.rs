//! Search algorithms for UnblockMe puzzles.
//!
//! Both solvers work on the state graph induced by
//! [`GameState::reachable_states`](unblock_board::GameState::reachable_states):
//! [`BreadthFirst`](BreadthFirst) explores it blindly in order of moves needed, [`AStar`](AStar)
//! orders its frontier by moves so far plus a caller-supplied [`Heuristic`](Heuristic) estimate
//! of the moves remaining. The [`heuristics`](heuristics) module provides the estimates the two
//! searches are compared with.
//!
//! A solve call either produces a [`Solution`](Solution) or reports that the reachable state
//! space contains no solved state. Running out of states is a regular outcome of a well-formed
//! puzzle, not an error, so it is encoded in [`Outcome`](Outcome) instead of an `Err`.

mod a_star;
mod breadth_first;
pub mod heuristics;
mod util;

use getset::{CopyGetters, Getters};
use unblock_board::{GameState, Move, Puzzle};

pub use a_star::AStar;
pub use breadth_first::BreadthFirst;
pub use heuristics::Heuristic;

/// A search algorithm that gets the goal vehicle to the exit.
pub trait Solver {
    /// Searches for a move sequence from `start` to a solved state.
    ///
    /// Every call starts from a clean slate, no search data is carried over from earlier calls.
    fn solve(&mut self, puzzle: &Puzzle, start: GameState) -> Outcome;
}

/// A path from a starting state to a solved state.
///
/// Contains the starting state, the final state and the moves leading from the former to the
/// latter. Consecutive states along the path differ by exactly one slide.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct Path {
    start: GameState,
    end: GameState,
    movements: Vec<Move>,
}

impl Path {
    /// Creates a new path from a starting state, a final state and the moves between them.
    pub fn new(start: GameState, end: GameState, movements: Vec<Move>) -> Self {
        debug_assert!(!movements.is_empty() || start == end);
        Self {
            start,
            end,
            movements,
        }
    }

    /// Creates a new path which ends on the starting state.
    pub fn new_start_on_target(start: GameState) -> Self {
        Self::new(start.clone(), start, Vec::new())
    }

    /// Returns the number of moves in the path.
    pub fn len(&self) -> usize {
        self.movements.len()
    }

    /// Checks if the path has a length of 0.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replays the moves and returns every state along the path, from start to end.
    pub fn states(&self, puzzle: &Puzzle) -> Vec<GameState> {
        let mut states = Vec::with_capacity(self.movements.len() + 1);
        states.push(self.start.clone());
        for &movement in &self.movements {
            let next = states
                .last()
                .expect("the path always contains its starting state")
                .apply(puzzle, movement);
            states.push(next);
        }
        debug_assert_eq!(states.last(), Some(&self.end));
        states
    }
}

/// A successful solve: the path found and how much work finding it took.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct Solution {
    /// The path from the starting state to a solved state.
    #[getset(get = "pub")]
    path: Path,
    /// Number of states the search expanded.
    #[getset(get_copy = "pub")]
    nodes_expanded: usize,
}

impl Solution {
    /// Creates a new solution.
    pub fn new(path: Path, nodes_expanded: usize) -> Self {
        Self {
            path,
            nodes_expanded,
        }
    }

    /// Returns the number of moves in the solution path.
    pub fn move_count(&self) -> usize {
        self.path.len()
    }
}

/// The result of a solve call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The goal vehicle can reach the exit.
    Solved(Solution),
    /// The reachable state space contains no solved state.
    NoSolution {
        /// Number of states the search expanded before it ran out of new ones.
        nodes_expanded: usize,
    },
}

impl Outcome {
    /// Returns `true` if a solution was found.
    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Solved(_))
    }

    /// Returns the solution if one was found.
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Outcome::Solved(solution) => Some(solution),
            Outcome::NoSolution { .. } => None,
        }
    }

    /// Consumes the outcome and returns the solution if one was found.
    pub fn into_solution(self) -> Option<Solution> {
        match self {
            Outcome::Solved(solution) => Some(solution),
            Outcome::NoSolution { .. } => None,
        }
    }

    /// Returns the number of states the search expanded, solved or not.
    pub fn nodes_expanded(&self) -> usize {
        match self {
            Outcome::Solved(solution) => solution.nodes_expanded(),
            Outcome::NoSolution { nodes_expanded } => *nodes_expanded,
        }
    }
}
