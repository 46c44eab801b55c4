use std::cmp::Reverse;

use float_ord::FloatOrd;
use fxhash::FxBuildHasher;
use priority_queue::PriorityQueue;
use unblock_board::{GameState, Puzzle};

use crate::util::{BasicVisitedNode, VisitedNodes};
use crate::{Heuristic, Outcome, Path, Solution, Solver};

/// A solver using the [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) search algorithm
/// to find a path to the exit.
///
/// The frontier is ordered by the number of moves made so far plus the estimate of the given
/// [`Heuristic`](Heuristic). With a heuristic that never overestimates the moves remaining the
/// returned path is a shortest one; with any other heuristic the solver still finds a path,
/// just not necessarily a shortest one.
#[derive(Debug)]
pub struct AStar<H> {
    visited_nodes: VisitedNodes<BasicVisitedNode>,
    heuristic: H,
}

impl<H: Heuristic> AStar<H> {
    /// Creates a new `AStar` solver ordering its frontier with `heuristic`.
    pub fn new(heuristic: H) -> Self {
        Self {
            visited_nodes: VisitedNodes::with_capacity(4096),
            heuristic,
        }
    }

    fn estimate(&self, puzzle: &Puzzle, state: &GameState) -> f64 {
        let estimate = self.heuristic.estimate(puzzle, state);
        debug_assert!(
            estimate >= 0.0,
            "heuristic {} returned a negative estimate",
            self.heuristic.name()
        );
        estimate
    }
}

impl<H: Heuristic> Solver for AStar<H> {
    fn solve(&mut self, puzzle: &Puzzle, start: GameState) -> Outcome {
        // Check if the goal vehicle already sits on the exit.
        if start.is_solved(puzzle) {
            return Outcome::Solved(Solution::new(Path::new_start_on_target(start), 0));
        }

        self.visited_nodes.clear();

        // Create a queue holding the discovered but not yet expanded states.
        let mut open_list =
            PriorityQueue::<GameState, MoveCounter, FxBuildHasher>::with_capacity_and_hasher(
                4096,
                Default::default(),
            );

        let estimate = self.estimate(puzzle, &start);
        open_list.push(start.clone(), MoveCounter::new(0, estimate));

        let mut nodes_expanded = 0;
        let mut best_goal: Option<(GameState, usize)> = None;

        // Expand the search tree.
        while let Some((from_state, prio)) = open_list.pop() {
            if let Some((_, best_moves)) = &best_goal {
                if prio.total() >= *best_moves as f64 {
                    // No queued state can still beat the solution that has been found.
                    break;
                }
            }
            nodes_expanded += 1;

            for (state, movement) in from_state.reachable_states(puzzle) {
                // The start has no visited node, skip it explicitly. A path leading back to it
                // can never be shortest.
                if state == start {
                    continue;
                }

                let moves_from_start = prio.from_start() + 1;

                if self
                    .visited_nodes
                    .add_node(
                        state.clone(),
                        &from_state,
                        moves_from_start,
                        movement,
                        &BasicVisitedNode::new,
                    )
                    .was_discarded()
                {
                    // This state has already been reached with an equal or shorter path.
                    continue;
                }

                if state.is_solved(puzzle) {
                    let improves = best_goal
                        .as_ref()
                        .map_or(true, |&(_, moves)| moves_from_start < moves);
                    if improves {
                        best_goal = Some((state, moves_from_start));
                    }
                    continue;
                }

                let estimate = self.estimate(puzzle, &state);
                open_list.push_increase(state, MoveCounter::new(moves_from_start, estimate));
            }
        }

        match best_goal {
            Some((goal, _)) => Outcome::Solved(Solution::new(
                self.visited_nodes.path_to(&goal),
                nodes_expanded,
            )),
            None => Outcome::NoSolution { nodes_expanded },
        }
    }
}

/// Used to hold the moves needed to reach a state and the estimated number of moves from there
/// to a solved state.
///
/// `MoveCounter`s are ordered from high to low by the estimated total number of moves from the
/// start to a solved state. If the totals are the same, the counter with a lower `from_start`
/// value is considered higher in the ordering.
///
/// ```txt
/// MoveCounter(total, from_start)
///
/// MoveCounter(10, 5) < MoveCounter(10, 3) = MoveCounter(10, 3) < MoveCounter(5, 2)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct MoveCounter {
    // Reordering these fields changes the derived `Ord` and `PartialOrd` implementations.
    total: Reverse<FloatOrd<f64>>,
    from_start: Reverse<usize>,
}

impl MoveCounter {
    pub fn new(from_start: usize, estimate: f64) -> Self {
        Self {
            total: Reverse(FloatOrd(from_start as f64 + estimate)),
            from_start: Reverse(from_start),
        }
    }

    pub fn from_start(&self) -> usize {
        self.from_start.0
    }

    pub fn total(&self) -> f64 {
        (self.total.0).0
    }
}
