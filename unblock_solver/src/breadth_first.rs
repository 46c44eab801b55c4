use unblock_board::{GameState, Puzzle};

use crate::util::{BasicVisitedNode, VisitedNodes};
use crate::{Outcome, Path, Solution, Solver};

/// Finds an optimal solution by visiting all reachable game states in order of moves needed to
/// reach them.
#[derive(Debug, Clone)]
pub struct BreadthFirst {
    /// Manages knowledge of visited states.
    visited_nodes: VisitedNodes<BasicVisitedNode>,
}

impl Solver for BreadthFirst {
    fn solve(&mut self, puzzle: &Puzzle, start: GameState) -> Outcome {
        // Check if the goal vehicle already sits on the exit.
        if start.is_solved(puzzle) {
            return Outcome::Solved(Solution::new(Path::new_start_on_target(start), 0));
        }

        self.visited_nodes.clear();
        self.start_search(puzzle, start)
    }
}

impl BreadthFirst {
    /// Create a new solver which uses a breadth first search to find an optimal solution.
    pub fn new() -> Self {
        Self {
            visited_nodes: VisitedNodes::with_capacity(4096),
        }
    }

    fn start_search(&mut self, puzzle: &Puzzle, start: GameState) -> Outcome {
        // States reached with the current number of moves.
        let mut current_level: Vec<GameState> = Vec::with_capacity(64);
        current_level.push(start.clone());
        let mut next_level: Vec<GameState> = Vec::with_capacity(256);

        let mut nodes_expanded = 0;

        // Forward pathing to a solved state. Computes the minimum number of moves and creates a
        // tree of reached states in `visited_nodes`, which is later used in the path creation.
        for move_n in 0.. {
            for state in &current_level {
                nodes_expanded += 1;
                if let Some(reached) =
                    self.expand_state(puzzle, state, &start, move_n, &mut next_level)
                {
                    let path = self.visited_nodes.path_to(&reached);
                    return Outcome::Solved(Solution::new(path, nodes_expanded));
                }
            }

            if next_level.is_empty() {
                // Every reachable state has been expanded without finding a solved one.
                return Outcome::NoSolution { nodes_expanded };
            }
            current_level.clear();
            std::mem::swap(&mut current_level, &mut next_level);
        }

        unreachable!()
    }

    /// Calculates all unseen states reachable from `initial` and adds them to `visited_nodes`
    /// and `next_level`.
    ///
    /// `moves` is the number of moves needed to reach `initial`. Returns a solved state as soon
    /// as one is generated.
    fn expand_state(
        &mut self,
        puzzle: &Puzzle,
        initial: &GameState,
        start: &GameState,
        moves: usize,
        next_level: &mut Vec<GameState>,
    ) -> Option<GameState> {
        for (state, movement) in initial.reachable_states(puzzle) {
            // The start has no visited node, skip it explicitly. A path leading back to it can
            // never be shortest.
            if &state == start {
                continue;
            }

            // Mark the state as visited and continue with the next one if an equal or better
            // path to it already exists.
            if self
                .visited_nodes
                .add_node(
                    state.clone(),
                    initial,
                    moves + 1,
                    movement,
                    &BasicVisitedNode::new,
                )
                .was_discarded()
            {
                continue;
            }

            if state.is_solved(puzzle) {
                return Some(state);
            }

            next_level.push(state);
        }

        None
    }
}

impl Default for BreadthFirst {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::prelude::*;
    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rayon::prelude::*;
    use unblock_board::parser::puzzle_from_str;
    use unblock_board::{GameState, Orientation, Position, Puzzle, Vehicle};

    use super::BreadthFirst;
    use crate::heuristics::BlockingVehicles;
    use crate::{AStar, Outcome, Solver};

    /// 6x6 grid, one short blocker between the goal vehicle and the exit. Solvable in 2 moves.
    fn blocked_exit_puzzle() -> (Puzzle, GameState) {
        let vehicles = vec![
            Vehicle::new(1, Orientation::Horizontal, 2),
            Vehicle::new(2, Orientation::Vertical, 1),
        ];
        let puzzle = Puzzle::new(6, 6, vehicles, 1, Position::new(5, 2)).unwrap();
        let state =
            GameState::new(&puzzle, vec![Position::new(0, 2), Position::new(4, 2)]).unwrap();
        (puzzle, state)
    }

    /// Two blockers in front of the exit, one of them pinned behind the other. Solvable in 4
    /// moves.
    const BEGINNER: &str = "\
6
5
1 h 2 2 3
2 v 3 4 2
3 h 2 5 5
4 v 2 1 5
5 v 3 6 1
";

    /// The middle column is permanently covered, the goal vehicle can never pass it.
    fn walled_in_puzzle() -> (Puzzle, GameState) {
        let vehicles = vec![
            Vehicle::new(1, Orientation::Horizontal, 2),
            Vehicle::new(2, Orientation::Vertical, 3),
            Vehicle::new(3, Orientation::Horizontal, 2),
        ];
        let puzzle = Puzzle::new(4, 4, vehicles, 1, Position::new(3, 1)).unwrap();
        let state = GameState::new(
            &puzzle,
            vec![Position::new(0, 1), Position::new(2, 0), Position::new(0, 3)],
        )
        .unwrap();
        (puzzle, state)
    }

    #[test]
    fn on_target() {
        let (puzzle, _) = blocked_exit_puzzle();
        let start =
            GameState::new(&puzzle, vec![Position::new(4, 2), Position::new(4, 1)]).unwrap();

        let outcome = BreadthFirst::new().solve(&puzzle, start.clone());
        let solution = outcome.solution().expect("a solved start is its own path");
        assert_eq!(solution.move_count(), 0);
        assert_eq!(solution.path().start(), &start);
        assert_eq!(solution.path().end(), &start);
        assert_eq!(solution.nodes_expanded(), 0);
    }

    #[test]
    fn solves_in_two_moves() {
        let (puzzle, start) = blocked_exit_puzzle();

        let outcome = BreadthFirst::new().solve(&puzzle, start.clone());
        let solution = outcome.solution().expect("the blocker can step aside");
        assert_eq!(solution.move_count(), 2);
        assert!(solution.nodes_expanded() > 0);

        let states = solution.path().states(&puzzle);
        assert_eq!(states.first(), Some(&start));
        assert!(states.last().unwrap().is_solved(&puzzle));
    }

    #[test]
    fn solves_beginner_puzzle() {
        let (puzzle, start) = puzzle_from_str(BEGINNER).unwrap();

        let outcome = BreadthFirst::new().solve(&puzzle, start);
        let solution = outcome.solution().expect("the beginner puzzle is solvable");
        assert_eq!(solution.move_count(), 4);
    }

    #[test]
    fn path_states_are_one_move_apart() {
        let (puzzle, start) = puzzle_from_str(BEGINNER).unwrap();

        let outcome = BreadthFirst::new().solve(&puzzle, start);
        let solution = outcome.solution().unwrap();
        let states = solution.path().states(&puzzle);

        for window in states.windows(2) {
            assert!(window[0]
                .reachable_states(&puzzle)
                .iter()
                .any(|(state, _)| state == &window[1]));
        }
    }

    #[test]
    fn reports_no_solution() {
        let (puzzle, start) = walled_in_puzzle();

        match BreadthFirst::new().solve(&puzzle, start) {
            Outcome::NoSolution { nodes_expanded } => {
                // The reachable state space consists of exactly four states.
                assert_eq!(nodes_expanded, 4);
            }
            Outcome::Solved(solution) => {
                panic!("found a {} move path through a wall", solution.move_count())
            }
        }
    }

    #[test]
    fn repeated_solves_are_identical() {
        let (puzzle, start) = puzzle_from_str(BEGINNER).unwrap();

        let mut solver = BreadthFirst::new();
        let first = solver.solve(&puzzle, start.clone());
        let second = solver.solve(&puzzle, start);
        assert_eq!(first, second);
    }

    /// Walks away from the beginner puzzle and back: scrambled states stay solvable because
    /// every slide can be undone, and an admissible A* has to agree with the blind search on
    /// the optimal move count for every one of them.
    #[test]
    fn agrees_with_a_star_on_scrambled_states() {
        let (puzzle, start) = puzzle_from_str(BEGINNER).unwrap();

        let n_scrambles = 48;
        println!(
            "{}> Scrambling {} starting states",
            Local::now(),
            n_scrambles
        );

        let move_counts = (0..n_scrambles as u64)
            .into_par_iter()
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let scrambled = random_walk(&puzzle, start.clone(), 4 + seed as usize % 8, &mut rng);

                let blind = BreadthFirst::new()
                    .solve(&puzzle, scrambled.clone())
                    .into_solution()
                    .expect("scrambled states stay solvable");
                let informed = AStar::new(BlockingVehicles)
                    .solve(&puzzle, scrambled)
                    .into_solution()
                    .expect("scrambled states stay solvable");

                assert_eq!(blind.move_count(), informed.move_count());
                blind.move_count()
            })
            .collect::<Vec<_>>();

        println!(
            "{}> Optimal move counts: {:?}",
            Local::now(),
            move_counts.iter().counts()
        );
    }

    fn random_walk(
        puzzle: &Puzzle,
        start: GameState,
        steps: usize,
        rng: &mut StdRng,
    ) -> GameState {
        let mut state = start;
        for _ in 0..steps {
            let successors = state.reachable_states(puzzle);
            if successors.is_empty() {
                break;
            }
            let pick = rng.gen_range(0..successors.len());
            state = successors.into_iter().nth(pick).unwrap().0;
        }
        state
    }
}
