use std::fmt;

use itertools::Itertools;

use crate::{Direction, Orientation, Position, PositionEncoding, Puzzle, PuzzleError, VehicleId};

/// Which vehicle, if any, occupies each cell of the grid.
///
/// A materialized view of a [`GameState`](GameState), shared by move generation, validation and
/// rendering. Built on demand and thrown away, it is not part of the state itself.
#[derive(Debug, Clone)]
pub struct Occupancy {
    cells: Vec<Option<VehicleId>>,
    columns: usize,
}

impl Occupancy {
    /// Places every vehicle on an empty grid.
    ///
    /// Fails if a vehicle sticks out of the grid or two vehicles meet in a cell, which makes
    /// this the single point where the placement invariants are enforced.
    fn build(puzzle: &Puzzle, anchors: &[Position]) -> Result<Self, PuzzleError> {
        let columns = puzzle.columns() as usize;
        let mut cells = vec![None; puzzle.rows() as usize * columns];

        for id in puzzle.vehicle_ids() {
            let vehicle = puzzle.vehicle(id);
            for cell in vehicle.cells(anchors[id.index()]) {
                if !puzzle.contains(cell) {
                    return Err(PuzzleError::OutOfBounds {
                        label: vehicle.label(),
                    });
                }
                let slot = &mut cells[cell.row() as usize * columns + cell.column() as usize];
                if let Some(other) = *slot {
                    return Err(PuzzleError::Overlap {
                        first: puzzle.vehicle(other).label(),
                        second: vehicle.label(),
                    });
                }
                *slot = Some(id);
            }
        }

        Ok(Self { cells, columns })
    }

    /// Returns the vehicle occupying `pos`, if any.
    ///
    /// `pos` has to lie on the grid the occupancy was built for.
    #[inline(always)]
    pub fn vehicle_at(&self, pos: Position) -> Option<VehicleId> {
        self.cells[pos.row() as usize * self.columns + pos.column() as usize]
    }
}

/// One slide of one vehicle: which vehicle, which direction and how many cells.
///
/// A slide of any distance is a single move, the distance only describes it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    vehicle: VehicleId,
    direction: Direction,
    distance: PositionEncoding,
}

impl Move {
    /// Creates a new move description.
    pub fn new(vehicle: VehicleId, direction: Direction, distance: PositionEncoding) -> Self {
        Self {
            vehicle,
            direction,
            distance,
        }
    }

    /// Returns the id of the vehicle that slides.
    pub fn vehicle(&self) -> VehicleId {
        self.vehicle
    }

    /// Returns the direction of the slide.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the number of cells the vehicle crosses.
    pub fn distance(&self) -> PositionEncoding {
        self.distance
    }
}

/// The movable part of a puzzle: one anchor position per vehicle.
///
/// Anchors are kept in [`VehicleId`](VehicleId) order, so equality and hashing over the anchor
/// table compare exactly the `(id, anchor)` pairs. That makes a `GameState` its own
/// deduplication key during search. States are never mutated, every move produces a new one.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    anchors: Vec<Position>,
}

impl GameState {
    /// Creates a state from one anchor per vehicle, in vehicle table order.
    ///
    /// Rejects anchor tables of the wrong size, vehicles sticking out of the grid, overlapping
    /// vehicles and a goal vehicle whose slide axis misses the exit. Axis alignment is checked
    /// here rather than on the [`Puzzle`](Puzzle) because the cross-axis coordinate of the goal
    /// vehicle is part of the anchor, not the shape. It never changes while solving, so one
    /// check at construction covers every reachable state.
    pub fn new(puzzle: &Puzzle, anchors: Vec<Position>) -> Result<Self, PuzzleError> {
        if anchors.len() != puzzle.vehicles().len() {
            return Err(PuzzleError::VehicleCount {
                expected: puzzle.vehicles().len(),
                found: anchors.len(),
            });
        }
        Occupancy::build(puzzle, &anchors)?;

        let goal = puzzle.vehicle(puzzle.goal_vehicle());
        let goal_anchor = anchors[puzzle.goal_vehicle().index()];
        let aligned = match goal.orientation() {
            Orientation::Horizontal => goal_anchor.row() == puzzle.exit().row(),
            Orientation::Vertical => goal_anchor.column() == puzzle.exit().column(),
        };
        if !aligned {
            return Err(PuzzleError::GoalOffExitAxis {
                label: goal.label(),
            });
        }

        Ok(Self { anchors })
    }

    /// Returns the anchor of the vehicle with the given id.
    #[inline(always)]
    pub fn anchor(&self, id: VehicleId) -> Position {
        self.anchors[id.index()]
    }

    /// Returns the anchors of all vehicles in vehicle table order.
    pub fn anchors(&self) -> &[Position] {
        &self.anchors
    }

    /// Builds the occupancy view of this state.
    pub fn occupancy(&self, puzzle: &Puzzle) -> Occupancy {
        Occupancy::build(puzzle, &self.anchors)
            .expect("a constructed game state always satisfies the placement invariants")
    }

    /// Checks if the goal vehicle has reached the exit cell.
    pub fn is_solved(&self, puzzle: &Puzzle) -> bool {
        let goal = puzzle.vehicle(puzzle.goal_vehicle());
        goal.cells(self.anchor(puzzle.goal_vehicle()))
            .any(|cell| cell == puzzle.exit())
    }

    /// Returns every state reachable with a single slide, paired with the move leading there.
    ///
    /// Vehicles are enumerated in id order, both directions of each vehicle's axis in a fixed
    /// order and slide distances increasing, so the result order is deterministic. A slide
    /// extends cell by cell and every intermediate stop is its own successor, enumeration in a
    /// direction ends at the grid edge or the first occupied cell.
    pub fn reachable_states(&self, puzzle: &Puzzle) -> Vec<(GameState, Move)> {
        let occupancy = self.occupancy(puzzle);
        let mut successors = Vec::new();

        for id in puzzle.vehicle_ids() {
            let vehicle = puzzle.vehicle(id);
            let anchor = self.anchors[id.index()];

            for &direction in vehicle.orientation().directions().iter() {
                // The cell a slide covers next is one past the front of the vehicle in the
                // slide direction. Cells the vehicle vacates lie behind the front, so checking
                // the original occupancy is enough.
                let mut front = match direction {
                    Direction::Left | Direction::Up => anchor,
                    Direction::Right => {
                        Position::new(anchor.column() + vehicle.length() - 1, anchor.row())
                    }
                    Direction::Down => {
                        Position::new(anchor.column(), anchor.row() + vehicle.length() - 1)
                    }
                };

                let mut distance = 0;
                while let Some(next) =
                    front.checked_step(direction, puzzle.rows(), puzzle.columns())
                {
                    if occupancy.vehicle_at(next).is_some() {
                        break;
                    }
                    front = next;
                    distance += 1;

                    let new_anchor = anchor
                        .checked_offset(direction, distance, puzzle.rows(), puzzle.columns())
                        .expect("a slide whose front stays on the grid keeps its anchor on it");
                    let mut anchors = self.anchors.clone();
                    anchors[id.index()] = new_anchor;
                    successors.push((Self { anchors }, Move::new(id, direction, distance)));
                }
            }
        }

        successors
    }

    /// Applies a legal move and returns the resulting state.
    ///
    /// The move has to come from [`reachable_states`](Self::reachable_states) of this state,
    /// collisions are not re-checked in release builds.
    pub fn apply(&self, puzzle: &Puzzle, movement: Move) -> GameState {
        let anchor = self.anchors[movement.vehicle().index()];
        let new_anchor = anchor
            .checked_offset(
                movement.direction(),
                movement.distance(),
                puzzle.rows(),
                puzzle.columns(),
            )
            .expect("a legal move keeps the vehicle on the grid");

        let mut anchors = self.anchors.clone();
        anchors[movement.vehicle().index()] = new_anchor;
        debug_assert!(
            Occupancy::build(puzzle, &anchors).is_ok(),
            "applying a legal move never creates an overlap"
        );
        Self { anchors }
    }
}

impl fmt::Debug for GameState {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "[{}]",
            self.anchors.iter().map(|a| format!("{:?}", a)).join(" | ")
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Direction, GameState, Move, Orientation, Position, Puzzle, PuzzleError, Vehicle,
    };

    /// 6x6 grid, goal vehicle in front of a single short blocker at the exit column.
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

    #[test]
    fn state_creation() {
        blocked_exit_puzzle();
    }

    #[test]
    fn rejects_wrong_anchor_count() {
        let (puzzle, _) = blocked_exit_puzzle();
        let result = GameState::new(&puzzle, vec![Position::new(0, 2)]);
        assert!(matches!(
            result,
            Err(PuzzleError::VehicleCount {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn rejects_out_of_bounds_anchor() {
        let (puzzle, _) = blocked_exit_puzzle();
        let result = GameState::new(&puzzle, vec![Position::new(5, 2), Position::new(4, 4)]);
        assert!(matches!(result, Err(PuzzleError::OutOfBounds { label: 1 })));
    }

    #[test]
    fn rejects_overlapping_vehicles() {
        let (puzzle, _) = blocked_exit_puzzle();
        let result = GameState::new(&puzzle, vec![Position::new(0, 2), Position::new(1, 2)]);
        assert!(matches!(
            result,
            Err(PuzzleError::Overlap {
                first: 1,
                second: 2
            })
        ));
    }

    #[test]
    fn rejects_goal_off_exit_axis() {
        let (puzzle, _) = blocked_exit_puzzle();
        let result = GameState::new(&puzzle, vec![Position::new(0, 1), Position::new(4, 4)]);
        assert!(matches!(
            result,
            Err(PuzzleError::GoalOffExitAxis { label: 1 })
        ));
    }

    #[test]
    fn occupancy_matches_vehicle_cells() {
        let (puzzle, state) = blocked_exit_puzzle();
        let occupancy = state.occupancy(&puzzle);
        let goal = puzzle.vehicle_by_label(1).unwrap();
        let blocker = puzzle.vehicle_by_label(2).unwrap();

        assert_eq!(occupancy.vehicle_at(Position::new(0, 2)), Some(goal));
        assert_eq!(occupancy.vehicle_at(Position::new(1, 2)), Some(goal));
        assert_eq!(occupancy.vehicle_at(Position::new(4, 2)), Some(blocker));
        assert_eq!(occupancy.vehicle_at(Position::new(2, 2)), None);
        assert_eq!(occupancy.vehicle_at(Position::new(5, 2)), None);
    }

    #[test]
    fn reachable_states() {
        let (puzzle, state) = blocked_exit_puzzle();
        let successors = state.reachable_states(&puzzle);

        // Goal vehicle: 2 slides to the right before hitting the blocker. Blocker: 2 up, 3 down.
        assert_eq!(successors.len(), 7);

        let goal = puzzle.vehicle_by_label(1).unwrap();
        let expected = GameState::new(
            &puzzle,
            vec![Position::new(2, 2), Position::new(4, 2)],
        )
        .unwrap();
        assert!(successors.contains(&(expected, Move::new(goal, Direction::Right, 2))));
    }

    #[test]
    fn successors_differ_in_exactly_one_anchor() {
        let (puzzle, state) = blocked_exit_puzzle();
        for (successor, movement) in state.reachable_states(&puzzle) {
            let differing: Vec<_> = puzzle
                .vehicle_ids()
                .filter(|&id| successor.anchor(id) != state.anchor(id))
                .collect();
            assert_eq!(differing, vec![movement.vehicle()]);

            // Every successor still satisfies the placement invariants.
            GameState::new(&puzzle, successor.anchors().to_vec()).unwrap();
        }
    }

    #[test]
    fn enumeration_order_is_deterministic() {
        let (puzzle, state) = blocked_exit_puzzle();
        assert_eq!(state.reachable_states(&puzzle), state.reachable_states(&puzzle));
    }

    #[test]
    fn apply_matches_move_generation() {
        let (puzzle, state) = blocked_exit_puzzle();
        for (successor, movement) in state.reachable_states(&puzzle) {
            assert_eq!(state.apply(&puzzle, movement), successor);
        }
    }

    #[test]
    fn solved_when_goal_covers_exit() {
        let (puzzle, state) = blocked_exit_puzzle();
        assert!(!state.is_solved(&puzzle));

        let solved =
            GameState::new(&puzzle, vec![Position::new(4, 2), Position::new(4, 1)]).unwrap();
        assert!(solved.is_solved(&puzzle));
    }
}
