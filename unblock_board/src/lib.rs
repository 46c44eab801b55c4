#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

//! Basic components of the UnblockMe sliding-block puzzle.
//!
//! The puzzle is played on a small rectangular grid holding a number of vehicles. Each vehicle
//! is either horizontal or vertical, occupies `length` consecutive cells and can only slide
//! along its own axis. One vehicle is the goal vehicle, which has to reach a fixed exit cell on
//! the edge of the grid. A slide of any distance counts as one move and stops before running
//! into the edge of the grid or another vehicle.
//!
//! The main components are the [`Puzzle`](Puzzle) and the [`GameState`](GameState). A `Puzzle`
//! stores everything that never changes while solving: the grid dimensions, the vehicle shapes
//! and the goal configuration. A `GameState` stores only the anchor positions of the vehicles,
//! which is the part a move changes. Keeping the two apart makes states cheap to copy and
//! compare, which matters because solvers create and deduplicate them by the million.
//!
//! Puzzles are usually read from the text format described in the [`parser`](parser) module.

mod draw;
pub mod parser;
mod positions;
mod state;

use std::{error, fmt, io};

pub use crate::draw::draw_grid;
pub use crate::positions::{Position, PositionEncoding};
pub use crate::state::{GameState, Move, Occupancy};

/// The axis a vehicle is aligned with.
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Returns the two directions a vehicle with this orientation can slide in.
    ///
    /// The order is fixed, it is part of the deterministic move enumeration order.
    pub fn directions(self) -> [Direction; 2] {
        match self {
            Orientation::Horizontal => [Direction::Left, Direction::Right],
            Orientation::Vertical => [Direction::Up, Direction::Down],
        }
    }
}

/// The directions a vehicle can slide in.
///
/// Horizontal vehicles only move `Left` and `Right`, vertical vehicles only `Up` and `Down`.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Up,
    Down,
    Right,
    Left,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let string = format!("{:?}", &self);
        f.pad(&string)
    }
}

/// Identifies a vehicle by its index in the puzzle's vehicle table.
///
/// Ids are dense indices assigned by [`Puzzle::new`](Puzzle::new) in the order the vehicles were
/// given. They key the anchor table of every [`GameState`](GameState) of that puzzle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(u8);

impl VehicleId {
    pub(crate) fn new(index: usize) -> Self {
        VehicleId(index as u8)
    }

    /// Returns the index into the puzzle's vehicle table.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The static shape of a vehicle: its display label, orientation and length.
///
/// The position of a vehicle is not part of its shape, it lives in the
/// [`GameState`](GameState) as the anchor of the vehicle's leading cell (leftmost for
/// horizontal, topmost for vertical vehicles).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Vehicle {
    label: u8,
    orientation: Orientation,
    length: PositionEncoding,
}

impl Vehicle {
    /// Creates a new vehicle shape.
    pub fn new(label: u8, orientation: Orientation, length: PositionEncoding) -> Self {
        Self {
            label,
            orientation,
            length,
        }
    }

    /// Returns the label the vehicle carries in puzzle files and solution output.
    pub fn label(&self) -> u8 {
        self.label
    }

    /// Returns the orientation of the vehicle.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns the number of cells the vehicle occupies.
    pub fn length(&self) -> PositionEncoding {
        self.length
    }

    /// Returns an iterator over the cells the vehicle occupies when anchored at `anchor`.
    ///
    /// The cells are generated without bounds checks, whether they fit on a grid is the
    /// caller's concern.
    pub fn cells(&self, anchor: Position) -> impl Iterator<Item = Position> {
        let orientation = self.orientation;
        (0..self.length).map(move |i| match orientation {
            Orientation::Horizontal => Position::new(anchor.column() + i, anchor.row()),
            Orientation::Vertical => Position::new(anchor.column(), anchor.row() + i),
        })
    }
}

/// A complete puzzle configuration without the movable part.
///
/// Holds the grid dimensions, the vehicle table and the goal configuration. All
/// [`GameState`](GameState)s of a solve run borrow this to interpret their anchor tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    rows: PositionEncoding,
    columns: PositionEncoding,
    vehicles: Vec<Vehicle>,
    goal_vehicle: VehicleId,
    exit: Position,
}

impl Puzzle {
    /// Creates a new puzzle configuration.
    ///
    /// The vehicles keep the given order, their indices become the [`VehicleId`](VehicleId)s.
    /// The goal vehicle is looked up by its `goal_label`. Rejects empty grids, empty vehicle
    /// tables, zero-length vehicles, duplicate labels, an exit outside the grid and a missing
    /// goal label.
    pub fn new(
        rows: PositionEncoding,
        columns: PositionEncoding,
        vehicles: Vec<Vehicle>,
        goal_label: u8,
        exit: Position,
    ) -> Result<Self, PuzzleError> {
        if rows == 0 || columns == 0 {
            return Err(PuzzleError::EmptyGrid);
        }
        if vehicles.is_empty() {
            return Err(PuzzleError::NoVehicles);
        }
        for (i, vehicle) in vehicles.iter().enumerate() {
            if vehicle.length() == 0 {
                return Err(PuzzleError::InvalidLength {
                    label: vehicle.label(),
                });
            }
            if vehicles[..i].iter().any(|v| v.label() == vehicle.label()) {
                return Err(PuzzleError::DuplicateLabel {
                    label: vehicle.label(),
                });
            }
        }
        if exit.row() >= rows || exit.column() >= columns {
            return Err(PuzzleError::ExitOutOfBounds);
        }
        let goal_vehicle = vehicles
            .iter()
            .position(|v| v.label() == goal_label)
            .map(VehicleId::new)
            .ok_or(PuzzleError::MissingGoalVehicle { label: goal_label })?;

        Ok(Self {
            rows,
            columns,
            vehicles,
            goal_vehicle,
            exit,
        })
    }

    /// Returns the number of rows of the grid.
    pub fn rows(&self) -> PositionEncoding {
        self.rows
    }

    /// Returns the number of columns of the grid.
    pub fn columns(&self) -> PositionEncoding {
        self.columns
    }

    /// Returns the vehicle table.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Returns the shape of the vehicle with the given id.
    pub fn vehicle(&self, id: VehicleId) -> &Vehicle {
        &self.vehicles[id.index()]
    }

    /// Returns an iterator over all vehicle ids in their fixed enumeration order.
    pub fn vehicle_ids(&self) -> impl Iterator<Item = VehicleId> {
        (0..self.vehicles.len()).map(VehicleId::new)
    }

    /// Looks up a vehicle id by its label.
    pub fn vehicle_by_label(&self, label: u8) -> Option<VehicleId> {
        self.vehicles
            .iter()
            .position(|v| v.label() == label)
            .map(VehicleId::new)
    }

    /// Returns the id of the goal vehicle.
    pub fn goal_vehicle(&self) -> VehicleId {
        self.goal_vehicle
    }

    /// Returns the exit cell the goal vehicle has to reach.
    pub fn exit(&self) -> Position {
        self.exit
    }

    /// Returns the direction the goal vehicle faces to leave through the exit.
    ///
    /// Derived from where the exit sits relative to the grid: an exit on the first column or
    /// row is left/up facing, everything else right/down facing.
    pub fn exit_direction(&self) -> Direction {
        match self.vehicle(self.goal_vehicle).orientation() {
            Orientation::Horizontal if self.exit.column() == 0 => Direction::Left,
            Orientation::Horizontal => Direction::Right,
            Orientation::Vertical if self.exit.row() == 0 => Direction::Up,
            Orientation::Vertical => Direction::Down,
        }
    }

    /// Checks if `pos` lies on the grid.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row() < self.rows && pos.column() < self.columns
    }
}

/// The ways building a puzzle or a game state can fail.
///
/// All variants are construction-time failures, the solvers never produce one: an unsolvable
/// puzzle is a regular search outcome, not an error.
#[derive(Debug)]
pub enum PuzzleError {
    /// The puzzle text could not be parsed.
    Parse {
        /// 1-based line the problem was found on.
        line: usize,
        /// What was wrong with it.
        message: String,
    },
    /// The grid has zero rows or columns.
    EmptyGrid,
    /// The puzzle contains no vehicles.
    NoVehicles,
    /// A vehicle has length zero.
    InvalidLength {
        /// Label of the offending vehicle.
        label: u8,
    },
    /// Two vehicles share a label.
    DuplicateLabel {
        /// The label that appears more than once.
        label: u8,
    },
    /// No vehicle carries the goal label.
    MissingGoalVehicle {
        /// The label that was expected to exist.
        label: u8,
    },
    /// The exit cell lies outside the grid.
    ExitOutOfBounds,
    /// The anchor table does not match the vehicle table.
    VehicleCount {
        /// Number of vehicles in the puzzle.
        expected: usize,
        /// Number of anchors given.
        found: usize,
    },
    /// A vehicle sticks out of the grid.
    OutOfBounds {
        /// Label of the offending vehicle.
        label: u8,
    },
    /// Two vehicles occupy the same cell.
    Overlap {
        /// Label of the vehicle that was placed first.
        first: u8,
        /// Label of the vehicle that runs into it.
        second: u8,
    },
    /// The goal vehicle's slide axis misses the exit cell.
    GoalOffExitAxis {
        /// Label of the goal vehicle.
        label: u8,
    },
    /// Reading the puzzle file failed.
    Io(io::Error),
}

impl fmt::Display for PuzzleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PuzzleError::Parse { line, message } => write!(f, "line {}: {}", line, message),
            PuzzleError::EmptyGrid => write!(f, "the grid has zero rows or columns"),
            PuzzleError::NoVehicles => write!(f, "the puzzle contains no vehicles"),
            PuzzleError::InvalidLength { label } => {
                write!(f, "vehicle {} has length zero", label)
            }
            PuzzleError::DuplicateLabel { label } => {
                write!(f, "more than one vehicle carries label {}", label)
            }
            PuzzleError::MissingGoalVehicle { label } => {
                write!(f, "no vehicle carries the goal label {}", label)
            }
            PuzzleError::ExitOutOfBounds => write!(f, "the exit cell lies outside the grid"),
            PuzzleError::VehicleCount { expected, found } => write!(
                f,
                "expected anchors for {} vehicles but got {}",
                expected, found
            ),
            PuzzleError::OutOfBounds { label } => {
                write!(f, "vehicle {} sticks out of the grid", label)
            }
            PuzzleError::Overlap { first, second } => {
                write!(f, "vehicle {} overlaps vehicle {}", second, first)
            }
            PuzzleError::GoalOffExitAxis { label } => write!(
                f,
                "goal vehicle {} can never reach the exit on its slide axis",
                label
            ),
            PuzzleError::Io(err) => write!(f, "failed to read the puzzle file: {}", err),
        }
    }
}

impl error::Error for PuzzleError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            PuzzleError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for PuzzleError {
    fn from(err: io::Error) -> Self {
        PuzzleError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Orientation, Position, Puzzle, PuzzleError, Vehicle};

    fn vehicles() -> Vec<Vehicle> {
        vec![
            Vehicle::new(1, Orientation::Horizontal, 2),
            Vehicle::new(2, Orientation::Vertical, 3),
        ]
    }

    #[test]
    fn puzzle_creation() {
        let puzzle = Puzzle::new(6, 6, vehicles(), 1, Position::new(5, 2)).unwrap();
        assert_eq!(puzzle.rows(), 6);
        assert_eq!(puzzle.columns(), 6);
        assert_eq!(puzzle.goal_vehicle(), puzzle.vehicle_by_label(1).unwrap());
        assert_eq!(puzzle.vehicle(puzzle.goal_vehicle()).length(), 2);
    }

    #[test]
    fn rejects_missing_goal_label() {
        let result = Puzzle::new(6, 6, vehicles(), 9, Position::new(5, 2));
        assert!(matches!(
            result,
            Err(PuzzleError::MissingGoalVehicle { label: 9 })
        ));
    }

    #[test]
    fn rejects_duplicate_labels() {
        let mut vehicles = vehicles();
        vehicles.push(Vehicle::new(2, Orientation::Horizontal, 2));
        let result = Puzzle::new(6, 6, vehicles, 1, Position::new(5, 2));
        assert!(matches!(result, Err(PuzzleError::DuplicateLabel { label: 2 })));
    }

    #[test]
    fn rejects_exit_outside_grid() {
        let result = Puzzle::new(6, 6, vehicles(), 1, Position::new(6, 2));
        assert!(matches!(result, Err(PuzzleError::ExitOutOfBounds)));
    }

    #[test]
    fn vehicle_cells_follow_orientation() {
        let horizontal = Vehicle::new(1, Orientation::Horizontal, 3);
        let cells: Vec<_> = horizontal.cells(Position::new(1, 2)).collect();
        assert_eq!(
            cells,
            vec![Position::new(1, 2), Position::new(2, 2), Position::new(3, 2)]
        );

        let vertical = Vehicle::new(2, Orientation::Vertical, 2);
        let cells: Vec<_> = vertical.cells(Position::new(4, 0)).collect();
        assert_eq!(cells, vec![Position::new(4, 0), Position::new(4, 1)]);
    }
}
