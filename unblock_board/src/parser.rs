//! Reading puzzles from their text format.
//!
//! A puzzle file is line oriented, blank lines are ignored:
//!
//! ```txt
//! 6            grid side length
//! 5            number of vehicles
//! 1 h 2 2 3    label, orientation (h/v), length, column, row
//! ...
//! ```
//!
//! Coordinates are 1-based and name the cell of the vehicle's leading end (leftmost for
//! horizontal, topmost for vertical vehicles). The vehicle with label 1 is the goal vehicle, it
//! has to be horizontal and leaves through the right edge of its row.

use std::fs;
use std::path::Path;

use itertools::Itertools;

use crate::{
    GameState, Orientation, Position, PositionEncoding, Puzzle, PuzzleError, Vehicle,
};

/// The label that marks the goal vehicle in puzzle files.
pub const GOAL_LABEL: u8 = 1;

/// Reads a puzzle file and builds the puzzle and its initial state.
pub fn load_puzzle<P: AsRef<Path>>(path: P) -> Result<(Puzzle, GameState), PuzzleError> {
    let contents = fs::read_to_string(path)?;
    puzzle_from_str(&contents)
}

/// Parses puzzle text and builds the puzzle and its initial state.
///
/// Vehicle ids are assigned in ascending label order no matter how the file orders its lines,
/// so equivalent files produce identical puzzles and states.
pub fn puzzle_from_str(input: &str) -> Result<(Puzzle, GameState), PuzzleError> {
    let lines: Vec<(usize, &str)> = input
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    let &(size_line, size_text) = lines
        .get(0)
        .ok_or_else(|| parse_error(1, "missing grid size".to_string()))?;
    let size = size_text
        .parse::<PositionEncoding>()
        .map_err(|_| parse_error(size_line, format!("invalid grid size '{}'", size_text)))?;
    if size == 0 {
        return Err(parse_error(
            size_line,
            "the grid size has to be at least 1".to_string(),
        ));
    }

    let &(count_line, count_text) = lines
        .get(1)
        .ok_or_else(|| parse_error(size_line, "missing vehicle count".to_string()))?;
    let count = count_text
        .parse::<usize>()
        .map_err(|_| parse_error(count_line, format!("invalid vehicle count '{}'", count_text)))?;

    let vehicle_lines = &lines[2.min(lines.len())..];
    if vehicle_lines.len() != count {
        return Err(parse_error(
            count_line,
            format!(
                "expected {} vehicle lines but found {}",
                count,
                vehicle_lines.len()
            ),
        ));
    }

    let entries = vehicle_lines
        .iter()
        .map(|&(line, text)| parse_vehicle_line(line, text))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .sorted_by_key(|&(_, vehicle, _)| vehicle.label())
        .collect::<Vec<_>>();

    let &(goal_line, goal_vehicle, goal_anchor) = entries
        .iter()
        .find(|&&(_, vehicle, _)| vehicle.label() == GOAL_LABEL)
        .ok_or(PuzzleError::MissingGoalVehicle { label: GOAL_LABEL })?;
    if goal_vehicle.orientation() == Orientation::Vertical {
        return Err(parse_error(
            goal_line,
            "the goal vehicle has to be horizontal".to_string(),
        ));
    }
    let exit = Position::new(size - 1, goal_anchor.row());

    let (vehicles, anchors): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .map(|(_, vehicle, anchor)| (vehicle, anchor))
        .unzip();

    let puzzle = Puzzle::new(size, size, vehicles, GOAL_LABEL, exit)?;
    let state = GameState::new(&puzzle, anchors)?;
    Ok((puzzle, state))
}

fn parse_vehicle_line(
    line: usize,
    text: &str,
) -> Result<(usize, Vehicle, Position), PuzzleError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() != 5 {
        return Err(parse_error(
            line,
            format!(
                "expected 'label orientation length column row' but found '{}'",
                text
            ),
        ));
    }

    let label = fields[0]
        .parse::<u8>()
        .map_err(|_| parse_error(line, format!("invalid vehicle label '{}'", fields[0])))?;
    let orientation = match fields[1] {
        "h" => Orientation::Horizontal,
        "v" => Orientation::Vertical,
        other => {
            return Err(parse_error(
                line,
                format!("unknown orientation '{}', expected 'h' or 'v'", other),
            ))
        }
    };
    let length = fields[2]
        .parse::<PositionEncoding>()
        .map_err(|_| parse_error(line, format!("invalid vehicle length '{}'", fields[2])))?;
    let column = parse_coordinate(line, fields[3], "column")?;
    let row = parse_coordinate(line, fields[4], "row")?;

    Ok((
        line,
        Vehicle::new(label, orientation, length),
        Position::new(column - 1, row - 1),
    ))
}

fn parse_coordinate(
    line: usize,
    text: &str,
    what: &str,
) -> Result<PositionEncoding, PuzzleError> {
    let value = text
        .parse::<PositionEncoding>()
        .map_err(|_| parse_error(line, format!("invalid {} '{}'", what, text)))?;
    if value == 0 {
        return Err(parse_error(
            line,
            format!("{} coordinates are 1-based, 0 is not valid", what),
        ));
    }
    Ok(value)
}

fn parse_error(line: usize, message: String) -> PuzzleError {
    PuzzleError::Parse { line, message }
}
