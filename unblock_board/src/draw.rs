use itertools::Itertools;

use crate::{GameState, Position, Puzzle};

/// Creates a string representation of a game state.
///
/// Every cell shows the label of the vehicle covering it, empty cells show a dot. One grid row
/// per line.
pub fn draw_grid(puzzle: &Puzzle, state: &GameState) -> String {
    let occupancy = state.occupancy(puzzle);
    let mut output = String::new();

    for row in 0..puzzle.rows() {
        let line = (0..puzzle.columns())
            .map(
                |column| match occupancy.vehicle_at(Position::new(column, row)) {
                    Some(id) => puzzle.vehicle(id).label().to_string(),
                    None => ".".to_string(),
                },
            )
            .join(" ");
        output.push_str(&line);
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::draw_grid;
    use crate::{GameState, Orientation, Position, Puzzle, Vehicle};

    #[test]
    fn draws_labels_and_empty_cells() {
        let vehicles = vec![
            Vehicle::new(1, Orientation::Horizontal, 2),
            Vehicle::new(2, Orientation::Vertical, 3),
        ];
        let puzzle = Puzzle::new(4, 4, vehicles, 1, Position::new(3, 1)).unwrap();
        let state =
            GameState::new(&puzzle, vec![Position::new(0, 1), Position::new(2, 0)]).unwrap();

        let expected = "\
. . 2 .
1 1 2 .
. . 2 .
. . . .
";
        assert_eq!(draw_grid(&puzzle, &state), expected);
    }
}
