//! Command line launcher for the UnblockMe solvers.
//!
//! Solves single puzzles or whole directories with the blind or the informed search, writes one
//! solution file per puzzle and produces a CSV comparing every heuristic on the same puzzle
//! set. Started without a subcommand it drops into an interactive menu.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use clap::{Parser, Subcommand};
use text_io::read;

use unblock_board::{draw_grid, parser, GameState, Move, Puzzle, PuzzleError};
use unblock_solver::{heuristics, AStar, BreadthFirst, Outcome, Solver};

/// Solves UnblockMe puzzles and compares search heuristics.
#[derive(Parser)]
#[command(name = "ubcli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory the puzzle files are read from.
    #[arg(long, default_value = "puzzles")]
    data_dir: PathBuf,

    /// Directory results are written to.
    #[arg(long, default_value = "results")]
    results_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Solve puzzles and write one solution file per puzzle.
    Solve {
        /// Which solver to run: "bfs" or "astar".
        #[arg(long, default_value = "bfs")]
        solver: String,

        /// Heuristic for the astar solver: blocking, manhattan, critical, mobility, two-step.
        #[arg(long)]
        heuristic: Option<String>,

        /// A single puzzle file instead of the whole data directory.
        #[arg(long)]
        puzzle: Option<PathBuf>,

        /// Print the grids and the move list.
        #[arg(short, long)]
        verbose: bool,
    },
    /// Run every heuristic on every puzzle and write a comparison CSV.
    Compare,
}

fn main() {
    let Cli {
        data_dir,
        results_dir,
        command,
    } = Cli::parse();

    match command {
        Some(Command::Solve {
            solver,
            heuristic,
            puzzle,
            verbose,
        }) => run_solve(
            &data_dir,
            &results_dir,
            &solver,
            heuristic.as_deref(),
            puzzle.as_deref(),
            verbose,
        ),
        Some(Command::Compare) => run_compare(&data_dir, &results_dir),
        None => main_menu(&data_dir, &results_dir),
    }
}

fn main_menu(data_dir: &Path, results_dir: &Path) {
    loop {
        println!();
        println!("UnblockMe Puzzle Solver");
        println!("1. Run BFS solver on all puzzles");
        println!("2. Run A* with Blocking Vehicles heuristic");
        println!("3. Run A* with Manhattan Distance heuristic");
        println!("4. Run A* with Critical Path heuristic");
        println!("5. Run A* with Blocking Mobility heuristic");
        println!("6. Run A* with Two-Step Lookahead heuristic");
        println!("7. Compare all heuristics");
        println!("0. Exit");

        let choice: String = read!("{}\n");
        let astar = |key| run_solve(data_dir, results_dir, "astar", Some(key), None, false);
        match choice.trim() {
            "1" => run_solve(data_dir, results_dir, "bfs", None, None, false),
            "2" => astar("blocking"),
            "3" => astar("manhattan"),
            "4" => astar("critical"),
            "5" => astar("mobility"),
            "6" => astar("two-step"),
            "7" => run_compare(data_dir, results_dir),
            "0" => {
                println!("Exiting...");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

/// Runs one solver over the selected puzzles and writes a solution file for each.
fn run_solve(
    data_dir: &Path,
    results_dir: &Path,
    solver_name: &str,
    heuristic: Option<&str>,
    single: Option<&Path>,
    verbose: bool,
) {
    let mut solver = match build_solver(solver_name, heuristic) {
        Ok(solver) => solver,
        Err(message) => {
            eprintln!("{}", message);
            return;
        }
    };

    let files = match single {
        Some(path) => vec![path.to_path_buf()],
        None => puzzle_files(data_dir),
    };
    if files.is_empty() {
        eprintln!(
            "No puzzle files found in {}. Make sure to copy them there.",
            data_dir.display()
        );
        return;
    }

    let folder_name = match heuristic {
        Some(key) => format!("results_with_{}", key),
        None => format!("results_with_{}", solver_name),
    };
    let results_folder = results_dir.join(folder_name);
    if let Err(err) = fs::create_dir_all(&results_folder) {
        eprintln!("Failed to create {}: {}", results_folder.display(), err);
        return;
    }

    let mut unsolved = Vec::new();

    for file in &files {
        let name = file_name(file);
        println!();
        println!("Solving puzzle: {}", name);

        let report = match solve_file(file, solver.as_mut()) {
            Ok(report) => report,
            Err(err) => {
                eprintln!("Skipping {}: {}", name, err);
                continue;
            }
        };

        if verbose {
            print!("{}", draw_grid(&report.puzzle, &report.start));
        }

        let output_path = results_folder.join(format!("solution_{}", name));
        if let Err(err) = fs::write(&output_path, report.to_file_contents(&name)) {
            eprintln!("Failed to write {}: {}", output_path.display(), err);
        } else {
            println!("Solution saved to {}", output_path.display());
        }

        match report.outcome.solution() {
            Some(solution) => {
                println!(
                    "Solution found in {} moves ({} nodes expanded, {:.2} seconds)",
                    solution.move_count(),
                    solution.nodes_expanded(),
                    report.seconds
                );
                if verbose {
                    for (move_n, movement) in solution.path().movements().iter().enumerate() {
                        println!(
                            " {:>2}  {}",
                            move_n + 1,
                            format_move(&report.puzzle, *movement)
                        );
                    }
                    print!("{}", draw_grid(&report.puzzle, solution.path().end()));
                }
            }
            None => {
                println!("No solution found");
                unsolved.push(name);
            }
        }
    }

    println!();
    if unsolved.is_empty() {
        println!("All puzzles were successfully solved!");
    } else {
        println!("The following puzzles could not be solved:");
        for name in unsolved {
            println!("- {}", name);
        }
    }
}

/// Runs every heuristic on every puzzle and writes `heuristics_comparison.csv`.
fn run_compare(data_dir: &Path, results_dir: &Path) {
    let files = puzzle_files(data_dir);
    if files.is_empty() {
        eprintln!(
            "No puzzle files found in {}. Make sure to copy them there.",
            data_dir.display()
        );
        return;
    }

    let mut csv = String::from("puzzle,heuristic,time,nodes,moves\n");
    let mut solved_rows = 0;

    for file in &files {
        let name = file_name(file);
        println!();
        println!("Processing puzzle: {}", name);

        let (puzzle, start) = match parser::load_puzzle(file) {
            Ok(loaded) => loaded,
            Err(err) => {
                eprintln!("Skipping {}: {}", name, err);
                continue;
            }
        };

        for (_, heuristic) in heuristics::registry() {
            let heuristic_name = heuristic.name();
            let mut solver = AStar::new(heuristic);

            let timer = Instant::now();
            let outcome = solver.solve(&puzzle, start.clone());
            let seconds = timer.elapsed().as_secs_f64();

            match outcome.solution() {
                Some(solution) => {
                    println!(
                        "  {}: {} moves in {:.2}s ({} nodes expanded)",
                        heuristic_name,
                        solution.move_count(),
                        seconds,
                        solution.nodes_expanded()
                    );
                    csv.push_str(&format!(
                        "{},{},{:.6},{},{}\n",
                        name,
                        heuristic_name,
                        seconds,
                        solution.nodes_expanded(),
                        solution.move_count()
                    ));
                    solved_rows += 1;
                }
                None => println!("  {}: No solution found", heuristic_name),
            }
        }
    }

    if solved_rows == 0 {
        println!("No results collected. Check puzzle files and heuristics.");
        return;
    }

    if let Err(err) = fs::create_dir_all(results_dir) {
        eprintln!("Failed to create {}: {}", results_dir.display(), err);
        return;
    }
    let csv_path = results_dir.join("heuristics_comparison.csv");
    match fs::write(&csv_path, csv) {
        Ok(()) => println!("Results saved to {}", csv_path.display()),
        Err(err) => eprintln!("Failed to write {}: {}", csv_path.display(), err),
    }
}

/// One solved (or exhausted) puzzle together with its timing.
struct SolveReport {
    puzzle: Puzzle,
    start: GameState,
    outcome: Outcome,
    seconds: f64,
}

impl SolveReport {
    fn to_file_contents(&self, name: &str) -> String {
        let mut contents = format!(
            "Puzzle: {}\nSolved at: {}\nExecution time: {:.2} seconds\nNodes expanded: {}\n",
            name,
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            self.seconds,
            self.outcome.nodes_expanded(),
        );

        match self.outcome.solution() {
            Some(solution) => {
                contents.push_str(&format!("Solution found in {} moves\n", solution.move_count()));
                contents.push_str("Solution path:\n");
                for (move_n, movement) in solution.path().movements().iter().enumerate() {
                    contents.push_str(&format!(
                        "Move {}: {}\n",
                        move_n + 1,
                        format_move(&self.puzzle, *movement)
                    ));
                }
            }
            None => contents.push_str("No solution found\n"),
        }

        contents
    }
}

fn solve_file(path: &Path, solver: &mut dyn Solver) -> Result<SolveReport, PuzzleError> {
    let (puzzle, start) = parser::load_puzzle(path)?;

    let timer = Instant::now();
    let outcome = solver.solve(&puzzle, start.clone());
    let seconds = timer.elapsed().as_secs_f64();

    Ok(SolveReport {
        puzzle,
        start,
        outcome,
        seconds,
    })
}

fn build_solver(name: &str, heuristic: Option<&str>) -> Result<Box<dyn Solver>, String> {
    match name {
        "bfs" => Ok(Box::new(BreadthFirst::new())),
        "astar" => {
            let key = heuristic.ok_or("The astar solver needs --heuristic")?;
            let heuristic = heuristics::by_name(key).ok_or_else(|| {
                format!(
                    "Unknown heuristic '{}'. Available heuristics: {}",
                    key,
                    heuristics::registry()
                        .keys()
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })?;
            Ok(Box::new(AStar::new(heuristic)))
        }
        other => Err(format!("Unknown solver '{}'. Use 'bfs' or 'astar'.", other)),
    }
}

/// Returns all puzzle files in the data directory, sorted by name.
fn puzzle_files(data_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = match fs::read_dir(data_dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map_or(false, |ext| ext == "txt"))
            .collect(),
        Err(_) => Vec::new(),
    };
    files.sort();
    files
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("puzzle")
        .to_string()
}

fn format_move(puzzle: &Puzzle, movement: Move) -> String {
    format!(
        "vehicle {} {} {}",
        puzzle.vehicle(movement.vehicle()).label(),
        movement.direction().to_string().to_lowercase(),
        movement.distance()
    )
}

#[cfg(test)]
mod tests {
    use unblock_board::parser::puzzle_from_str;
    use unblock_board::{Direction, Move};

    use super::format_move;

    #[test]
    fn moves_are_formatted_with_labels() {
        let (puzzle, _) = puzzle_from_str("6\n2\n1 h 2 1 3\n5 v 3 6 1\n").unwrap();
        let tall = puzzle.vehicle_by_label(5).unwrap();
        assert_eq!(
            format_move(&puzzle, Move::new(tall, Direction::Down, 3)),
            "vehicle 5 down 3"
        );
    }
}
