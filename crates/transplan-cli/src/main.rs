use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use transplan_solver::{SolveRequest, Solution, Solver, StartMethod};

#[derive(Parser)]
#[command(name = "transplan")]
#[command(about = "Least-cost transportation planning", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a transportation problem from a JSON file
    Solve {
        /// The file containing the problem
        file: PathBuf,
        /// Initial-plan method (min-element, nw-corner); overrides the file
        #[arg(short, long)]
        method: Option<String>,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Check a problem file for shape and capacity errors
    Check {
        /// The file to check
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { file, method, format } => {
            let request = read_request(&file);

            let method = match method {
                None => request.method,
                Some(name) => match StartMethod::from_name(&name) {
                    Some(m) => m,
                    None => {
                        eprintln!(
                            "Unknown method '{}': expected min-element or nw-corner",
                            name
                        );
                        std::process::exit(1);
                    }
                },
            };

            let problem = match request.into_problem() {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Invalid problem: {}", e);
                    std::process::exit(1);
                }
            };

            let solution = match Solver::new().solve(problem, method) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Solve failed: {}", e);
                    std::process::exit(1);
                }
            };

            if format == "json" {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&solution)
                        .unwrap_or_else(|e| format!("Error: {}", e))
                );
            } else {
                print_solution(&solution, method);
            }
        }
        Commands::Check { file } => {
            let request = read_request(&file);

            match request.into_problem() {
                Ok(problem) => {
                    println!("✓ {} is valid", file.display());
                    println!("  {} suppliers", problem.m());
                    println!("  {} customers", problem.n());
                    let imbalance = problem.imbalance();
                    if imbalance == 0.0 {
                        println!("  balanced");
                    } else if imbalance > 0.0 {
                        println!("  supply exceeds demand by {}", imbalance);
                    } else {
                        println!("  demand exceeds supply by {}", -imbalance);
                    }
                }
                Err(e) => {
                    eprintln!("✗ {} has errors:", file.display());
                    eprintln!("  {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn read_request(file: &Path) -> SolveRequest {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };

    match serde_json::from_str(&source) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Invalid problem file: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_solution(solution: &Solution, method: StartMethod) {
    println!("Method: {}", method.name());
    println!("Status: OPTIMAL");
    println!("Total cost: {:.2}", solution.objective);
    println!("Pivots: {}", solution.iterations);
    println!();
    println!("Allocation:");

    let rows = solution.allocation.len();
    let cols = solution.allocation.first().map(|r| r.len()).unwrap_or(0);

    print!("{:>8}", "");
    for j in 0..cols {
        if solution.has_dummy_column && j == cols - 1 {
            print!("{:>10}", "dummy");
        } else {
            print!("{:>10}", format!("C{}", j + 1));
        }
    }
    println!();

    for (i, row) in solution.allocation.iter().enumerate() {
        if solution.has_dummy_row && i == rows - 1 {
            print!("{:>8}", "dummy");
        } else {
            print!("{:>8}", format!("S{}", i + 1));
        }
        for value in row {
            print!("{:>10.2}", value);
        }
        println!();
    }
}
