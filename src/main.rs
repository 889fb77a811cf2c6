use std::fs::File;
use std::io::BufWriter;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use room_assignment::experiment::{ExperimentConfig, ExperimentRunner, sample_problem};
use room_assignment::{GreedyAssignmentSolver, report, server, solve};

#[derive(Parser)]
#[command(name = "room-assignment")]
#[command(about = "Greedy course-to-classroom assignment and its experiments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the four-course example and print the assignment.
    Demo,

    /// Run the scaling and detailed experiments on generated instances.
    Experiment {
        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Course counts (comma-separated)
        #[arg(short, long, value_delimiter = ',', default_value = "10,50,100,200,500,1000")]
        counts: Vec<usize>,
        /// Instances per course count in the detailed run
        #[arg(short, long, default_value = "10")]
        iterations: usize,
        /// Output file for results (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Serve the solver over HTTP.
    Serve {
        #[arg(long, env = "ROOM_ASSIGNMENT_BIND", default_value = "127.0.0.1:8080")]
        bind: SocketAddr,
    },

    /// Count instances the greedy solver misses but the ILP solves.
    #[cfg(feature = "exact")]
    Gap {
        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Course counts (comma-separated); keep these small
        #[arg(short, long, value_delimiter = ',', default_value = "10,20,40")]
        counts: Vec<usize>,
        /// Instances per course count
        #[arg(short, long, default_value = "20")]
        trials: usize,
        /// Rooms generated per course
        #[arg(long, default_value = "0.4")]
        room_ratio: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level.as_str()),
    )
    .init();

    match cli.command {
        Commands::Demo => {
            let (courses, rooms) = sample_problem()?;
            let result = solve(&courses, &rooms);
            println!("=== ROOM ASSIGNMENT PROBLEM SOLVER ===\n");
            print!("{}", report::assignment_listing(&result, &courses, &rooms));
        }

        Commands::Experiment {
            seed,
            counts,
            iterations,
            output,
        } => {
            let config = ExperimentConfig {
                seed,
                course_counts: counts,
                iterations,
                ..ExperimentConfig::default()
            };
            let mut runner = ExperimentRunner::new(config)?;
            let results = runner.run(&GreedyAssignmentSolver)?;

            println!("Scaling:\n{}", report::scaling_table(&results.scaling));
            println!(
                "Detailed ({} iterations):\n{}",
                iterations,
                report::detailed_table(&results.detailed)
            );

            if let Some(path) = output {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
                let file =
                    File::create(&path).with_context(|| format!("creating {}", path.display()))?;
                serde_json::to_writer_pretty(BufWriter::new(file), &results)?;
                info!("Results written to {}", path.display());
            }
        }

        Commands::Serve { bind } => {
            server::run_server(bind).await?;
        }

        #[cfg(feature = "exact")]
        Commands::Gap {
            seed,
            counts,
            trials,
            room_ratio,
        } => {
            use room_assignment::exact::ExactAssignmentSolver;

            let config = ExperimentConfig {
                seed,
                course_counts: counts,
                iterations: trials,
                room_ratio,
                ..ExperimentConfig::default()
            };
            let mut runner = ExperimentRunner::new(config)?;
            let rows = runner.run_gap(&GreedyAssignmentSolver, &ExactAssignmentSolver)?;
            println!("{}", report::gap_table(&rows));
        }
    }

    Ok(())
}
