use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use segment_sweep::{count_intersections, read_test_cases};

/// Count the distinct intersection points of every test case in the
/// given files, printing one count per line.
#[derive(Parser)]
struct Cli {
    /// Test-case files to process, in order.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();

    for path in args.inputs.iter() {
        let cases = read_test_cases(path)
            .with_context(|| format!("failed to read test cases from {}", path.display()))?;
        info!("{}: {} test cases", path.display(), cases.len());
        for segments in cases {
            println!("{}", count_intersections(segments));
        }
    }
    Ok(())
}
