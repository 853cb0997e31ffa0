//! RREF CLI — step-by-step row reduction of exact rational matrices
//!
//! Commands:
//!   rref reduce  — reduce a matrix read from a file or stdin
//!   rref random  — reduce a randomly filled matrix
//!   rref help    — show usage

use rand::rngs::StdRng;
use rand::SeedableRng;
use rref_core::reduce::{OpSummary, Operation, Recorder};
use rref_core::{
    OperationTrace, PivotStrategy, Rational, RationalMatrix, ReduceError, ReductionConfig, ReductionSink,
};
use std::env;
use std::io::Read;
use std::process::ExitCode;

fn print_usage() {
    println!(
        r#"
RREF — exact row reduction with a step-by-step trace

Usage: rref <command> [options]

Commands:
  reduce  <file|->            Reduce the matrix in <file> (or stdin)
  random  <rows> <cols>       Reduce a matrix filled with integers 0..=20
  help                        Show this message

Options:
  --ref             Forward elimination only (row-echelon form)
  --sweep           Leftmost-nonzero pivoting instead of max-magnitude
  --augmented       With --sweep, never pivot on the last column
  --json            Print the recorded steps as JSON instead of text
  --config <file>   Read strategy and mode from a JSON config
  --seed <n>        Seed for `random`

Input is one row per line, cells separated by spaces or commas, each an
integer, a decimal or a fraction (e.g. `1 -2.5 3/4`), or a JSON array of rows.

Examples:
  echo "2 4\n1 3" | rref reduce -
  rref reduce system.txt --sweep --augmented
  rref random 3 4 --ref --seed 7
"#
    );
}

/// Flags shared by every command
struct Options {
    config: ReductionConfig,
    json: bool,
    seed: Option<u64>,
    positional: Vec<String>,
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut config = ReductionConfig::default();
    let mut sweep = false;
    let mut augmented = false;
    let mut forward_only = false;
    let mut json = false;
    let mut seed = None;
    let mut positional = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--ref" => forward_only = true,
            "--sweep" => sweep = true,
            "--augmented" => augmented = true,
            "--json" => json = true,
            "--config" => {
                let path = iter.next().ok_or("--config needs a file")?;
                config = ReductionConfig::load(path).map_err(|e| e.to_string())?;
            }
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a number")?;
                seed = Some(value.parse().map_err(|_| format!("invalid seed '{}'", value))?);
            }
            other if other.starts_with("--") => return Err(format!("unknown option {}", other)),
            other => positional.push(other.to_string()),
        }
    }

    if sweep {
        config.strategy = PivotStrategy::LeftmostNonzero { augmented };
    } else if augmented {
        return Err("--augmented only applies with --sweep".into());
    }
    if forward_only {
        config.rref = false;
    }

    Ok(Options {
        config,
        json,
        seed,
        positional,
    })
}

/// Prints each notification as it arrives
struct Printer;

impl Printer {
    fn matrix(m: &RationalMatrix) {
        for line in m.to_string().lines() {
            println!("    {}", line);
        }
        println!();
    }
}

impl ReductionSink for Printer {
    fn matrix_changed(&mut self, snapshot: &RationalMatrix) {
        Self::matrix(snapshot);
    }

    fn swap_performed(&mut self, row_i: usize, row_j: usize) {
        println!("  {}", Operation::Swap { row_i, row_j });
    }

    fn scale_performed(&mut self, row: usize, factor: &Rational) {
        println!(
            "  {}",
            Operation::Scale {
                row,
                factor: factor.clone()
            }
        );
    }

    fn elimination_round_performed(&mut self, trace: &OperationTrace) {
        if trace.is_empty() {
            println!("  (column already clear)");
        }
        for op in trace.iter() {
            println!("  {}", op);
        }
    }
}

fn read_matrix(source: &str) -> Result<RationalMatrix, ReduceError> {
    let text = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(source)?
    };
    if text.trim_start().starts_with('[') {
        RationalMatrix::from_json(&text)
    } else {
        RationalMatrix::parse(&text)
    }
}

fn reduce_and_report(mut matrix: RationalMatrix, opts: &Options) -> Result<(), ReduceError> {
    let mode = if opts.config.rref { "RREF" } else { "REF" };

    if opts.json {
        let mut recorder = Recorder::new();
        recorder.matrix_changed(&matrix);
        opts.config.run(&mut matrix, &mut recorder);
        println!("{}", recorder.to_json()?);
        return Ok(());
    }

    println!("\n  {}x{} matrix, {} via {:?}\n", matrix.rows(), matrix.cols(), mode, opts.config.strategy);
    Printer::matrix(&matrix);

    let mut summary = OpSummary::default();
    let outcome = opts.config.run(&mut matrix, (Printer, &mut summary));

    println!("  Result ({}), rank {}:", mode, outcome.rank());
    Printer::matrix(&matrix);
    println!("  {}", summary);
    Ok(())
}

fn cmd_reduce(opts: &Options) -> Result<(), ReduceError> {
    let Some(source) = opts.positional.first() else {
        eprintln!("Usage: rref reduce <file|-> [options]");
        return Ok(());
    };
    let matrix = read_matrix(source)?;
    reduce_and_report(matrix, opts)
}

fn cmd_random(opts: &Options) -> Result<(), ReduceError> {
    let dims: Vec<usize> = opts.positional.iter().filter_map(|s| s.parse().ok()).collect();
    let [rows, cols] = dims[..] else {
        eprintln!("Usage: rref random <rows> <cols> [options]");
        return Ok(());
    };
    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let matrix = RationalMatrix::random(rows, cols, &mut rng)?;
    reduce_and_report(matrix, opts)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let opts = match parse_options(&args[2..]) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match args[1].as_str() {
        "reduce" => cmd_reduce(&opts),
        "random" => cmd_random(&opts),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("  Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
