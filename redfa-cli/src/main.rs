use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

mod output;
mod pipeline;
mod simulate;

/// Compiles regular expressions into minimal DFAs, exporting every intermediate automaton as
/// JSON and Graphviz DOT, and optionally simulating strings against the result.
#[derive(Debug, Parser)]
#[command(name = "redfa", version, about)]
pub struct RedfaArgs {
    /// Regular expression to process
    #[arg(short, long)]
    pub regex: Option<String>,
    /// File with one regular expression per line ('#' starts a comment)
    #[arg(short, long, conflicts_with = "regex")]
    pub file: Option<PathBuf>,
    /// Directory where the per-regex output folders are created
    #[arg(short, long, default_value = "out")]
    pub output: PathBuf,
    /// Comma-separated strings to run against the minimal DFA
    #[arg(short, long)]
    pub simulate: Option<String>,
    /// Keep the unminimized DFA as the final automaton
    #[arg(long)]
    pub no_minimization: bool,
    /// Do not invoke `dot` to render PNG images
    #[arg(long)]
    pub no_images: bool,
    /// Print the postfix form and per-stage state counts
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
    /// Silence non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

fn main() -> ExitCode {
    let args = RedfaArgs::parse();

    let regexes = match collect_regexes(&args) {
        Ok(regexes) => regexes,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };
    if regexes.is_empty() {
        eprintln!("no regular expressions to process");
        return ExitCode::FAILURE;
    }
    if let Err(e) = fs::create_dir_all(&args.output) {
        eprintln!("cannot create output directory {}: {e}", args.output.display());
        return ExitCode::FAILURE;
    }

    let log = |s: &str| {
        if !args.quiet {
            println!("{s}")
        }
    };
    macro_rules! log {
        ($($t:tt)*) => (log(&format!($($t)*)))
    }

    let mut failures = 0usize;
    let mut compiled = Vec::new();

    for source in &regexes {
        log!("processing regex: {source}");
        match pipeline::compile(source, !args.no_minimization) {
            Ok(result) => {
                if args.verbose {
                    println!("  postfix: {}", result.regex);
                    println!("  NFA: {} states", result.nfa.states().len());
                    println!("  DFA: {} states", result.dfa.states().len());
                    if args.no_minimization {
                        println!("  minimization skipped");
                    } else {
                        println!("  minimal DFA: {} states", result.minimal.states().len());
                    }
                }
                match output::export(&result, &args) {
                    Ok(dir) => {
                        log!("  files written to {}", dir.display());
                        compiled.push(result);
                    }
                    Err(e) => {
                        eprintln!("error exporting '{source}': {e}");
                        failures += 1;
                    }
                }
            }
            Err(e) => {
                eprintln!("error processing '{source}': {e}");
                failures += 1;
            }
        }
    }

    if let Some(list) = args.simulate.as_deref() {
        for result in &compiled {
            simulate::run_strings(result, list, &args);
        }
    }

    log!("");
    log!("processed: {}", regexes.len());
    log!("succeeded: {}", compiled.len());
    log!("failed:    {failures}");
    log!("output in: {}", args.output.display());

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Gathers the expressions to process from `--regex` and/or `--file`. Blank lines and
/// `#`-comments in the file are skipped.
fn collect_regexes(args: &RedfaArgs) -> Result<Vec<String>, String> {
    let mut regexes = Vec::new();
    if let Some(regex) = &args.regex {
        regexes.push(regex.clone());
    }
    if let Some(path) = &args.file {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        regexes.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }
    Ok(regexes)
}
