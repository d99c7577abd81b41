use crate::pipeline::Compiled;
use crate::RedfaArgs;

/// Runs each comma-separated string against the minimal DFA, printing the verdict and the
/// visited path. Strings with symbols outside the alphabet are reported and skipped.
pub fn run_strings(compiled: &Compiled, list: &str, args: &RedfaArgs) {
    let strings: Vec<&str> = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if strings.is_empty() {
        return;
    }

    if !args.quiet {
        println!("simulation on the minimal DFA of '{}':", compiled.source);
    }
    for string in strings {
        match compiled.minimal.symbols_of(string) {
            Err(e) => println!("  '{string}': error - {e}"),
            Ok(symbols) => {
                let run = compiled.minimal.simulate(&symbols);
                let verdict = if run.accepted { "ACCEPTED" } else { "REJECTED" };
                let path = run
                    .path
                    .iter()
                    .map(|state| state.as_ref())
                    .collect::<Vec<_>>()
                    .join(" → ");
                println!("  '{string}': {verdict} ({path})");
            }
        }
    }
}
