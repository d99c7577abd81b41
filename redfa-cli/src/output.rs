use crate::pipeline::Compiled;
use crate::RedfaArgs;
use redfa::format::{dot, FormatError, Record};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Format(#[from] FormatError),
}

/// Writes the JSON and DOT files for every stage into a per-regex directory, and renders PNG
/// images through the external `dot` tool unless disabled. Returns the directory used.
pub fn export(compiled: &Compiled, args: &RedfaArgs) -> Result<PathBuf, ExportError> {
    let dir = args.output.join(sanitize_folder_name(&compiled.source));
    fs::create_dir_all(&dir)?;

    let stages = [
        ("nfa", Record::from_nfa(&compiled.nfa), dot::nfa_to_dot(&compiled.nfa)),
        ("dfa", Record::from_dfa(&compiled.dfa), dot::dfa_to_dot(&compiled.dfa)),
        (
            "dfa_min",
            Record::from_dfa(&compiled.minimal),
            dot::dfa_to_dot(&compiled.minimal),
        ),
    ];

    let mut dot_available = true;
    for (stage, record, graph) in stages {
        fs::write(dir.join(format!("{stage}.json")), record.to_json()?)?;
        fs::write(dir.join(format!("{stage}.dot")), &graph)?;
        if !args.no_images && dot_available {
            dot_available = render_png(&graph, &dir.join(format!("{stage}.png")));
        }
    }
    if !args.no_images && !dot_available && !args.quiet {
        println!("  note: could not run 'dot'; install Graphviz to render PNG images");
    }

    Ok(dir)
}

/// Pipes a DOT graph through `dot -Tpng`. Returns false if the renderer is unavailable or
/// fails, which is a degradation, not an error.
fn render_png(graph: &str, path: &PathBuf) -> bool {
    let child = Command::new("dot")
        .arg("-Tpng")
        .arg("-o")
        .arg(path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    let Ok(mut child) = child else {
        return false;
    };
    let Some(stdin) = child.stdin.as_mut() else {
        return false;
    };
    if stdin.write_all(graph.as_bytes()).is_err() {
        return false;
    }
    drop(child.stdin.take());
    matches!(child.wait(), Ok(status) if status.success())
}

/// Maps a regex to a file-system friendly folder name, capped at 40 characters.
fn sanitize_folder_name(source: &str) -> String {
    let mut out = String::new();
    for c in source.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '(' | ')' => out.push(c),
            '*' => out.push_str("_STAR_"),
            '+' => out.push_str("_PLUS_"),
            '?' => out.push_str("_Q_"),
            '|' => out.push_str("_OR_"),
            '.' => out.push_str("_DOT_"),
            '[' => out.push_str("_LB_"),
            ']' => out.push_str("_RB_"),
            '{' => out.push_str("_LCB_"),
            '}' => out.push_str("_RCB_"),
            '^' => out.push_str("_CARET_"),
            '$' => out.push_str("_DOLLAR_"),
            '\\' => out.push_str("_BSLASH_"),
            '/' => out.push_str("_SLASH_"),
            ' ' => out.push('_'),
            _ => out.push('_'),
        }
    }
    out.chars().take(40).collect()
}
