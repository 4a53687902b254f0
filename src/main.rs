//! Command-line driver: edits text from stdin and reports the result.

mod ops;

use anyhow::Context;
use clap::Parser;
use gapdoc::text::split_lines;
use gapdoc::{Config, LineModifyStatus, ModifyEvent, TextDocument};
use ops::Op;
use serde_json::json;
use std::cell::RefCell;
use std::io::{self, Read};
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gapdoc", about = "Apply edit operations to text read from stdin", version)]
struct Cli {
    /// Edit operation, repeatable (insert:L:C:TEXT, replace:L:C:L:C:TEXT,
    /// remove:L:C:L:C, delete:L:C, backspace:L:C, indent:L:C:L:C,
    /// unindent:L:C:L:C, undo, redo, save)
    #[arg(short, long = "op", value_name = "OP")]
    ops: Vec<Op>,

    /// Output text, events and line status as JSON
    #[arg(short, long)]
    json: bool,

    /// Prefix each output line with its modify marker
    #[arg(short, long)]
    status: bool,

    /// JSON settings file (defaults come from GAPDOC_* env vars)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Final document state plus every change observed while editing.
struct Report {
    lines: Vec<(String, LineModifyStatus)>,
    events: Vec<ModifyEvent>,
    modified: bool,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gapdoc=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::from_env());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    Config::from_json(&raw).with_context(|| format!("parsing config {}", path.display()))
}

fn run(config: &Config, input: &str, ops: &[Op]) -> anyhow::Result<Report> {
    let mut doc = TextDocument::with_config(config);
    doc.set_document(split_lines(input))?;

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    doc.subscribe(move |event: &ModifyEvent| sink.borrow_mut().push(*event));

    for (index, op) in ops.iter().enumerate() {
        let changed = op
            .apply(&mut doc)
            .with_context(|| format!("operation #{} ({:?})", index + 1, op))?;
        if !changed {
            tracing::info!("Operation #{} changed nothing", index + 1);
        }
    }

    let lines = doc
        .lines()
        .iter()
        .map(|line| (line.text().to_string(), line.modify_status()))
        .collect();
    let events = events.borrow().clone();
    Ok(Report {
        lines,
        events,
        modified: doc.is_modified(),
    })
}

fn status_marker(status: LineModifyStatus) -> char {
    match status {
        LineModifyStatus::None => ' ',
        LineModifyStatus::Modified => '*',
        LineModifyStatus::ModifySaved => '+',
    }
}

fn format_report(report: &Report, json: bool, status: bool) -> anyhow::Result<String> {
    if json {
        let lines: Vec<_> = report
            .lines
            .iter()
            .map(|(text, status)| json!({ "text": text, "status": status }))
            .collect();
        let value = json!({
            "lines": lines,
            "events": report.events,
            "modified": report.modified,
        });
        return serde_json::to_string_pretty(&value).context("encoding report");
    }

    let rows: Vec<String> = report
        .lines
        .iter()
        .map(|(text, line_status)| {
            if status {
                format!("{} {}", status_marker(*line_status), text)
            } else {
                text.clone()
            }
        })
        .collect();
    Ok(rows.join("\n"))
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("reading stdin")?;

    let report = run(&config, &input, &cli.ops)?;
    tracing::debug!(events = report.events.len(), "edits applied");
    println!("{}", format_report(&report, cli.json, cli.status)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapdoc::{ModifyStatus, TextPos, TextRange};

    fn parse_ops(args: &[&str]) -> Vec<Op> {
        let mut argv = vec!["gapdoc"];
        for arg in args {
            argv.push("--op");
            argv.push(arg);
        }
        Cli::try_parse_from(argv).expect("parse args").ops
    }

    #[test]
    fn cli_collects_repeated_ops() {
        let ops = parse_ops(&["insert:0:0:x", "undo"]);
        assert_eq!(
            ops,
            vec![
                Op::Insert {
                    pos: TextPos::TOP,
                    text: "x".to_string()
                },
                Op::Undo
            ]
        );
        assert!(Cli::try_parse_from(["gapdoc", "--op", "bogus"]).is_err());
    }

    #[test]
    fn run_applies_ops_and_records_events() {
        let ops = parse_ops(&["insert:0:3:\\nnew", "indent:0:0:1:0", "undo", "save"]);
        let report = run(&Config::default(), "abc\ndef", &ops).expect("run");

        let texts: Vec<&str> = report.lines.iter().map(|(text, _)| text.as_str()).collect();
        assert_eq!(texts, ["abc", "new", "def"]);
        assert!(!report.modified);
        assert_eq!(report.events.len(), 3);
        assert_eq!(report.events[0].range, TextRange::from_coords(0, 3, 1, 3));
        assert_eq!(report.events[2].status, ModifyStatus::Undo);
    }

    #[test]
    fn run_surfaces_out_of_range_positions() {
        let ops = parse_ops(&["delete:5:0"]);
        let err = run(&Config::default(), "one line", &ops)
            .err()
            .expect("position error");
        assert!(err.to_string().contains("operation #1"));
    }

    #[test]
    fn status_markers_reflect_saved_lines() {
        let ops = parse_ops(&["insert:1:0:>", "save", "insert:0:0:!"]);
        let report = run(&Config::default(), "a\nb\nc", &ops).expect("run");
        let output = format_report(&report, false, true).expect("format");
        assert_eq!(output, "* !a\n+ >b\n  c");
    }

    #[test]
    fn json_report_includes_events() {
        let ops = parse_ops(&["backspace:0:1"]);
        let report = run(&Config::default(), "xy", &ops).expect("run");
        let output = format_report(&report, true, false).expect("format");
        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(value["lines"][0]["text"], "y");
        assert_eq!(value["lines"][0]["status"], "Modified");
        assert_eq!(value["events"][0]["detail"], "RemoveOne");
        assert_eq!(value["modified"], true);
    }
}
