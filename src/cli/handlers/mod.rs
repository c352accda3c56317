use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, ConfigError};
use crate::model::config::Config;
use crate::model::document::Document;
use crate::model::transaction::{Edit, EditError, Transaction, UserEvent};
use crate::ops::aggregate::aggregate;
use crate::ops::hierarchy::find_parent;
use crate::ops::propagate::{analyze, apply_outcome};
use crate::ops::workflow::HostContext;
use crate::parse::task_line::parse_task_line;

/// Errors surfaced by CLI commands
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("line {line} is out of range (file has {count} lines)")]
    LineOutOfRange { line: usize, count: usize },
    #[error("line {0} is not a task")]
    NotATask(usize),
    #[error("status must be a single character, got {0:?}")]
    InvalidStatus(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), CliError> {
    let json = cli.json;
    let explicit = cli.config.as_deref().map(Path::new);

    match cli.command {
        Commands::Set(args) => {
            let config = load_config_for(explicit, &args.file)?;
            cmd_set(args, &config, json)
        }
        Commands::Apply(args) => {
            let config = load_config_for(explicit, &args.new)?;
            cmd_apply(args, &config, json)
        }
        Commands::Parents(args) => {
            let config = load_config_for(explicit, &args.file)?;
            cmd_parents(args, &config, json)
        }
    }
}

/// Explicit `-c` file, else the nearest cascade.toml above `file`
fn load_config_for(explicit: Option<&Path>, file: &str) -> Result<Config, CliError> {
    let dir = match Path::new(file).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok(config_io::resolve_config(explicit, &dir)?)
}

fn read_document(path: &str) -> Result<Document, CliError> {
    fs::read_to_string(path)
        .map(Document::from)
        .map_err(|e| CliError::ReadError {
            path: PathBuf::from(path),
            source: e,
        })
}

fn write_document(path: &str, doc: &Document) -> Result<(), CliError> {
    fs::write(path, doc.text()).map_err(|e| CliError::WriteError {
        path: PathBuf::from(path),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_set(args: SetArgs, config: &Config, json: bool) -> Result<(), CliError> {
    let doc = read_document(&args.file)?;
    let status = single_char(&args.status)?;

    let line = doc.line(args.line).ok_or(CliError::LineOutOfRange {
        line: args.line,
        count: doc.line_count(),
    })?;
    let task = parse_task_line(line.text).ok_or(CliError::NotATask(args.line))?;
    let from = line.start + task.status_offset;
    let to = from + task.status.len_utf8();

    let tr = Transaction::from_edits(doc, vec![Edit::new(from, to, status.to_string())])?
        .with_user_event(UserEvent::Typed);
    run(tr, config, json, args.write.then_some(args.file.as_str()))
}

fn cmd_apply(args: ApplyArgs, config: &Config, json: bool) -> Result<(), CliError> {
    let old = read_document(&args.old)?;
    let new = read_document(&args.new)?;
    let tr = Transaction::from_texts(old, new).with_user_event(UserEvent::Typed);
    run(tr, config, json, args.write.then_some(args.new.as_str()))
}

/// Push a transaction through the engine and report or persist the result
fn run(tr: Transaction, config: &Config, json: bool, write_to: Option<&str>) -> Result<(), CliError> {
    let ctx = HostContext::plain(config.indent);
    let outcome = analyze(&tr, &ctx, &config.policy);
    let committed = apply_outcome(tr, &outcome).committed_doc();

    if let Some(path) = write_to {
        write_document(path, &committed)?;
    }

    if json {
        let out = PropagationJson {
            outcome: &outcome,
            document: committed.text(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if write_to.is_some() {
        println!("{}", format_outcome(&outcome));
    } else {
        print!("{}", committed.text());
        if !committed.text().ends_with('\n') {
            println!();
        }
        eprintln!("{}", format_outcome(&outcome));
    }
    Ok(())
}

fn cmd_parents(args: ParentsArgs, config: &Config, json: bool) -> Result<(), CliError> {
    let doc = read_document(&args.file)?;
    let ctx = HostContext::plain(config.indent);

    let mut rows = Vec::new();
    for line in doc.lines() {
        let Some(task) = parse_task_line(line.text) else {
            continue;
        };
        let summary = aggregate(&doc, line.number, task.indent.width, &ctx, &config.policy);
        let node = TaskNodeJson {
            line: line.number,
            status: task.status,
            indent: task.indent.width,
            parent: find_parent(&doc, line.number).map(|p| p.line_number),
            children: summary.has_any_child.then_some(summary),
        };
        rows.push((node, line.text));
    }

    if json {
        let nodes: Vec<&TaskNodeJson> = rows.iter().map(|(node, _)| node).collect();
        println!("{}", serde_json::to_string_pretty(&nodes)?);
    } else {
        for (node, text) in &rows {
            println!("{}", format_task_node(node, text));
        }
    }
    Ok(())
}

fn single_char(s: &str) -> Result<char, CliError> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(CliError::InvalidStatus(s.to_string())),
    }
}
