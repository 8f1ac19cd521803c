//! Replay harness: drives a panel bridge from a JSON-lines event script.
//!
//! Each script line is one event, in arrival order:
//!
//! - `{"insert": {"tag": "div", "classes": […], "children": […]}}` — insert
//!   an element into the document and deliver the mutation notification
//! - `{"text": "…"}` — deliver a text-node insertion notification
//! - `{"host": {…}}` — deliver an inbound host-process message
//! - `{"activate": "Template name"}` — click the action control of a
//!   rendered entry
//!
//! Outbound host traffic is printed as `-> {json}` lines; the final panel
//! outline (or the whole document with `--document`) follows on stdout.
//! Logs go to stderr, filtered by `RUST_LOG`.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use serde_json::Value;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use steplib_panel::{
    config, Document, DomNode, HostPort, NodeSpec, OutboundMessage, PageEvent, PanelBridge,
};

#[derive(Parser, Debug)]
#[command(
    name = "steplib-replay",
    version,
    about = "Replay a panel session from a JSON-lines event script"
)]
struct Cli {
    /// Event script; stdin when omitted.
    script: Option<PathBuf>,

    /// Config file overriding panel and detection constants.
    #[arg(long, env = "STEPLIB_CONFIG")]
    config: Option<PathBuf>,

    /// Print the whole document instead of just the panel.
    #[arg(long)]
    document: bool,
}

/// One script line, tagged by event kind.
#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum ScriptLine {
    Insert(NodeSpec),
    Text(String),
    Host(Value),
    Activate(String),
}

/// Port that prints outbound host traffic as JSON lines.
struct StdoutPort;

impl HostPort for StdoutPort {
    fn post(&self, message: &OutboundMessage) {
        println!("-> {}", message.to_value());
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "steplib_panel=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config::default_config_path);
    let panel_config = config::load_config(&config_path).map_err(anyhow::Error::msg)?;
    let panel_id = panel_config.panel_id.clone();

    let document = Document::new();
    let mut bridge =
        PanelBridge::new(document.clone(), StdoutPort, panel_config).map_err(anyhow::Error::msg)?;

    let reader: Box<dyn BufRead> = match &cli.script {
        Some(path) => Box::new(BufReader::new(
            std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.context("reading script")?;
        if line.trim().is_empty() {
            continue;
        }
        let event: ScriptLine = serde_json::from_str(&line)
            .with_context(|| format!("script line {}", lineno + 1))?;
        match event {
            ScriptLine::Insert(spec) => {
                let el = spec.build();
                document.root().append_child(&el);
                bridge.handle(PageEvent::Inserted(DomNode::Element(el)));
            }
            ScriptLine::Text(text) => {
                bridge.handle(PageEvent::Inserted(DomNode::Text(text)));
            }
            ScriptLine::Host(value) => {
                bridge.handle(PageEvent::Host(value));
            }
            ScriptLine::Activate(name) => {
                if !bridge.controller().activate_by_name(&name) {
                    tracing::warn!(%name, "no rendered entry with that name");
                }
            }
        }
    }

    if cli.document {
        print!("{}", document.root());
    } else {
        match document.element_by_id(&panel_id) {
            Some(panel) => print!("{panel}"),
            None => println!("(no panel injected)"),
        }
    }
    Ok(())
}
