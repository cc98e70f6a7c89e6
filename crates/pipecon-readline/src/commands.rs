//! Slash commands understood by the REPL.

use std::str::FromStr;

use anyhow::{Context, anyhow, bail};
use pipecon_core::{SlotName, TraceId};

/// Every command with its one-line help, in the order `/help` lists them.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/help", "Show this help"),
    ("/overview", "Pipeline metrics"),
    ("/new-crawl", "Start a new crawl batch"),
    ("/urls", "Crawler: build Reddit URLs"),
    ("/fetch", "Crawler: fetch posts (mock)"),
    ("/extract", "Crawler: extract AI discussions"),
    ("/dedup", "Crawler: deduplicate + embeddings (mock)"),
    ("/parse", "Crawler: parse to JSON"),
    ("/clean", "Crawler: deep clean"),
    ("/stage", "Crawler: stage for the vector store"),
    ("/context", "Save a context template"),
    ("/schema", "Save a criteria schema"),
    ("/candidates", "Ranking: load candidates"),
    ("/rank", "Ranking: run ranking (mock)"),
    ("/report", "Ranking: prepare a text report"),
    ("/models", "Embedding and reranker configuration"),
    ("/qdrant", "Vector store connection"),
    ("/search", "Vector store search (mock)"),
    ("/explore", "Filter an intermediate dataset"),
    ("/channel", "Set the sender channel"),
    ("/send", "Send report <n> (mock), default 1"),
    ("/settings", "Endpoints, chat model and API keys"),
    ("/logs", "View the audit log"),
    ("/trace", "Entries recorded under <trace-id>"),
    ("/state", "Show all slots, or slot <name>"),
    ("/session", "new [id] | switch <id> | list | remove <id>"),
    ("/quit", "Exit"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    New(Option<String>),
    Switch(String),
    List,
    Remove(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Overview,
    NewCrawl,
    Urls,
    Fetch,
    Extract,
    Dedup,
    Parse,
    Clean,
    Stage,
    Context,
    Schema,
    Candidates,
    Rank,
    Report,
    Models,
    Qdrant,
    Search,
    Explore,
    Channel,
    /// 1-based report number.
    Send(usize),
    Settings,
    Logs,
    Trace(TraceId),
    State(Option<SlotName>),
    Session(SessionCommand),
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            bail!("Empty command");
        };
        let arg = words.next();
        if words.next().is_some() && name != "/session" {
            bail!("Too many arguments for {name}");
        }

        let command = match name {
            "/help" => Command::Help,
            "/quit" | "/exit" | "quit" | "exit" => Command::Quit,
            "/overview" => Command::Overview,
            "/new-crawl" => Command::NewCrawl,
            "/urls" => Command::Urls,
            "/fetch" => Command::Fetch,
            "/extract" => Command::Extract,
            "/dedup" => Command::Dedup,
            "/parse" => Command::Parse,
            "/clean" => Command::Clean,
            "/stage" => Command::Stage,
            "/context" => Command::Context,
            "/schema" => Command::Schema,
            "/candidates" => Command::Candidates,
            "/rank" => Command::Rank,
            "/report" => Command::Report,
            "/models" => Command::Models,
            "/qdrant" => Command::Qdrant,
            "/search" => Command::Search,
            "/explore" => Command::Explore,
            "/channel" => Command::Channel,
            "/send" => {
                let number = match arg {
                    Some(n) => n
                        .parse::<usize>()
                        .ok()
                        .filter(|n| *n >= 1)
                        .ok_or_else(|| anyhow!("Report number must be 1 or more, got '{n}'"))?,
                    None => 1,
                };
                Command::Send(number)
            }
            "/settings" => Command::Settings,
            "/logs" => Command::Logs,
            "/trace" => {
                let id = arg.context("Usage: /trace <trace-id>")?;
                Command::Trace(id.parse()?)
            }
            "/state" => match arg {
                Some(slot) => Command::State(Some(
                    slot.parse()
                        .map_err(|_| anyhow!("Unknown slot '{slot}'"))?,
                )),
                None => Command::State(None),
            },
            "/session" => Command::Session(parse_session(line)?),
            other => bail!("Unknown command '{other}'. Type /help for the list."),
        };
        Ok(command)
    }
}

fn parse_session(line: &str) -> anyhow::Result<SessionCommand> {
    let words: Vec<&str> = line.split_whitespace().skip(1).collect();
    let command = match words.as_slice() {
        ["new"] => SessionCommand::New(None),
        ["new", id] => SessionCommand::New(Some(id.to_string())),
        ["switch", id] => SessionCommand::Switch(id.to_string()),
        ["list"] | [] => SessionCommand::List,
        ["remove", id] => SessionCommand::Remove(id.to_string()),
        _ => bail!("Usage: /session new [id] | switch <id> | list | remove <id>"),
    };
    Ok(command)
}

/// Command names starting with `prefix`.
pub fn completions(prefix: &str) -> impl Iterator<Item = &'static str> + '_ {
    COMMANDS
        .iter()
        .map(|(name, _)| *name)
        .filter(move |name| name.starts_with(prefix))
}
