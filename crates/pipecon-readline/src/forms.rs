//! Interactive page forms.
//!
//! Each field is one prompt pre-filled with its default; pressing enter
//! accepts it. List fields are typed comma- or `|`-separated and handed to
//! the application one item per line.

use anyhow::{Result, anyhow};
use rustyline::Editor;
use rustyline::history::History;

use pipecon_application::{
    context_provider::{ContextForm, SchemaForm},
    crawler::{DeepCleanOptions, UrlForm},
    explorer::{ExplorerForm, SOURCES},
    models::ModelConfigForm,
    qdrant_browser::{ConnectionForm, SearchForm},
    ranking::CandidateForm,
    settings::SettingsUpdate,
};
use pipecon_core::pipeline::PostField;
use pipecon_core::{LogFilter, Settings, SlotName};
use pipecon_infrastructure::ConsoleConfig;

use crate::helper::CliHelper;

/// Source of form answers.
pub trait Ask {
    /// Prompts for `label`, returning the edited `default`.
    fn ask(&mut self, label: &str, default: &str) -> Result<String>;
}

impl<H: History> Ask for Editor<CliHelper, H> {
    fn ask(&mut self, label: &str, default: &str) -> Result<String> {
        let answer = self.readline_with_initial(&format!("  {label}: "), (default, ""))?;
        Ok(answer)
    }
}

/// `a, b | c` to one item per line.
pub fn list_to_lines(input: &str) -> String {
    input
        .split([',', '|'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn lines_to_list(lines: &str) -> String {
    lines
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn ask_flag(ask: &mut impl Ask, label: &str, default: bool) -> Result<bool> {
    let answer = ask.ask(&format!("{label} (y/n)"), if default { "y" } else { "n" })?;
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" => Ok(true),
        "n" | "no" | "false" => Ok(false),
        other => Err(anyhow!("Expected y or n, got '{other}'")),
    }
}

pub fn url_form(ask: &mut impl Ask, config: &ConsoleConfig) -> Result<UrlForm> {
    let subreddits = ask.ask("Subreddits", &config.subreddit_list())?;
    let limit = ask.ask("Post limit per subreddit", &config.defaults.post_limit.to_string())?;
    Ok(UrlForm {
        subreddits: list_to_lines(&subreddits),
        limit,
    })
}

pub fn deep_clean_options(ask: &mut impl Ask) -> Result<DeepCleanOptions> {
    let defaults = DeepCleanOptions::default();
    let remove_short = ask_flag(ask, "Remove short bodies", defaults.remove_short)?;
    let lowercase = ask_flag(ask, "Lowercase", defaults.lowercase)?;
    let all_fields: Vec<String> = PostField::all().iter().map(|f| f.to_string()).collect();
    let fields = ask.ask("Keep fields", &all_fields.join(", "))?;
    let keep_fields = list_to_lines(&fields)
        .lines()
        .map(|field| {
            field
                .parse::<PostField>()
                .map_err(|_| anyhow!("Unknown field '{field}', expected one of {}", all_fields.join(", ")))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(DeepCleanOptions {
        remove_short,
        lowercase,
        keep_fields,
    })
}

pub fn context_form(ask: &mut impl Ask) -> Result<ContextForm> {
    let defaults = ContextForm::default();
    let name = ask.ask("Context name", &defaults.name)?;
    let description = ask.ask("Description", &defaults.description)?;
    let variables = ask.ask("Variables", &lines_to_list(&defaults.variables))?;
    let randomize = ask_flag(ask, "Randomize order", defaults.randomize)?;
    Ok(ContextForm {
        name,
        description,
        variables: list_to_lines(&variables),
        randomize,
    })
}

pub fn schema_form(ask: &mut impl Ask) -> Result<SchemaForm> {
    let defaults = SchemaForm::default();
    let schema_name = ask.ask("Schema name", &defaults.schema_name)?;
    let metrics = ask.ask("Metrics", &lines_to_list(&defaults.metrics))?;
    let weights = ask.ask("Weights", &lines_to_list(&defaults.weights))?;
    Ok(SchemaForm {
        schema_name,
        metrics: list_to_lines(&metrics),
        weights: list_to_lines(&weights),
    })
}

pub fn candidate_form(ask: &mut impl Ask, config: &ConsoleConfig) -> Result<CandidateForm> {
    let defaults = CandidateForm::default();
    let source = ask.ask("Source (clean_posts / qdrant_stage)", &defaults.source.to_string())?;
    let source = source
        .trim()
        .parse()
        .map_err(|_| anyhow!("Unknown candidate source '{}'", source.trim()))?;
    let limit = ask.ask("Candidate limit", &config.defaults.candidate_limit.to_string())?;
    Ok(CandidateForm { source, limit })
}

pub fn rank_model(ask: &mut impl Ask, settings: &Settings) -> Result<String> {
    ask.ask("Chat model", &settings.gemini_model)
}

pub fn model_config_form(ask: &mut impl Ask, current: ModelConfigForm) -> Result<ModelConfigForm> {
    Ok(ModelConfigForm {
        embedding_model: ask.ask("Embedding model", &current.embedding_model)?,
        dimension: ask.ask("Embedding dimension", &current.dimension)?,
        reranker_model: ask.ask("Reranker model", &current.reranker_model)?,
        top_k: ask.ask("Rerank top-k", &current.top_k)?,
    })
}

pub fn connection_form(ask: &mut impl Ask, current: ConnectionForm) -> Result<ConnectionForm> {
    Ok(ConnectionForm {
        host: ask.ask("Host", &current.host)?,
        port: ask.ask("Port", &current.port)?,
        collection: ask.ask("Collection", &current.collection)?,
    })
}

pub fn search_form(ask: &mut impl Ask, config: &ConsoleConfig) -> Result<SearchForm> {
    let defaults = SearchForm::default();
    Ok(SearchForm {
        query: ask.ask("Query", &defaults.query)?,
        top_k: ask.ask("Top-k", &config.defaults.top_k.to_string())?,
    })
}

pub fn explorer_form(ask: &mut impl Ask) -> Result<ExplorerForm> {
    let defaults = ExplorerForm::default();
    let names: Vec<String> = SOURCES.iter().map(|s| s.to_string()).collect();
    let source = ask.ask(&format!("Source ({})", names.join(" / ")), &defaults.source.to_string())?;
    let source: SlotName = source
        .trim()
        .parse()
        .map_err(|_| anyhow!("Unknown source '{}'", source.trim()))?;
    Ok(ExplorerForm {
        source,
        keyword: ask.ask("Keyword", &defaults.keyword)?,
        limit: ask.ask("Limit", &defaults.limit)?,
    })
}

pub fn channel(ask: &mut impl Ask, settings: &Settings) -> Result<String> {
    ask.ask("Channel", &settings.telegram_channel)
}

/// Settings prompts. Key prompts start empty; leaving one empty keeps the
/// stored key.
pub fn settings_update(ask: &mut impl Ask, current: &Settings) -> Result<SettingsUpdate> {
    let mut key = |label: &str| -> Result<Option<String>> {
        let answer = ask.ask(label, "")?;
        Ok((!answer.trim().is_empty()).then_some(answer))
    };
    let cohere_key = key("Cohere API key")?;
    let gemini_key = key("Gemini API key")?;
    let huggingface_token = key("HuggingFace token")?;

    Ok(SettingsUpdate {
        qdrant_host: Some(ask.ask("Qdrant host", &current.qdrant_host)?),
        qdrant_port: Some(ask.ask("Qdrant port", &current.qdrant_port.to_string())?),
        qdrant_collection: Some(ask.ask("Qdrant collection", &current.qdrant_collection)?),
        gemini_model: Some(ask.ask("Gemini model", &current.gemini_model)?),
        cohere_key,
        gemini_key,
        huggingface_token,
    })
}

pub fn log_filter(ask: &mut impl Ask) -> Result<LogFilter> {
    let level = ask.ask("Level (ALL / INFO / WARN / ERROR)", "ALL")?;
    let contains = ask.ask("Contains", "")?;
    Ok(LogFilter::all()
        .with_level_selector(&level)
        .contains(contains.trim()))
}
