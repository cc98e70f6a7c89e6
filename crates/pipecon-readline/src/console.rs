//! Dispatches parsed commands against the active session.

use anyhow::{Context, Result};
use serde_json::Value;

use pipecon_application::{
    context_provider, crawler, explorer, logs, models, overview, qdrant_browser, ranking, sender,
    settings,
};
use pipecon_core::{SessionManager, SessionState};
use pipecon_infrastructure::ConsoleConfig;

use crate::commands::{Command, SessionCommand};
use crate::forms::{self, Ask};
use crate::render;

/// What the REPL does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console {
    manager: SessionManager,
    config: ConsoleConfig,
}

impl Console {
    /// Creates the console with `session_id` as the active session.
    pub async fn start(config: ConsoleConfig, session_id: &str) -> Result<Self> {
        let manager = SessionManager::new();
        manager.create_session(session_id).await?;
        Ok(Self { manager, config })
    }

    pub async fn prompt(&self) -> String {
        match self.manager.active_session_id().await {
            Some(id) => format!("[{id}] {}", self.config.console.prompt),
            None => self.config.console.prompt.clone(),
        }
    }

    async fn act<R>(&self, action: impl FnOnce(&mut SessionState) -> R) -> Result<R> {
        let id = self
            .manager
            .active_session_id()
            .await
            .context("No active session. Use /session new or /session switch <id>.")?;
        Ok(self.manager.with_session(&id, action).await?)
    }

    pub async fn execute(&self, command: Command, ask: &mut impl Ask) -> Result<Flow> {
        tracing::debug!(target: "console", ?command, "Executing command");
        match command {
            Command::Help => render::help(),
            Command::Quit => return Ok(Flow::Quit),
            Command::Overview => {
                let metrics = self.act(overview::metrics).await?;
                render::metrics(&metrics);
            }
            Command::NewCrawl => {
                let trace_id = self.act(overview::new_crawl_batch).await?;
                render::success(format!("New crawl batch: {trace_id}"));
            }

            // ===== Crawler =====
            Command::Urls => {
                let form = forms::url_form(ask, &self.config)?;
                let batch = self.act(|s| crawler::generate_urls(s, &form)).await??;
                render::success(format!(
                    "Generated {} URLs (trace {})",
                    batch.urls.len(),
                    batch.trace_id
                ));
                for url in &batch.urls {
                    render::note(format!("  {url}"));
                }
            }
            Command::Fetch => {
                let outcome = self.act(crawler::fetch_posts).await??;
                render::outcome(outcome, |n| format!("Fetched {n} posts (mock)"));
            }
            Command::Extract => {
                let n = self.act(crawler::extract_ai).await??;
                render::success(format!("Extracted {n} AI discussions"));
            }
            Command::Dedup => {
                let n = self.act(crawler::deduplicate).await??;
                render::success(format!("{n} posts after deduplication"));
            }
            Command::Parse => {
                let n = self.act(crawler::parse_json).await??;
                render::success(format!("Parsed {n} posts"));
            }
            Command::Clean => {
                let options = forms::deep_clean_options(ask)?;
                let n = self.act(|s| crawler::deep_clean(s, &options)).await??;
                render::success(format!("{n} posts after deep clean"));
            }
            Command::Stage => {
                let n = self.act(crawler::stage_documents).await??;
                render::success(format!("Staged {n} documents"));
            }

            // ===== Context provider =====
            Command::Context => {
                let form = forms::context_form(ask)?;
                let context = self
                    .act(|s| context_provider::save_context(s, &form))
                    .await??;
                render::success(format!("Context saved (trace {})", context.trace_id));
            }
            Command::Schema => {
                let form = forms::schema_form(ask)?;
                let schema = self
                    .act(|s| context_provider::save_schema(s, &form))
                    .await??;
                render::success(format!(
                    "Schema '{}' saved, total weight {} (trace {})",
                    schema.schema_name,
                    schema.total_weight(),
                    schema.trace_id
                ));
            }

            // ===== Ranking =====
            Command::Candidates => {
                let form = forms::candidate_form(ask, &self.config)?;
                let n = self.act(|s| ranking::load_candidates(s, &form)).await??;
                render::success(format!("Loaded {n} candidates from {}", form.source));
            }
            Command::Rank => {
                let current = self.act(|s| s.settings()).await?;
                let model = forms::rank_model(ask, &current)?;
                let results = self.act(|s| ranking::run(s, &model)).await??;
                render::success(format!("Ranked {} candidates", results.len()));
                let rows: Vec<Value> = results
                    .iter()
                    .map(|r| serde_json::json!({ "score": r.score, "title": r.item.title() }))
                    .collect();
                render::table(&rows);
            }
            Command::Report => {
                let outcome = self.act(ranking::prepare_report).await??;
                if let pipecon_core::Outcome::Completed(report) = &outcome {
                    render::note(ranking::preview(&report.content));
                }
                render::outcome(outcome, |report| format!("Prepared {}", report.label()));
            }

            // ===== Models and vector store =====
            Command::Models => {
                let current = self.act(|s| models::ModelConfigForm::from_state(s)).await?;
                let form = forms::model_config_form(ask, current)?;
                let config = self.act(|s| models::save_config(s, &form)).await??;
                render::success(format!(
                    "Saved {} ({}d) with reranker {} (top-k {})",
                    config.embedding_model, config.dimension, config.reranker_model, config.top_k
                ));
            }
            Command::Qdrant => {
                let current = self
                    .act(|s| qdrant_browser::ConnectionForm::from_state(s))
                    .await?;
                let form = forms::connection_form(ask, current)?;
                self.act(|s| qdrant_browser::update_connection(s, &form))
                    .await??;
                render::success("Connection updated");
            }
            Command::Search => {
                let form = forms::search_form(ask, &self.config)?;
                let hits = self.act(|s| qdrant_browser::search(s, &form)).await??;
                let rows: Vec<Value> = hits
                    .iter()
                    .map(|doc| serde_json::json!({ "doc_id": doc.doc_id, "title": doc.payload.title }))
                    .collect();
                render::table(&rows);
            }
            Command::Explore => {
                let form = forms::explorer_form(ask)?;
                let view = self.act(|s| explorer::apply(s, &form)).await??;
                render::note(format!("{} records", view.len()));
                render::table(&view);
            }

            // ===== Sender =====
            Command::Channel => {
                let current = self.act(|s| s.settings()).await?;
                let channel = forms::channel(ask, &current)?;
                self.act(|s| sender::set_channel(s, &channel)).await?;
                render::success(format!("Channel set to {}", channel.trim()));
            }
            Command::Send(number) => {
                let labels = self.act(sender::report_labels).await?;
                let outcome = self.act(|s| sender::send(s, number - 1)).await??;
                render::outcome(outcome, |message| {
                    format!(
                        "Sent {} to {} (mock, trace {})",
                        labels.get(number - 1).map_or("report", String::as_str),
                        message.channel,
                        message.trace_id
                    )
                });
            }

            // ===== Settings and logs =====
            Command::Settings => {
                let current = self.act(|s| s.settings()).await?;
                let update = forms::settings_update(ask, &current)?;
                let saved = self
                    .act(|s| -> pipecon_core::Result<_> {
                        let saved = settings::update(s, &update)?;
                        settings::save(s)?;
                        Ok(saved)
                    })
                    .await??;
                render::success("Settings saved");
                render::json(&serde_json::to_value(saved.redacted())?);
            }
            Command::Logs => {
                let filter = forms::log_filter(ask)?;
                let entries = self.act(|s| logs::view(s, &filter)).await?;
                render::log_entries(&entries);
            }
            Command::Trace(trace_id) => {
                if let Some(ts) = trace_id.timestamp() {
                    render::note(format!("Trace {trace_id}, started at unix {ts}"));
                }
                let entries = self.act(|s| logs::trace(s, &trace_id)).await?;
                render::log_entries(&entries);
            }
            Command::State(Some(slot)) => {
                let value = self.act(|s| s.slot_json(slot)).await??;
                render::json(&value);
            }
            Command::State(None) => {
                let value = self
                    .act(|s| serde_json::to_value(&*s))
                    .await??;
                render::json(&value);
            }

            Command::Session(command) => self.session(command).await?,
        }
        Ok(Flow::Continue)
    }

    async fn session(&self, command: SessionCommand) -> Result<()> {
        match command {
            SessionCommand::New(Some(id)) => {
                self.manager.create_session(id.as_str()).await?;
                render::success(format!("Switched to new session {id}"));
            }
            SessionCommand::New(None) => {
                let id = self.manager.new_session().await?;
                render::success(format!("Switched to new session {id}"));
            }
            SessionCommand::Switch(id) => {
                self.manager.switch_session(&id).await?;
                render::success(format!("Switched to session {id}"));
            }
            SessionCommand::List => {
                let active = self.manager.active_session_id().await;
                for id in self.manager.session_ids().await {
                    if active.as_deref() == Some(id.as_str()) {
                        println!("* {id}");
                    } else {
                        println!("  {id}");
                    }
                }
            }
            SessionCommand::Remove(id) => {
                self.manager.remove_session(&id).await?;
                render::success(format!("Removed session {id}"));
            }
        }
        Ok(())
    }
}
