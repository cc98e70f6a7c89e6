//! Context provider page: evaluation scenarios and ranking criteria.

use pipecon_core::audit::{AuditEvent, TraceId};
use pipecon_core::pipeline::{ContextTemplate, CriteriaSchema};
use pipecon_core::validation::{non_blank_lines, parse_weights};
use pipecon_core::{PipeconError, Result, SessionState};

/// Input of the context template form.
#[derive(Debug, Clone)]
pub struct ContextForm {
    pub name: String,
    pub description: String,
    /// One variable per line, e.g. `temperature=0.7`.
    pub variables: String,
    pub randomize: bool,
}

impl Default for ContextForm {
    fn default() -> Self {
        Self {
            name: "Model evaluation scenario A".to_string(),
            description:
                "Evaluate models on summarization of Reddit AI threads with code blocks."
                    .to_string(),
            variables: "temperature=0.7\nlength=short\nstyle=technical".to_string(),
            randomize: true,
        }
    }
}

/// Saves a context template under a fresh `ctx` trace id.
///
/// The saved context and its audit entry share that trace id.
pub fn save_context(state: &mut SessionState, form: &ContextForm) -> Result<ContextTemplate> {
    state.initialize();
    let context = ContextTemplate {
        trace_id: TraceId::generate("ctx"),
        name: form.name.clone(),
        description: form.description.clone(),
        variables: non_blank_lines(&form.variables),
        randomize: form.randomize,
    };

    state.contexts_mut().push(context.clone());
    state.log_event(
        AuditEvent::new("context.saved")
            .data(&context)
            .trace_id(context.trace_id.clone()),
    )?;
    Ok(context)
}

/// Input of the criteria schema form.
#[derive(Debug, Clone)]
pub struct SchemaForm {
    pub schema_name: String,
    /// One metric per line.
    pub metrics: String,
    /// One weight per line, parallel to `metrics`.
    pub weights: String,
}

impl Default for SchemaForm {
    fn default() -> Self {
        Self {
            schema_name: "Ranking criteria v1".to_string(),
            metrics: "faithfulness\nconciseness\nreasoning depth\nformat compliance".to_string(),
            weights: "0.35\n0.2\n0.3\n0.15".to_string(),
        }
    }
}

/// Saves a criteria schema under a fresh `schema` trace id.
///
/// Weights must all be numbers and pair up with the metrics; otherwise
/// nothing is saved or logged.
pub fn save_schema(state: &mut SessionState, form: &SchemaForm) -> Result<CriteriaSchema> {
    state.initialize();
    let metrics = non_blank_lines(&form.metrics);
    let weights = parse_weights("weights", &form.weights)?;
    if weights.len() != metrics.len() {
        return Err(PipeconError::validation(
            "weights",
            format!(
                "expected one weight per metric ({} metrics, {} weights)",
                metrics.len(),
                weights.len()
            ),
        ));
    }

    let schema = CriteriaSchema {
        trace_id: TraceId::generate("schema"),
        schema_name: form.schema_name.clone(),
        metrics,
        weights,
    };
    state.criteria_schemas_mut().push(schema.clone());
    state.log_event(
        AuditEvent::new("schema.saved")
            .data(&schema)
            .trace_id(schema.trace_id.clone()),
    )?;
    Ok(schema)
}
