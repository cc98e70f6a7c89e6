//! Evaluation scenarios and ranking criteria.

use serde::{Deserialize, Serialize};

use crate::audit::TraceId;

/// A saved evaluation scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextTemplate {
    pub trace_id: TraceId,
    pub name: String,
    pub description: String,
    pub variables: Vec<String>,
    pub randomize: bool,
}

/// Named metrics with parallel weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaSchema {
    pub trace_id: TraceId,
    pub schema_name: String,
    pub metrics: Vec<String>,
    pub weights: Vec<f64>,
}

impl CriteriaSchema {
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }
}
