//! The storage seam: run one statement, get back named rows.

use async_trait::async_trait;
use crm_core::FieldValue;
use serde_json::{Map, Value};

/// A result row keyed by column name.
pub type Row = Map<String, Value>;

/// A parameterized Cypher statement plus the columns to read back.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub text: String,
    pub params: Vec<(String, FieldValue)>,
    pub columns: Vec<String>,
}

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Bind a parameter, referenced in the text as `$key`.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Declare the columns every returned row carries.
    pub fn returning<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn param_value(&self, key: &str) -> Option<&FieldValue> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// A unit of work against the graph store.
///
/// Implementations acquire a connection for the duration of `run` and
/// release it on every exit path.
#[async_trait]
pub trait GraphSession: Send + Sync {
    async fn run(&self, statement: Statement) -> anyhow::Result<Vec<Row>>;
}
