//! A scripted [`GraphSession`] for tests.
//!
//! Records every statement it receives and answers from a queue of canned
//! responses. An empty queue answers with zero rows.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::session::{GraphSession, Row, Statement};

#[derive(Default)]
pub struct ScriptedSession {
    responses: Mutex<VecDeque<Result<Vec<Row>, String>>>,
    statements: Mutex<Vec<Statement>>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the rows for the next statement.
    pub fn push_rows(&self, rows: Vec<Row>) -> &Self {
        self.responses.lock().expect("responses lock").push_back(Ok(rows));
        self
    }

    /// Queue a storage failure for the next statement.
    pub fn push_error(&self, message: &str) -> &Self {
        self.responses
            .lock()
            .expect("responses lock")
            .push_back(Err(message.to_string()));
        self
    }

    /// Every statement run so far, in order.
    pub fn statements(&self) -> Vec<Statement> {
        self.statements.lock().expect("statements lock").clone()
    }
}

#[async_trait]
impl GraphSession for ScriptedSession {
    async fn run(&self, statement: Statement) -> anyhow::Result<Vec<Row>> {
        self.statements.lock().expect("statements lock").push(statement);
        match self.responses.lock().expect("responses lock").pop_front() {
            Some(Ok(rows)) => Ok(rows),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Ok(Vec::new()),
        }
    }
}

/// Build a row from `(column, value)` pairs.
pub fn row<const N: usize>(pairs: [(&str, Value); N]) -> Row {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}
