use std::sync::{Arc, Mutex};

/// One interaction with a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// A statement was prepared.
    Prepare { sql: String, generated_keys: bool },

    /// A stored procedure call was prepared.
    PrepareCall { sql: String },

    /// A batch was executed with `rows` queued parameter sets.
    Batch { sql: String, rows: usize },

    /// A prepared statement was released.
    Close { sql: String },
}

impl Op {
    pub fn sql(&self) -> &str {
        match self {
            Op::Prepare { sql, .. }
            | Op::PrepareCall { sql }
            | Op::Batch { sql, .. }
            | Op::Close { sql } => sql,
        }
    }
}

/// A handle on the operations recorded by a [`LoggingConnection`](crate::LoggingConnection)
/// or [`MockConnection`](crate::MockConnection).
#[derive(Debug, Clone, Default)]
pub struct ExecLog {
    ops: Arc<Mutex<Vec<Op>>>,
}

impl ExecLog {
    pub(crate) fn push(&self, op: Op) {
        self.ops.lock().unwrap().push(op);
    }

    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// Every recorded operation, oldest first.
    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    /// SQL of every prepared statement or call, oldest first.
    pub fn prepared(&self) -> Vec<String> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| matches!(op, Op::Prepare { .. } | Op::PrepareCall { .. }))
            .map(|op| op.sql().to_string())
            .collect()
    }

    /// SQL of every released statement, oldest first.
    pub fn closed(&self) -> Vec<String> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| matches!(op, Op::Close { .. }))
            .map(|op| op.sql().to_string())
            .collect()
    }

    /// Whether every prepared statement was released before the next one was
    /// prepared.
    pub fn statements_released(&self) -> bool {
        let mut open: Option<String> = None;
        for op in self.ops() {
            match op {
                Op::Prepare { sql, .. } | Op::PrepareCall { sql } => {
                    if open.replace(sql).is_some() {
                        return false;
                    }
                }
                Op::Close { sql } => {
                    if open.take().as_deref() != Some(sql.as_str()) {
                        return false;
                    }
                }
                Op::Batch { .. } => {}
            }
        }
        open.is_none()
    }

    /// Row counts of every batch execution, oldest first.
    pub fn batches(&self) -> Vec<usize> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| match op {
                Op::Batch { rows, .. } => Some(*rows),
                _ => None,
            })
            .collect()
    }

    /// How many times `sql` was prepared.
    pub fn count_prepared(&self, sql: &str) -> usize {
        self.prepared().iter().filter(|prepared| *prepared == sql).count()
    }

    pub fn clear(&self) {
        self.ops.lock().unwrap().clear();
    }
}
