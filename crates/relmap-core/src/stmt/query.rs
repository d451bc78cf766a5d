use super::{Value, WireType};
use crate::schema::{Encoder, TypeSerializer};

/// One positional parameter of a statement.
#[derive(Clone)]
pub struct QueryParameter {
    /// Column, argument or property the value was taken from.
    pub name: String,
    pub value: Value,
    pub wire_type: WireType,
    pub encoder: Encoder,
}

impl QueryParameter {
    pub fn new(name: impl Into<String>, value: Value, serializer: &TypeSerializer) -> Self {
        Self {
            name: name.into(),
            value,
            wire_type: serializer.wire_type,
            encoder: serializer.encoder,
        }
    }
}

impl PartialEq for QueryParameter {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value && self.wire_type == other.wire_type
    }
}

impl core::fmt::Debug for QueryParameter {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("QueryParameter")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("wire_type", &self.wire_type)
            .finish()
    }
}

/// SQL text plus its ordered parameters.
///
/// The number of placeholders in `sql` always equals `params.len()`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub sql: String,
    pub params: Vec<QueryParameter>,
}

impl Query {
    pub fn new(sql: impl Into<String>, params: Vec<QueryParameter>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// A statement without parameters.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::new(sql, vec![])
    }

    /// The statement text with each placeholder replaced by its escaped value.
    pub fn interpolated(&self) -> String {
        interpolate(&self.sql, &self.params)
    }
}

/// SQL text shared by many rows of parameters, executed as a batch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchQuery {
    pub sql: String,
    pub value_matrix: Vec<Vec<QueryParameter>>,
}

impl BatchQuery {
    pub fn new(sql: impl Into<String>, value_matrix: Vec<Vec<QueryParameter>>) -> Self {
        Self {
            sql: sql.into(),
            value_matrix,
        }
    }

    pub fn len(&self) -> usize {
        self.value_matrix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value_matrix.is_empty()
    }
}

/// Substitutes `?` and `$n` placeholders with escaped parameter values.
fn interpolate(sql: &str, params: &[QueryParameter]) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut next = 0;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '?' => {
                match params.get(next) {
                    Some(param) => out.push_str(&param.value.escaped()),
                    None => out.push('?'),
                }
                next += 1;
            }
            '$' if chars.peek().is_some_and(char::is_ascii_digit) => {
                let mut digits = String::new();
                while let Some(d) = chars.next_if(char::is_ascii_digit) {
                    digits.push(d);
                }
                let param = digits
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|index| params.get(index));
                match param {
                    Some(param) => out.push_str(&param.value.escaped()),
                    None => {
                        out.push('$');
                        out.push_str(&digits);
                    }
                }
            }
            c => out.push(c),
        }
    }

    out
}
