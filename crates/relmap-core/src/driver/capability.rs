/// What a connection's statements can do beyond plain prepare/bind/execute.
#[derive(Debug)]
pub struct Capability {
    /// Statements prepared with key retrieval report generated keys after an insert.
    pub generated_keys: bool,
}

impl Capability {
    /// SQLite capabilities.
    ///
    /// Generated keys come from `last_insert_rowid()` on the same connection.
    pub const SQLITE: Self = Self {
        generated_keys: true,
    };

    /// PostgreSQL capabilities.
    ///
    /// Key retrieval relies on the `lastval()` fallback query.
    pub const POSTGRESQL: Self = Self {
        generated_keys: false,
    };
}
