use crate::value::{Params, Rows, SqliteRow};
use relmap_core::{
    driver::{self, Bind, ResultSet},
    Error, Result,
};
use rusqlite::{params_from_iter, types::Value as SqlValue, CachedStatement};

/// Outcome of the last [`driver::Statement::execute`].
#[derive(Debug)]
enum Outcome {
    Rows(Rows),
    Count(u64),
    Done,
}

pub(crate) struct Statement<'a> {
    connection: &'a rusqlite::Connection,
    statement: CachedStatement<'a>,
    params: Params,
    batch: Vec<Params>,
    generated_keys: bool,
    last_insert_rowid: Option<i64>,
    outcome: Outcome,
}

impl<'a> Statement<'a> {
    pub(crate) fn new(
        connection: &'a rusqlite::Connection,
        statement: CachedStatement<'a>,
        generated_keys: bool,
    ) -> Self {
        Self {
            connection,
            statement,
            params: Params::default(),
            batch: vec![],
            generated_keys,
            last_insert_rowid: None,
            outcome: Outcome::Done,
        }
    }

    fn run(&mut self, params: &Params) -> Result<u64> {
        let count = self
            .statement
            .execute(params_from_iter(params.0.iter()))
            .map_err(Error::driver)?;
        Ok(count as u64)
    }

    fn fetch(&mut self) -> Result<Rows> {
        let columns: Vec<String> = self
            .statement
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let width = columns.len();

        let mut fetched = vec![];
        let mut rows = self
            .statement
            .query(params_from_iter(self.params.0.iter()))
            .map_err(Error::driver)?;

        while let Some(row) = rows.next().map_err(Error::driver)? {
            let values = (0..width)
                .map(|index| row.get::<_, SqlValue>(index))
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(Error::driver)?;
            fetched.push(SqliteRow(values));
        }

        Ok(Rows::new(columns, fetched))
    }
}

impl driver::Statement for Statement<'_> {
    fn params(&mut self) -> &mut dyn Bind {
        &mut self.params
    }

    fn clear_params(&mut self) -> Result<()> {
        self.params.0.clear();
        Ok(())
    }

    fn execute_update(&mut self) -> Result<u64> {
        let params = std::mem::take(&mut self.params);
        let count = self.run(&params);
        self.params = params;
        let count = count?;

        if self.generated_keys {
            self.last_insert_rowid = Some(self.connection.last_insert_rowid());
        }

        Ok(count)
    }

    fn execute_query(&mut self) -> Result<Box<dyn ResultSet + '_>> {
        Ok(Box::new(self.fetch()?))
    }

    fn add_batch(&mut self) -> Result<()> {
        self.batch.push(self.params.clone());
        Ok(())
    }

    fn execute_batch(&mut self) -> Result<Vec<u64>> {
        let batch = std::mem::take(&mut self.batch);
        batch.iter().map(|params| self.run(params)).collect()
    }

    fn generated_keys(&mut self) -> Result<Option<Box<dyn ResultSet + '_>>> {
        let Some(rowid) = self.last_insert_rowid.take() else {
            return Ok(None);
        };

        let rows = Rows::new(
            vec!["last_insert_rowid()".to_string()],
            vec![SqliteRow(vec![SqlValue::Integer(rowid)])],
        );
        Ok(Some(Box::new(rows)))
    }

    fn execute(&mut self) -> Result<bool> {
        if self.statement.column_count() > 0 {
            self.outcome = Outcome::Rows(self.fetch()?);
            Ok(true)
        } else {
            let params = std::mem::take(&mut self.params);
            let count = self.run(&params);
            self.params = params;
            self.outcome = Outcome::Count(count?);
            Ok(false)
        }
    }

    fn result_set(&mut self) -> Result<Option<Box<dyn ResultSet + '_>>> {
        match std::mem::replace(&mut self.outcome, Outcome::Done) {
            Outcome::Rows(rows) => Ok(Some(Box::new(rows))),
            outcome => {
                self.outcome = outcome;
                Ok(None)
            }
        }
    }

    fn update_count(&mut self) -> Result<Option<u64>> {
        match self.outcome {
            Outcome::Count(count) => Ok(Some(count)),
            _ => Ok(None),
        }
    }

    fn more_results(&mut self) -> Result<bool> {
        // SQLite statements produce a single result
        self.outcome = Outcome::Done;
        Ok(false)
    }
}
