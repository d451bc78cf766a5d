use crate::value::{Params, Rows};
use postgres::Client;
use relmap_core::{
    driver::{self, Bind, ResultSet},
    Error, Result,
};

/// Outcome of the last [`driver::Statement::execute`].
enum Outcome {
    Rows(Rows),
    Count(u64),
    Done,
}

pub(crate) struct Statement<'a> {
    client: &'a mut Client,
    statement: postgres::Statement,
    params: Params,
    batch: Vec<Params>,
    outcome: Outcome,
}

impl<'a> Statement<'a> {
    pub(crate) fn new(client: &'a mut Client, statement: postgres::Statement) -> Self {
        Self {
            client,
            statement,
            params: Params::default(),
            batch: vec![],
            outcome: Outcome::Done,
        }
    }

    fn run(&mut self, params: &Params) -> Result<u64> {
        self.client
            .execute(&self.statement, &params.as_args())
            .map_err(Error::driver)
    }

    fn fetch(&mut self) -> Result<Rows> {
        let columns = self
            .statement
            .columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect();
        let rows = self
            .client
            .query(&self.statement, &self.params.as_args())
            .map_err(Error::driver)?;
        Ok(Rows::new(columns, rows))
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
        count
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
        // Keys are read back with `lastval()`
        Ok(None)
    }

    fn execute(&mut self) -> Result<bool> {
        if self.statement.columns().is_empty() {
            let count = self.execute_update()?;
            self.outcome = Outcome::Count(count);
            Ok(false)
        } else {
            self.outcome = Outcome::Rows(self.fetch()?);
            Ok(true)
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
        self.outcome = Outcome::Done;
        Ok(false)
    }
}
