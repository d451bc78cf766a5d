mod statement;
use statement::Statement;

mod value;

use postgres::{Client, Config, NoTls};
use relmap_core::{driver::Capability, Error, Result};
use url::Url;

pub struct PostgreSQL {
    /// The PostgreSQL client.
    client: Client,
}

impl PostgreSQL {
    /// Wraps an already connected client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connects to a PostgreSQL database using a connection string.
    ///
    /// See [`postgres::Client::connect`] for more information.
    pub fn connect(url: &str) -> Result<Self> {
        let config = config(url)?;
        let client = config.connect(NoTls).map_err(Error::driver)?;
        Ok(Self::new(client))
    }
}

impl From<Client> for PostgreSQL {
    fn from(client: Client) -> Self {
        Self { client }
    }
}

impl core::fmt::Debug for PostgreSQL {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("PostgreSQL")
            .field("closed", &self.client.is_closed())
            .finish()
    }
}

impl relmap_core::Connection for PostgreSQL {
    fn capability(&self) -> &'static Capability {
        &Capability::POSTGRESQL
    }

    fn prepare<'a>(
        &'a mut self,
        sql: &str,
        _generated_keys: bool,
    ) -> Result<Box<dyn relmap_core::driver::Statement + 'a>> {
        log::trace!("prepare; sql={sql}");
        let statement = self.client.prepare(sql).map_err(Error::driver)?;
        Ok(Box::new(Statement::new(&mut self.client, statement)))
    }
}

/// Builds a client configuration from a `postgresql://` URL.
fn config(url: &str) -> Result<Config> {
    let url = Url::parse(url).map_err(Error::driver)?;

    if url.scheme() != "postgresql" {
        relmap_core::bail!("connection URL does not have a `postgresql` scheme; url={url}");
    }

    let Some(host) = url.host_str() else {
        relmap_core::bail!("missing host in connection URL; url={url}");
    };

    let dbname = url.path().trim_start_matches('/');
    if dbname.is_empty() {
        relmap_core::bail!("no database specified - missing path in connection URL; url={url}");
    }

    let mut config = Config::new();
    config.host(host);
    config.dbname(dbname);

    if let Some(port) = url.port() {
        config.port(port);
    }

    if !url.username().is_empty() {
        config.user(url.username());
    }

    if let Some(password) = url.password() {
        config.password(password);
    }

    Ok(config)
}
