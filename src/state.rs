use std::sync::Arc;

use deadpool_postgres::Pool;

use crate::config;
use crate::db;
use crate::error::{self, Context};
use crate::external;
use crate::sec;

#[derive(Debug)]
pub struct Shared {
    pool: Pool,
    sec: sec::state::Sec,
    external: external::Clients,
}

pub type ArcShared = Arc<Shared>;

impl Shared {
    pub fn from_config(config: &config::Config) -> error::Result<Shared> {
        tracing::debug!("creating Shared state");

        let http = reqwest::Client::builder()
            .build()
            .context("failed to create http client for external services")?;

        Ok(Shared {
            pool: db::from_config(config)?,
            sec: sec::state::Sec::from_config(config)?,
            external: external::Clients::from_config(config, http)?,
        })
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn sec(&self) -> &sec::state::Sec {
        &self.sec
    }

    #[inline]
    pub fn auth(&self) -> &sec::state::Sec {
        self.sec()
    }

    pub fn external(&self) -> &external::Clients {
        &self.external
    }
}

impl AsRef<Pool> for Shared {
    fn as_ref(&self) -> &Pool {
        &self.pool
    }
}

impl AsRef<sec::state::Sec> for Shared {
    fn as_ref(&self) -> &sec::state::Sec {
        &self.sec
    }
}
