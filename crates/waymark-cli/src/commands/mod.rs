//! Command implementations.

pub mod once;
pub mod watch;

use anyhow::Result;

use waymark_core::{ApiKey, ApiUrl};
use waymark_http::{Config, Session};

use crate::cli::ConnectArgs;
use crate::source::SimulatedSource;
use crate::store::FileTokenStore;

/// Authenticate and build a session from the shared connection options.
pub(crate) async fn open_session(
    connect: &ConnectArgs,
) -> Result<Session<SimulatedSource, FileTokenStore>> {
    let api_url = ApiUrl::new(&connect.api_url)?;
    let config = Config::new(api_url, ApiKey::new(connect.api_key.clone()));

    let source = SimulatedSource::new(connect.latitude, connect.longitude);
    let store = FileTokenStore::open_default()?;

    let session = Session::initialize(config, source, store).await?;
    Ok(session)
}
