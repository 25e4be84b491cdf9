//! `waymark watch` - report the location continuously until Ctrl-C.

use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::cli::WatchArgs;
use crate::output;

pub async fn run(args: WatchArgs) -> Result<()> {
    let session = super::open_session(&args.connect).await?;

    info!(interval_ms = args.interval_ms, "starting continuous updates");
    session.enable_continuous(
        Duration::from_millis(args.interval_ms),
        |lat, lon| output::print_update(lat, lon),
        |code, message| output::print_error(code, &message),
    );

    tokio::signal::ctrl_c().await?;
    session.destroy();
    Ok(())
}
