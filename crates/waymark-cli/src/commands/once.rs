//! `waymark once` - report a single location update.

use anyhow::Result;
use tokio::sync::mpsc;

use crate::cli::OnceArgs;
use crate::output;

pub async fn run(args: OnceArgs) -> Result<()> {
    let session = super::open_session(&args.connect).await?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let update_tx = tx.clone();

    session.request_once(
        move |lat, lon| {
            let _ = update_tx.send(Ok((lat, lon)));
        },
        move |code, message| {
            let _ = tx.send(Err((code, message)));
        },
    );

    let outcome = rx.recv().await;
    session.destroy();

    match outcome {
        Some(Ok((lat, lon))) => {
            output::print_update(lat, lon);
            Ok(())
        }
        Some(Err((code, message))) => {
            output::print_error(code, &message);
            anyhow::bail!("location update failed")
        }
        None => anyhow::bail!("update was abandoned before completing"),
    }
}
