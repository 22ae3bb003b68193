use serde::Serialize;
use tokio::{sync::mpsc::UnboundedReceiver, task::JoinHandle};

/// Prints updates until every sender is dropped.
///
/// Each update becomes one line: JSON object if `json` is set, `describe` output otherwise.
pub(crate) fn spawn<U, F>(mut rx: UnboundedReceiver<U>, json: bool, describe: F) -> JoinHandle<()>
where
    U: Serialize + Send + 'static,
    F: Fn(&U) -> String + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            if !json {
                println!("{}", describe(&update));
                continue;
            }
            match serde_json::to_string(&update) {
                Ok(line) => println!("{}", line),
                Err(err) => tracing::warn!("failed to serialize update: {}", err),
            }
        }
    })
}

pub(crate) fn status(ok: bool) -> &'static str {
    if ok {
        "[OK]"
    } else {
        "[FAIL]"
    }
}
