use crate::events::AppEvent;
use async_channel::Sender;
use std::thread;
use tokio::runtime::Runtime;

/// Spawns the input reader (stdin) and, optionally, the config watcher on a
/// background Tokio runtime. Both report through `tx`.
pub fn start_background_services(tx: Sender<AppEvent>, watch_config: bool) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                let _ = tx.send_blocking(AppEvent::InputClosed);
                return;
            }
        };

        rt.block_on(async {
            if watch_config {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(tx).await;
                });
            }

            crate::sys::input::run_reader(tokio::io::stdin(), tx).await;
        });
    });
}
