use std::{sync::Arc, thread};

use anyhow::Result;
use statehub::{listener_fn, HubCell, HubResult, HubSettings, NotificationHub, ResultExt};
use tracing::info;

/// Hub конфигурации, общий на весь процесс.
static CONFIG: HubCell<String> = HubCell::new();

fn main() -> Result<()> {
    let logging = statehub::init_logging(Default::default())?;

    // Настройки: умолчания + переменные окружения `STATEHUB__*`.
    let settings = HubSettings::load()?;
    CONFIG.init(NotificationHub::with_settings(
        String::from("initial"),
        &settings,
    ))?;

    let hub = CONFIG.get()?;
    hub.register(listener_fn("reloader", |cfg: &String| {
        info!(%cfg, "config reloaded");
        Ok(())
    }))?;

    let workers: Vec<_> = (0..4)
        .map(|i| {
            thread::spawn(move || -> HubResult<()> {
                let hub = CONFIG.get().context("shared config hub")?;
                hub.update_state(|cfg| format!("{cfg}+worker{i}"))
                    .with_context(|| format!("worker {i} update"))?;
                Ok(())
            })
        })
        .collect();

    for w in workers {
        w.join().map_err(|_| anyhow::anyhow!("worker panicked"))??;
    }

    let hub: Arc<NotificationHub<String>> = CONFIG.get()?;
    println!("final config: {}", hub.current_state());
    println!("hub: {hub:?}");

    logging.shutdown();
    Ok(())
}
