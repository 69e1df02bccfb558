use std::sync::Arc;

use anyhow::Result;
use statehub::{
    init_logging, HubError, Listener, ListenerError, LoggingConfig, NotificationHub,
};

/// Наблюдатель, печатающий каждое новое состояние.
struct Printer {
    name: String,
}

impl Listener<i64> for Printer {
    fn notify(
        &self,
        state: &i64,
    ) -> Result<(), ListenerError> {
        println!("Observer {} has been notified. New state: {state}", self.name);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Наблюдатель, который не принимает отрицательные значения.
struct NonNegative;

impl Listener<i64> for NonNegative {
    fn notify(
        &self,
        state: &i64,
    ) -> Result<(), ListenerError> {
        if *state < 0 {
            return Err(format!("negative state {state}").into());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "non-negative"
    }
}

fn printer(name: &str) -> Arc<dyn Listener<i64>> {
    Arc::new(Printer {
        name: name.to_string(),
    })
}

fn main() -> Result<()> {
    let logging = init_logging(LoggingConfig {
        level: "warn".into(),
        ..Default::default()
    })?;

    println!("=== Observer demo ===\n");

    let hub = NotificationHub::builder(0i64).name("demo").build();
    let first = printer("Observer 1");
    let second = printer("Observer 2");

    hub.register(first.clone())?;
    hub.register(second.clone())?;

    hub.set_state(10)?;

    println!("\nRemoving Observer 1\n");
    hub.unregister(&first);
    hub.set_state(20)?;

    println!("\nAdding a validating observer\n");
    hub.register(Arc::new(NonNegative))?;
    match hub.set_state(-1) {
        Err(HubError::ListenerFailure(failure)) => {
            println!("Broadcast reported: {failure}");
            println!("State kept: {}", hub.current_state());
        }
        other => other?,
    }

    let stats = hub.stats();
    println!(
        "\nStats: {} state changes, {} deliveries, {} failures",
        stats.state_changes, stats.deliveries, stats.failures
    );

    logging.shutdown();
    Ok(())
}
