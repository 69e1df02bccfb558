#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use statehub::{Listener, ListenerError};

/// Общий журнал доставок: `(имя слушателя, состояние)` в порядке вызовов.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<(String, i64)>>>);

impl Journal {
    pub fn push(
        &self,
        name: &str,
        state: i64,
    ) {
        self.0.lock().push((name.to_string(), state));
    }

    pub fn entries(&self) -> Vec<(String, i64)> {
        self.0.lock().clone()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

/// Слушатель, пишущий в общий журнал; опционально отказывает на значении.
pub struct Recorder {
    name: String,
    journal: Journal,
    fail_on: Option<i64>,
}

impl Recorder {
    pub fn new(
        name: &str,
        journal: &Journal,
    ) -> Arc<dyn Listener<i64>> {
        Arc::new(Self {
            name: name.to_string(),
            journal: journal.clone(),
            fail_on: None,
        })
    }

    pub fn failing_on(
        name: &str,
        journal: &Journal,
        value: i64,
    ) -> Arc<dyn Listener<i64>> {
        Arc::new(Self {
            name: name.to_string(),
            journal: journal.clone(),
            fail_on: Some(value),
        })
    }
}

impl Listener<i64> for Recorder {
    fn notify(
        &self,
        state: &i64,
    ) -> Result<(), ListenerError> {
        if self.fail_on == Some(*state) {
            return Err(format!("{} cannot handle {state}", self.name).into());
        }
        self.journal.push(&self.name, *state);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Строит ожидаемый журнал из пар `(&str, i64)`.
pub fn expected(entries: &[(&str, i64)]) -> Vec<(String, i64)> {
    entries.iter().map(|(n, s)| (n.to_string(), *s)).collect()
}
