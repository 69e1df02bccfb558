mod common;

use std::{
    sync::{mpsc, Arc, Weak},
    thread,
    time::Duration,
};

use anyhow::Result;
use common::{expected, Journal, Recorder};
use once_cell::sync::OnceCell;
use statehub::{listener_fn, HubError, Listener, ListenerId, NotificationHub};

#[test]
fn test_ordered_delivery_then_unregister() -> Result<()> {
    let hub = NotificationHub::new(0i64);
    let journal = Journal::default();
    let a = Recorder::new("A", &journal);
    let b = Recorder::new("B", &journal);
    let c = Recorder::new("C", &journal);

    hub.register(a.clone())?;
    hub.register(b.clone())?;
    hub.register(c.clone())?;

    hub.set_state(10)?;
    assert_eq!(journal.entries(), expected(&[("A", 10), ("B", 10), ("C", 10)]));
    assert_eq!(hub.current_state(), 10);

    assert!(hub.unregister(&b));
    journal.clear();

    hub.set_state(20)?;
    assert_eq!(journal.entries(), expected(&[("A", 20), ("C", 20)]));
    assert_eq!(hub.current_state(), 20);
    Ok(())
}

#[test]
fn test_failing_listener_does_not_block_others() -> Result<()> {
    let hub = NotificationHub::new(0i64);
    let journal = Journal::default();
    let b = Recorder::failing_on("B", &journal, 5);

    hub.register(Recorder::new("A", &journal))?;
    hub.register(b.clone())?;
    hub.register(Recorder::new("C", &journal))?;

    let err = hub.set_state(5).unwrap_err();
    assert_eq!(journal.entries(), expected(&[("A", 5), ("C", 5)]));
    assert_eq!(hub.current_state(), 5);

    let HubError::ListenerFailure(failure) = err else {
        panic!("expected ListenerFailure, got {err:?}");
    };
    assert_eq!(failure.attempted(), 3);
    assert_eq!(failure.failures().len(), 1);
    assert_eq!(failure.failures()[0].name, "B");
    assert_eq!(failure.failed_ids(), vec![ListenerId::of(&b)]);
    assert!(failure.to_string().contains("B cannot handle 5"));

    // Следующая запись проходит без ошибок.
    hub.set_state(6)?;
    Ok(())
}

#[test]
fn test_listener_registered_after_set_state_gets_nothing_until_next() -> Result<()> {
    let hub = NotificationHub::new(0i64);
    let journal = Journal::default();

    hub.set_state(1)?;
    hub.register(Recorder::new("late", &journal))?;
    assert!(journal.entries().is_empty());

    hub.set_state(2)?;
    assert_eq!(journal.entries(), expected(&[("late", 2)]));
    Ok(())
}

#[test]
fn test_listener_can_unregister_itself_during_callback() -> Result<()> {
    let hub = Arc::new(NotificationHub::new(0i64));
    let journal = Journal::default();

    let weak: Weak<NotificationHub<i64>> = Arc::downgrade(&hub);
    let own_id: Arc<OnceCell<ListenerId>> = Arc::new(OnceCell::new());
    let once = listener_fn("once", {
        let journal = journal.clone();
        let own_id = Arc::clone(&own_id);
        move |s: &i64| {
            journal.push("once", *s);
            if let (Some(hub), Some(id)) = (weak.upgrade(), own_id.get()) {
                assert!(hub.unregister_id(*id));
            }
            Ok(())
        }
    });

    // "stay" стоит первым, чтобы отписка шла по своему id, а не по позиции.
    hub.register(Recorder::new("stay", &journal))?;
    hub.register(once.clone())?;
    own_id.set(ListenerId::of(&once)).unwrap();

    hub.set_state(1)?;
    hub.set_state(2)?;

    assert!(!hub.is_registered(&once));
    assert_eq!(
        journal.entries(),
        expected(&[("stay", 1), ("once", 1), ("stay", 2)])
    );
    Ok(())
}

#[test]
fn test_snapshot_isolated_from_registry_changes_mid_broadcast() -> Result<()> {
    let hub = Arc::new(NotificationHub::new(0i64));
    let journal = Journal::default();
    let c = Recorder::new("C", &journal);
    let d = Recorder::new("D", &journal);

    let weak = Arc::downgrade(&hub);
    let mutator = listener_fn("mutator", {
        let (c, d) = (c.clone(), d.clone());
        move |s: &i64| {
            if *s == 1 {
                if let Some(hub) = weak.upgrade() {
                    hub.unregister(&c);
                    hub.register(d.clone())?;
                }
            }
            Ok(())
        }
    });

    hub.register(mutator)?;
    hub.register(c.clone())?;

    hub.set_state(1)?;
    // C был в снимке и получил 1, D в снимок не попал.
    assert_eq!(journal.entries(), expected(&[("C", 1)]));

    journal.clear();
    hub.set_state(2)?;
    assert_eq!(journal.entries(), expected(&[("D", 2)]));
    Ok(())
}

#[test]
fn test_listener_reads_hub_state_without_deadlock() -> Result<()> {
    let hub = Arc::new(NotificationHub::new(0i64));
    let journal = Journal::default();

    let weak = Arc::downgrade(&hub);
    hub.register(listener_fn("reader", {
        let journal = journal.clone();
        move |s: &i64| {
            let hub = weak.upgrade().ok_or("hub dropped")?;
            assert_eq!(hub.current_state(), *s);
            journal.push("reader", hub.listener_count() as i64);
            Ok(())
        }
    }))?;

    hub.set_state(7)?;
    assert_eq!(journal.entries(), expected(&[("reader", 1)]));
    Ok(())
}

#[test]
fn test_nested_set_state_from_callback() -> Result<()> {
    let hub = Arc::new(NotificationHub::new(0i64));
    let journal = Journal::default();

    let weak = Arc::downgrade(&hub);
    hub.register(listener_fn("A", {
        let journal = journal.clone();
        move |s: &i64| {
            journal.push("A", *s);
            if *s == 1 {
                if let Some(hub) = weak.upgrade() {
                    hub.set_state(2)?;
                }
            }
            Ok(())
        }
    }))?;
    hub.register(Recorder::new("B", &journal))?;

    hub.set_state(1)?;

    // Вложенная рассылка завершается до продолжения внешней.
    assert_eq!(
        journal.entries(),
        expected(&[("A", 1), ("A", 2), ("B", 2), ("B", 1)])
    );
    assert_eq!(hub.current_state(), 2);
    assert_eq!(hub.stats().broadcasts, 2);
    Ok(())
}

#[test]
fn test_struct_listener_and_dyn_handle_share_identity() -> Result<()> {
    struct Counter(parking_lot::Mutex<Vec<i64>>);

    impl Listener<i64> for Counter {
        fn notify(
            &self,
            state: &i64,
        ) -> Result<(), statehub::ListenerError> {
            self.0.lock().push(*state);
            Ok(())
        }
    }

    let hub = NotificationHub::new(0i64);
    let counter = Arc::new(Counter(parking_lot::Mutex::new(Vec::new())));
    let handle: Arc<dyn Listener<i64>> = counter.clone();

    hub.register(handle.clone())?;
    hub.set_state(3)?;
    hub.set_state(4)?;
    assert!(hub.unregister(&handle));
    hub.set_state(5)?;

    assert_eq!(*counter.0.lock(), vec![3, 4]);
    assert!(handle.name().contains("Counter"));
    Ok(())
}

#[test]
fn test_state_is_never_rolled_back() {
    let hub = NotificationHub::new(0i64);
    hub.register(listener_fn("always-fails", |_: &i64| Err("nope".into())))
        .unwrap();

    for v in 1..=3 {
        assert!(hub.set_state(v).is_err());
        assert_eq!(hub.current_state(), v);
    }
    let stats = hub.stats();
    assert_eq!(stats.state_changes, 3);
    assert_eq!(stats.failures, 3);
}

#[test]
fn test_listener_failure_converts_to_stack_error() {
    use statehub::{ErrorExt, ResultExt, StackError, StatusCode};

    let hub = NotificationHub::new(0i64);
    let journal = Journal::default();
    hub.register(Recorder::failing_on("B", &journal, 5)).unwrap();

    let err: StackError = hub.set_state(5).context("publishing 5").unwrap_err();
    assert_eq!(err.status_code(), StatusCode::ListenerFailed);
    assert_eq!(err.contexts().len(), 1);
    assert!(err.to_string().starts_with("publishing 5: 1 of 1 listener(s) failed"));
    assert!(err.downcast_ref::<HubError>().is_some());

    let panicked = NotificationHub::new(0i64);
    panicked
        .register(listener_fn("boom", |_: &i64| panic!("boom")))
        .unwrap();
    let err = panicked.set_state(1).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::ListenerPanicked);
}

/// Состояние, чей `Drop` обращается к своему hub.
struct Reentrant {
    hub: Weak<NotificationHub<Reentrant>>,
    drops: mpsc::Sender<usize>,
}

impl Drop for Reentrant {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            let _ = self.drops.send(hub.listener_count());
        }
    }
}

#[test]
fn test_previous_state_is_dropped_outside_lock() {
    let (tx, drops) = mpsc::channel();
    let hub = Arc::new_cyclic(|weak| {
        NotificationHub::new(Reentrant {
            hub: weak.clone(),
            drops: tx.clone(),
        })
    });
    hub.register(listener_fn("noop", |_: &Reentrant| Ok(())))
        .unwrap();

    let (done_tx, done) = mpsc::channel();
    let worker = {
        let hub = Arc::clone(&hub);
        let tx = tx.clone();
        thread::spawn(move || {
            let weak = Arc::downgrade(&hub);
            hub.set_state(Reentrant {
                hub: weak.clone(),
                drops: tx.clone(),
            })
            .unwrap();
            hub.update_state(|_| Reentrant {
                hub: weak,
                drops: tx,
            })
            .unwrap();
            let _ = done_tx.send(());
        })
    };

    done.recv_timeout(Duration::from_secs(5))
        .expect("replacing state must not block on the hub lock");
    worker.join().unwrap();

    // Оба прежних значения освобождены и видели рабочий hub.
    assert_eq!(drops.try_iter().collect::<Vec<_>>(), vec![1, 1]);
}
