//! Engine tests: counts, errors, hooks, cancellation.

use anyhow::anyhow;
use noise_worker::work::empty_work_logger;
use noise_worker::{
    EngineConfig, ErrorOrigin, FetchedCounter, SendError, WorkContext, WorkEngine, WorkHooks,
    WorkResults, WorkSender,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct WorkItem {
    id: usize,
}

fn push_items(
    n: usize,
) -> impl Fn(&WorkContext, &FetchedCounter<'_>, &WorkSender<'_, WorkItem>) -> anyhow::Result<()>
+ Send
+ Sync {
    move |_ctx, fetched, tx| {
        for id in 0..n {
            if tx.send(WorkItem { id }).is_err() {
                break;
            }
            fetched.increment();
        }
        Ok(())
    }
}

fn config(buffer_size: usize, workers: usize) -> EngineConfig {
    EngineConfig::new(buffer_size, workers).unwrap()
}

// --- counts ---

#[test]
fn test_start_returns_correct_values() {
    let engine = WorkEngine::new(config(1, 10), push_items(10), |_ctx, _item: WorkItem| Ok(()));
    let got = engine.start(&WorkContext::background());

    assert!(!got.has_error());
    assert_eq!(got.fetched_count(), 10);
    assert_eq!(got.total_count(), 10);
    assert_eq!(got.successful_count(), 10);
}

#[test]
fn test_start_with_some_failed() {
    let engine = WorkEngine::new(config(1, 10), push_items(10), |_ctx, item: WorkItem| {
        if item.id == 3 {
            return Err(anyhow!("an error"));
        }
        Ok(())
    });
    let got = engine.start(&WorkContext::background());

    assert!(got.has_error());
    assert_eq!(got.all_errors().len(), 1);
    assert_eq!(got.fetched_count(), 10);
    assert_eq!(got.total_count(), 10);
    assert_eq!(got.successful_count(), 9);
}

#[test]
fn test_start_when_no_job_to_do() {
    let engine = WorkEngine::new(config(1, 10), push_items(0), |_ctx, _item: WorkItem| Ok(()));
    let got = engine.start(&WorkContext::background());

    assert!(!got.has_error());
    assert_eq!(got.fetched_count(), 0);
    assert_eq!(got.total_count(), 0);
    assert_eq!(got.successful_count(), 0);
}

#[test]
fn test_start_when_fetch_fails() {
    let engine = WorkEngine::new(
        config(1, 10),
        |_ctx, _fetched, _tx: &WorkSender<'_, WorkItem>| Err(anyhow!("an error")),
        |_ctx, _item| Ok(()),
    );
    let got = engine.start(&WorkContext::background());

    assert!(got.has_error());
    assert_eq!(got.fetched_count(), 0);
    assert_eq!(got.total_count(), 0);
    let errors = got.all_errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].is_fetch());
    assert!(errors[0].to_string().contains("an error"));
}

#[test]
fn test_fetch_error_after_items_still_processes_them() {
    let engine = WorkEngine::new(
        config(4, 2),
        |_ctx, fetched, tx| {
            for id in 0..3 {
                tx.send(WorkItem { id }).map_err(|e| anyhow!("{e}"))?;
                fetched.increment();
            }
            Err(anyhow!("source went away"))
        },
        |_ctx, _item: WorkItem| Ok(()),
    );
    let got = engine.start(&WorkContext::background());

    assert_eq!(got.fetched_count(), 3);
    assert_eq!(got.total_count(), 3);
    assert_eq!(got.successful_count(), 3);
    assert_eq!(got.error_count(), 1);
    assert!(got.first_error().unwrap().is_fetch());
}

#[test]
fn test_every_item_failing() {
    let engine = WorkEngine::new(config(8, 4), push_items(20), |_ctx, item: WorkItem| {
        Err(anyhow!("item {} failed", item.id))
    });
    let got = engine.start(&WorkContext::background());

    assert_eq!(got.total_count(), 20);
    assert_eq!(got.successful_count(), 0);
    assert_eq!(got.error_count(), 20);
}

#[test]
fn test_item_errors_carry_worker_and_count() {
    let workers = 3;
    let engine = WorkEngine::new(config(2, workers), push_items(9), |_ctx, item: WorkItem| {
        if item.id % 2 == 0 {
            return Err(anyhow!("even"));
        }
        Ok(())
    });
    let got = engine.start(&WorkContext::background());

    assert_eq!(got.error_count(), 5);
    for err in got.all_errors() {
        match err.origin {
            ErrorOrigin::Item { worker, work_count } => {
                assert!(worker < workers);
                assert!(work_count >= 1);
            }
            ErrorOrigin::Fetch => panic!("unexpected fetch error: {err}"),
        }
    }
}

#[test]
fn test_single_worker_processes_in_push_order() {
    let seen = Mutex::new(Vec::new());
    let engine = WorkEngine::new(config(4, 1), push_items(50), |_ctx, item: WorkItem| {
        seen.lock().unwrap().push(item.id);
        Ok(())
    });
    let got = engine.start(&WorkContext::background());

    assert_eq!(got.total_count(), 50);
    assert_eq!(*seen.lock().unwrap(), (0..50).collect::<Vec<_>>());
}

#[test]
fn test_sender_reports_capacity_and_fetched_count() {
    let observed = Mutex::new(Vec::new());
    let engine = WorkEngine::new(
        config(4, 2),
        |_ctx, fetched, tx| {
            assert_eq!(tx.capacity(), Some(4));
            assert!(tx.is_empty());
            for id in 0..10 {
                tx.send(WorkItem { id }).map_err(|e| anyhow!("{e}"))?;
                fetched.increment();
                observed.lock().unwrap().push((fetched.get(), tx.len()));
            }
            Ok(())
        },
        |_ctx, _item: WorkItem| Ok(()),
    );
    let got = engine.start(&WorkContext::background());

    assert_eq!(got.fetched_count(), 10);
    drop(engine);
    let observed = observed.into_inner().unwrap();
    for (i, (fetched, queued)) in observed.into_iter().enumerate() {
        assert_eq!(fetched, i + 1);
        assert!(queued <= 4);
    }
}

#[test]
fn test_engine_is_reusable_across_runs() {
    let engine = WorkEngine::new(config(2, 2), push_items(5), |_ctx, _item: WorkItem| Ok(()));
    let first = engine.start(&WorkContext::background());
    let second = engine.start(&WorkContext::background());

    assert_eq!(first.total_count(), 5);
    assert_eq!(second.total_count(), 5);
    assert_eq!(second.fetched_count(), 5);
}

// --- config ---

#[test]
fn test_config_rejects_zero_buffer() {
    assert!(EngineConfig::new(0, 1).is_err());
}

#[test]
fn test_config_rejects_zero_workers() {
    assert!(EngineConfig::new(1, 0).is_err());
}

#[test]
fn test_config_accessors() {
    let c = config(7, 3);
    assert_eq!(c.buffer_size(), 7);
    assert_eq!(c.workers(), 3);
}

#[test]
fn test_engine_keeps_its_config() {
    let engine = WorkEngine::new(config(7, 3), push_items(0), |_ctx, _item: WorkItem| Ok(()));
    assert_eq!(engine.config(), config(7, 3));
}

// --- hooks ---

#[test]
fn test_hooks_called_once_per_worker_and_item() {
    let starts = AtomicUsize::new(0);
    let ends = AtomicUsize::new(0);
    let ended_work = AtomicUsize::new(0);
    let finished = AtomicUsize::new(0);
    let workers = 4;

    let engine = WorkEngine::new(config(3, workers), push_items(25), |_ctx, _item: WorkItem| {
        Ok(())
    })
    .on_worker_start(|_ctx, _worker, work_count, _results| {
        assert_eq!(work_count, 0);
        starts.fetch_add(1, Ordering::SeqCst);
    })
    .on_worker_end(|_ctx, _worker, work_count, _results| {
        ends.fetch_add(1, Ordering::SeqCst);
        ended_work.fetch_add(work_count, Ordering::SeqCst);
    })
    .on_work_finished(|_ctx, _worker, work_count, _results| {
        assert!(work_count >= 1);
        finished.fetch_add(1, Ordering::SeqCst);
    });
    let got = engine.start(&WorkContext::background());

    assert_eq!(starts.load(Ordering::SeqCst), workers);
    assert_eq!(ends.load(Ordering::SeqCst), workers);
    assert_eq!(finished.load(Ordering::SeqCst), 25);
    assert_eq!(ended_work.load(Ordering::SeqCst), got.total_count());
}

#[test]
fn test_with_hooks_installs_all_three() {
    let starts = AtomicUsize::new(0);
    let finished = AtomicUsize::new(0);
    let hooks = WorkHooks {
        worker_start: Box::new(
            |_ctx: &WorkContext, _worker: usize, _work_count: usize, _results: &WorkResults| {
                starts.fetch_add(1, Ordering::SeqCst);
            },
        ),
        worker_end: empty_work_logger(),
        work_finished: Box::new(
            |_ctx: &WorkContext, _worker: usize, _work_count: usize, _results: &WorkResults| {
                finished.fetch_add(1, Ordering::SeqCst);
            },
        ),
    };
    let engine = WorkEngine::new(config(2, 3), push_items(12), |_ctx, _item: WorkItem| Ok(()))
        .with_hooks(hooks);
    let got = engine.start(&WorkContext::background());

    assert_eq!(got.total_count(), 12);
    assert_eq!(starts.load(Ordering::SeqCst), 3);
    assert_eq!(finished.load(Ordering::SeqCst), 12);
}

#[test]
fn test_work_finished_runs_before_counters_move() {
    // (work_count, total, successful, errors) as seen by the hook.
    let seen = Mutex::new(Vec::new());
    let engine = WorkEngine::new(config(8, 1), push_items(6), |_ctx, item: WorkItem| {
        if item.id == 2 {
            return Err(anyhow!("third item"));
        }
        Ok(())
    })
    .on_work_finished(|_ctx, _worker, work_count, results| {
        seen.lock().unwrap().push((
            work_count,
            results.total_count(),
            results.successful_count(),
            results.error_count(),
        ));
    });
    let got = engine.start(&WorkContext::background());

    assert_eq!(got.total_count(), 6);
    drop(engine);
    let seen = seen.into_inner().unwrap();
    assert_eq!(seen.len(), 6);
    for &(work_count, total, successful, errors) in &seen {
        assert_eq!(total, work_count - 1);
        // Item 3 is the failing one; its error is already recorded when the hook runs.
        let expected_errors = usize::from(work_count >= 3);
        assert_eq!(errors, expected_errors);
        assert_eq!(successful, work_count - 1 - usize::from(work_count > 3));
    }
}

#[test]
fn test_hooks_see_worker_indices_in_range() {
    let seen = Mutex::new(Vec::new());
    let workers = 5;
    let engine = WorkEngine::new(config(1, workers), push_items(0), |_ctx, _item: WorkItem| {
        Ok(())
    })
    .on_worker_start(|_ctx, worker, _work_count, _results| {
        seen.lock().unwrap().push(worker);
    });
    engine.start(&WorkContext::background());

    drop(engine);
    let mut seen = seen.into_inner().unwrap();
    seen.sort_unstable();
    assert_eq!(seen, (0..workers).collect::<Vec<_>>());
}

#[test]
fn test_readers_inside_hooks_during_run() {
    let check = |_ctx: &WorkContext, _worker: usize, _work_count: usize, r: &WorkResults| {
        let _ = r.fetched_count();
        let _ = r.total_count();
        let _ = r.successful_count();
        let _ = r.all_errors();
        let _ = r.has_error();
    };
    let engine = WorkEngine::new(config(4, 8), push_items(200), |_ctx, item: WorkItem| {
        if item.id % 10 == 0 {
            return Err(anyhow!("tenth"));
        }
        Ok(())
    })
    .on_worker_start(check)
    .on_worker_end(check)
    .on_work_finished(check);
    let got = engine.start(&WorkContext::background());

    assert_eq!(got.total_count(), 200);
    assert_eq!(got.successful_count(), 180);
    assert_eq!(got.error_count(), 20);
}

#[test]
fn test_readers_from_outside_thread_during_run() {
    let items = 300;
    let polls = AtomicUsize::new(0);
    let engine = WorkEngine::new(config(4, 6), push_items(items), |_ctx, item: WorkItem| {
        if item.id % 7 == 0 {
            return Err(anyhow!("seventh"));
        }
        thread::sleep(Duration::from_micros(200));
        Ok(())
    })
    .on_worker_start(|_ctx, worker, _work_count, results| {
        if worker != 0 {
            return;
        }
        // Worker 0 parks here while a separate thread polls; the other workers drain the run.
        thread::scope(|s| {
            s.spawn(|| {
                let mut last_total = 0;
                let mut last_errors = 0;
                while results.total_count() < items {
                    let total = results.total_count();
                    let errors = results.all_errors().len();
                    let _ = results.fetched_count();
                    let _ = results.successful_count();
                    let _ = results.has_error();
                    let _ = results.first_error();
                    assert!(total >= last_total);
                    assert!(errors >= last_errors);
                    last_total = total;
                    last_errors = errors;
                    polls.fetch_add(1, Ordering::SeqCst);
                }
            });
        });
    });
    let got = engine.start(&WorkContext::background());

    assert!(polls.load(Ordering::SeqCst) > 0);
    assert_eq!(got.total_count(), items);
    assert_eq!(got.error_count(), items.div_ceil(7));
    assert_eq!(got.successful_count(), items - items.div_ceil(7));
}

// --- cancellation ---

#[test]
fn test_start_with_context_done_processes_less_than_fetched() {
    let (ctx, cancel) = WorkContext::with_cancel();
    // Either select arm may win once an item finishes, so queue enough that draining them
    // all after cancellation is practically impossible.
    let engine = WorkEngine::new(config(20, 1), push_items(20), |_ctx, _item: WorkItem| {
        thread::sleep(Duration::from_millis(500));
        Ok(())
    });

    let got = thread::scope(|s| {
        let run = s.spawn(|| engine.start(&ctx));
        thread::sleep(Duration::from_millis(100));
        cancel.cancel();
        run.join().unwrap()
    });

    assert!(!got.has_error());
    assert_eq!(got.fetched_count(), 20);
    assert!(got.total_count() < got.fetched_count());
}

#[test]
fn test_worker_end_runs_on_cancellation() {
    let (ctx, cancel) = WorkContext::with_cancel();
    let ends = AtomicUsize::new(0);
    let workers = 3;
    let engine = WorkEngine::new(config(30, workers), push_items(30), |_ctx, _item: WorkItem| {
        thread::sleep(Duration::from_millis(300));
        Ok(())
    })
    .on_worker_end(|_ctx, _worker, _work_count, _results| {
        ends.fetch_add(1, Ordering::SeqCst);
    });

    let got = thread::scope(|s| {
        let run = s.spawn(|| engine.start(&ctx));
        thread::sleep(Duration::from_millis(50));
        cancel.cancel();
        run.join().unwrap()
    });

    assert_eq!(ends.load(Ordering::SeqCst), workers);
    assert!(got.total_count() < 30);
}

#[test]
fn test_already_cancelled_context_returns() {
    let (ctx, cancel) = WorkContext::with_cancel();
    cancel.cancel();
    let engine = WorkEngine::new(config(1, 2), push_items(1000), |_ctx, _item: WorkItem| Ok(()));
    let got = engine.start(&ctx);

    assert!(got.fetched_count() < 1000);
    assert!(got.total_count() <= got.fetched_count());
    assert!(!got.has_error());
}

#[test]
fn test_producer_ignoring_cancellation_does_not_hang() {
    let (ctx, cancel) = WorkContext::with_cancel();
    let returned = Mutex::new(Vec::new());
    let engine = WorkEngine::new(
        config(1, 1),
        |_ctx, fetched, tx| {
            // Keeps pushing whatever send returns.
            for id in 0..100 {
                match tx.send(WorkItem { id }) {
                    Ok(()) => fetched.increment(),
                    Err(e) => returned.lock().unwrap().push(e.into_inner().id),
                }
            }
            Ok(())
        },
        |_ctx, _item| {
            thread::sleep(Duration::from_millis(100));
            Ok(())
        },
    );

    let started = Instant::now();
    let got = thread::scope(|s| {
        let run = s.spawn(|| engine.start(&ctx));
        thread::sleep(Duration::from_millis(50));
        cancel.cancel();
        run.join().unwrap()
    });

    assert!(started.elapsed() < Duration::from_secs(5));
    drop(engine);
    let returned = returned.into_inner().unwrap();
    assert!(!returned.is_empty());
    assert_eq!(got.fetched_count() + returned.len(), 100);
    assert!(got.total_count() <= got.fetched_count());
}

#[test]
fn test_send_on_cancelled_context_hands_item_back() {
    let (ctx, cancel) = WorkContext::with_cancel();
    let result = Mutex::new(None);
    let engine = WorkEngine::new(
        config(1, 1),
        |_ctx, fetched, tx| {
            // The worker is busy with item 0 and item 1 fills the buffer, so item 2 can only
            // end by cancellation.
            for id in 0..3 {
                match tx.send(WorkItem { id }) {
                    Ok(()) => fetched.increment(),
                    Err(e) => {
                        *result.lock().unwrap() = Some(e);
                        break;
                    }
                }
                if id == 1 {
                    cancel.cancel();
                }
            }
            Ok(())
        },
        |_ctx, _item| {
            thread::sleep(Duration::from_millis(200));
            Ok(())
        },
    );
    engine.start(&ctx);

    drop(engine);
    match result.into_inner().unwrap() {
        Some(SendError::Cancelled(item)) => assert_eq!(item.id, 2),
        other => panic!("expected a cancelled send, got {other:?}"),
    }
}

#[test]
fn test_timeout_context_stops_run() {
    let (ctx, _cancel) = WorkContext::with_timeout(Duration::from_millis(100));
    let engine = WorkEngine::new(config(50, 2), push_items(50), |_ctx, _item: WorkItem| {
        thread::sleep(Duration::from_millis(200));
        Ok(())
    });
    let got = engine.start(&ctx);

    assert!(ctx.is_cancelled());
    assert_eq!(got.fetched_count(), 50);
    assert!(got.total_count() < 50);
}
