//! Integration tests for rxlite
//!
//! Tests operator chains, the delivery contract and threading behavior
//! through the public API only.

use std::{
  collections::HashSet,
  sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
  },
  thread,
  time::Duration,
};

use crossbeam::channel::{self, Receiver};
use rxlite::{of_sequence, prelude::*};

#[derive(Debug, PartialEq)]
enum Event<T> {
  Next(T),
  Error(String),
  Complete,
}

/// Subscribes and forwards every notification to a channel.
fn events<T: Send + 'static>(source: Observable<T>) -> (Subscription, Receiver<Event<T>>) {
  let (tx, rx) = channel::unbounded();
  let (tx_err, tx_complete) = (tx.clone(), tx.clone());
  let subscription = source.subscribe_all(
    move |v| {
      let _ = tx.send(Event::Next(v));
    },
    move |e| {
      let _ = tx_err.send(Event::Error(e.to_string()));
    },
    move || {
      let _ = tx_complete.send(Event::Complete);
    },
  );
  (subscription, rx)
}

/// Collects notifications until the first terminal one, then checks nothing
/// follows it for a short while.
fn until_terminal<T>(rx: &Receiver<Event<T>>) -> Vec<Event<T>> {
  let mut got = vec![];
  loop {
    let event = rx.recv_timeout(Duration::from_secs(5)).expect("terminal notification");
    let terminal = !matches!(event, Event::Next(_));
    got.push(event);
    if terminal {
      break;
    }
  }
  assert!(rx.recv_timeout(Duration::from_millis(50)).is_err(), "notification after terminal");
  got
}

#[test]
fn of_delivers_in_order_then_completes() {
  let (_, rx) = events(of_sequence!("A", "B", "C"));
  assert_eq!(
    until_terminal(&rx),
    vec![Event::Next("A"), Event::Next("B"), Event::Next("C"), Event::Complete]
  );
}

#[test]
fn map_filter_chain() {
  let (_, rx) = events(observable::from_iter(1..=10).map(|x| x * 2).filter(|x| *x > 10));
  assert_eq!(
    until_terminal(&rx),
    vec![
      Event::Next(12),
      Event::Next(14),
      Event::Next(16),
      Event::Next(18),
      Event::Next(20),
      Event::Complete
    ]
  );
}

#[test]
fn map_and_filter_relay_errors() {
  let source = observable::of(1)
    .concat(observable::throw_err(RxError::msg("broken source")))
    .map(|x| x + 1)
    .filter(|_| true);
  let (_, rx) = events(source);
  assert_eq!(
    until_terminal(&rx),
    vec![Event::Next(2), Event::Error("broken source".to_string())]
  );
}

#[test]
fn concat_runs_second_after_first() {
  let (_, rx) = events(ops::concat(observable::of(1), observable::of(2)));
  assert_eq!(until_terminal(&rx), vec![Event::Next(1), Event::Next(2), Event::Complete]);
}

#[test]
fn concat_skips_second_after_error() {
  let subscribed = Arc::new(AtomicUsize::new(0));
  let c_subscribed = subscribed.clone();
  let second = Observable::create(move |s: Subscriber<i32>| {
    c_subscribed.fetch_add(1, Ordering::Relaxed);
    s.complete();
  });

  let (_, rx) = events(observable::throw_err(RxError::msg("first failed")).concat(second));
  assert_eq!(until_terminal(&rx), vec![Event::Error("first failed".to_string())]);
  assert_eq!(subscribed.load(Ordering::Relaxed), 0);
}

#[test]
fn merge_delivers_every_value_once() {
  let a = of_sequence!("A1", "A2").subscribe_on(scheduler::io());
  let b = observable::of("B1").subscribe_on(scheduler::io());
  let (_, rx) = events(a.merge(b));

  let got = until_terminal(&rx);
  assert_eq!(got.last(), Some(&Event::Complete));
  let values: HashSet<_> = got
    .iter()
    .filter_map(|e| match e {
      Event::Next(v) => Some(*v),
      _ => None,
    })
    .collect();
  assert_eq!(got.len(), 4);
  assert_eq!(values, HashSet::from(["A1", "A2", "B1"]));
}

#[test]
fn merge_with_concurrent_errors_delivers_one_error() {
  let sources: Vec<_> = (0..16)
    .map(|i| {
      of_sequence!(i, i + 100)
        .concat(observable::throw_err(RxError::msg(format!("source {i}"))))
        .subscribe_on(scheduler::computation())
    })
    .collect();
  let (_, rx) = events(ops::merge(sources));

  let got = until_terminal(&rx);
  let errors = got.iter().filter(|e| matches!(e, Event::Error(_))).count();
  assert_eq!(errors, 1);
  assert_eq!(got.len(), 33);
}

#[test]
fn flat_map_under_thread_pools() {
  for _ in 0..20 {
    let source = of_sequence!(1, 2)
      .subscribe_on(scheduler::io())
      .flat_map(|x| of_sequence!(x, x * 10).subscribe_on(scheduler::computation()));
    let (_, rx) = events(source);

    let got = until_terminal(&rx);
    assert_eq!(got.last(), Some(&Event::Complete));
    let mut values: Vec<_> = got
      .iter()
      .filter_map(|e| match e {
        Event::Next(v) => Some(*v),
        _ => None,
      })
      .collect();
    values.sort();
    assert_eq!(values, vec![1, 2, 10, 20]);
  }
}

#[test]
fn reduce_sums() {
  let (_, rx) = events(of_sequence!(2, 3, 5).reduce(|acc, v| acc + v));
  assert_eq!(until_terminal(&rx), vec![Event::Next(10), Event::Complete]);

  let (_, rx) = events(observable::empty::<i32>().reduce(|acc, v| acc + v));
  assert_eq!(until_terminal(&rx), vec![Event::Complete]);
}

#[test]
fn disposed_before_emission_delivers_nothing() {
  let recipe_ran = Arc::new(AtomicUsize::new(0));
  let c_recipe_ran = recipe_ran.clone();
  let (release_tx, release_rx) = channel::bounded::<()>(1);

  let source = Observable::create(move |s: Subscriber<i32>| {
    let _ = release_rx.recv_timeout(Duration::from_secs(5));
    c_recipe_ran.fetch_add(1, Ordering::Relaxed);
    s.next(1);
    s.complete();
  })
  .subscribe_on(scheduler::io());

  let (subscription, rx) = events(source);
  subscription.unsubscribe();
  release_tx.send(()).unwrap();

  assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
  assert_eq!(recipe_ran.load(Ordering::Relaxed), 1);
}

#[test]
fn observe_on_single_shares_one_thread() {
  let (tx, rx) = channel::unbounded();
  for name in ["first", "second"] {
    let tx = tx.clone();
    of_sequence!(1, 2, 3)
      .subscribe_on(scheduler::io())
      .observe_on(scheduler::single())
      .subscribe(move |_| tx.send((name, thread::current().id())).unwrap());
  }

  let got: Vec<_> = (0..6).map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap()).collect();
  assert!(got.iter().all(|(_, id)| *id == got[0].1));
  assert!(got.iter().any(|(name, _)| *name == "first"));
  assert!(got.iter().any(|(name, _)| *name == "second"));
}

#[test]
fn subscribe_on_moves_the_subscription() {
  let caller = thread::current().id();
  let (tx, rx) = channel::bounded(1);
  Observable::create(move |s: Subscriber<()>| {
    tx.send(thread::current().id()).unwrap();
    s.complete();
  })
  .subscribe_on(scheduler::io())
  .subscribe(|_| {});

  assert_ne!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), caller);
}

#[test]
fn recipe_panic_surfaces_as_error() {
  let (_, rx) = events(Observable::create(|s: Subscriber<i32>| {
    s.next(1);
    panic!("lost connection");
  }));
  assert_eq!(
    until_terminal(&rx),
    vec![Event::Next(1), Event::Error("panicked in `subscribe`: lost connection".to_string())]
  );
}

#[test]
fn pipeline_across_schedulers() {
  let received = Arc::new(Mutex::new(vec![]));
  let c_received = received.clone();
  let (done_tx, done_rx) = channel::bounded(1);

  observable::from_iter(1..=5)
    .map(|x| x * 10)
    .filter(|x| *x != 30)
    .subscribe_on(scheduler::io())
    .observe_on(scheduler::single())
    .flat_map(|x| of_sequence!(x, x + 1))
    .reduce_initial(0, |acc, x| acc + x)
    .subscribe_all(
      move |v| c_received.lock().unwrap().push(v),
      |e| panic!("{e}"),
      move || done_tx.send(()).unwrap(),
    );

  done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
  // 10+11 + 20+21 + 40+41 + 50+51
  assert_eq!(*received.lock().unwrap(), vec![244]);
}
