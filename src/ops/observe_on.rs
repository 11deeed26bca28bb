use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

use parking_lot::Mutex;

use crate::{
  error::{catch_panic, RxError},
  observable::Observable,
  observer::Observer,
  scheduler::Scheduler,
  subscriber::Subscriber,
};

impl<Item: Send + 'static> Observable<Item> {
  /// Re-emits every notification from the source on `scheduler`.
  ///
  /// The source is subscribed on the calling thread; each `next` is then
  /// submitted to `scheduler` as its own task. Values keep their order only
  /// when the scheduler runs tasks in submission order, as
  /// [`SingleThread`](crate::scheduler::SingleThread) and
  /// [`Immediate`](crate::scheduler::Immediate) do. On any scheduler, `error`
  /// or `complete` is delivered only after every value scheduled before it.
  pub fn observe_on<SD>(self, scheduler: SD) -> Observable<Item>
  where
    SD: Scheduler + 'static,
  {
    let scheduler = Arc::new(scheduler);
    Observable::create(move |observer| {
      let state = Arc::new(ObserveOnState {
        observer,
        in_flight: AtomicUsize::new(0),
        terminal: Mutex::new(None),
      });
      self.subscribe_with(ObserveOnObserver { state, scheduler: scheduler.clone() });
    })
  }
}

enum Terminal {
  Error(RxError),
  Complete,
}

struct ObserveOnState<Item> {
  observer: Subscriber<Item>,
  /// `next` tasks scheduled but not finished yet.
  in_flight: AtomicUsize,
  /// A terminal notification held back until `in_flight` drops to zero.
  terminal: Mutex<Option<Terminal>>,
}

impl<Item> ObserveOnState<Item> {
  fn deliver(&self, value: Item) {
    let delivered = catch_panic("observe_on", || self.observer.next(value));
    if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
      self.flush_terminal();
    }
    if let Err(err) = delivered {
      tracing::error!(error = %err, "observer panicked on a scheduled value");
    }
  }

  /// Delivers the held terminal, if any. Only one caller gets to take it.
  fn flush_terminal(&self) {
    let terminal = self.terminal.lock().take();
    match terminal {
      Some(Terminal::Error(err)) => self.observer.error(err),
      Some(Terminal::Complete) => self.observer.complete(),
      None => {}
    }
  }
}

pub struct ObserveOnObserver<Item, SD> {
  state: Arc<ObserveOnState<Item>>,
  scheduler: Arc<SD>,
}

impl<Item: Send + 'static, SD: Scheduler> ObserveOnObserver<Item, SD> {
  fn hold_terminal(&self, terminal: Terminal) {
    if self.state.observer.is_closed() {
      return;
    }
    *self.state.terminal.lock() = Some(terminal);
    // otherwise the last in-flight value delivers it
    if self.state.in_flight.load(Ordering::SeqCst) == 0 {
      let state = self.state.clone();
      self.scheduler.schedule(Box::new(move || state.flush_terminal()));
    }
  }
}

impl<Item, SD> Observer<Item> for ObserveOnObserver<Item, SD>
where
  Item: Send + 'static,
  SD: Scheduler,
{
  fn next(&self, value: Item) {
    if !self.state.observer.is_closed() {
      self.state.in_flight.fetch_add(1, Ordering::SeqCst);
      let state = self.state.clone();
      self.scheduler.schedule(Box::new(move || state.deliver(value)));
    }
  }

  fn error(&self, err: RxError) { self.hold_terminal(Terminal::Error(err)) }

  fn complete(&self) { self.hold_terminal(Terminal::Complete) }

  fn is_closed(&self) -> bool { self.state.observer.is_closed() }
}
