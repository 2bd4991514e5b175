// Adapter tests - poll contract over a scripted looper

mod common;

use common::{fired, reserved, ScriptedLooper};
use looper_poll::core::event::looper::LooperPoll;
use looper_poll::{Interest, LooperEvents, PollAdapter, PollBackend, PollFd, PollTimeout};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

fn fds_of(adapter: &PollAdapter<ScriptedLooper>) -> Vec<i32> {
    adapter.snapshot().iter().map(|p| p.fd).collect()
}

fn looper(adapter: &PollAdapter<ScriptedLooper>) -> &ScriptedLooper {
    adapter.looper().unwrap()
}

#[test]
fn test_snapshot_matches_each_call() {
    let mut adapter = PollAdapter::new(ScriptedLooper::new());

    let mut first = [
        PollFd::new(5, Interest::READABLE),
        PollFd::new(9, Interest::WRITABLE),
    ];
    assert_eq!(adapter.poll(&mut first, PollTimeout::from_millis(0)), 0);
    assert_eq!(adapter.snapshot(), &first);

    let mut second = [PollFd::new(7, Interest::READABLE | Interest::WRITABLE)];
    assert_eq!(adapter.poll(&mut second, PollTimeout::from_millis(0)), 0);
    assert_eq!(adapter.snapshot(), &second);

    let mut empty: [PollFd; 0] = [];
    assert_eq!(adapter.poll(&mut empty, PollTimeout::from_millis(0)), 0);
    assert!(adapter.snapshot().is_empty());
}

#[test]
fn test_vanished_descriptor_removed_once() {
    let mut adapter = PollAdapter::new(ScriptedLooper::new());

    let mut both = [
        PollFd::new(5, Interest::READABLE),
        PollFd::new(9, Interest::READABLE),
    ];
    adapter.poll(&mut both, PollTimeout::from_millis(0));
    assert_eq!(looper(&adapter).removals_of(9), 0);

    let mut only_five = [PollFd::new(5, Interest::READABLE)];
    adapter.poll(&mut only_five, PollTimeout::from_millis(0));
    assert_eq!(looper(&adapter).removals_of(9), 1);

    adapter.poll(&mut only_five, PollTimeout::from_millis(0));
    assert_eq!(looper(&adapter).removals_of(9), 1);
    assert_eq!(looper(&adapter).removals_of(5), 0);
    assert!(!looper(&adapter).registered.borrow().contains_key(&9));
}

#[test]
fn test_repeated_registration_is_idempotent() {
    let mut adapter = PollAdapter::new(ScriptedLooper::new());
    let mut fds = [PollFd::new(5, Interest::READABLE)];

    assert_eq!(adapter.poll(&mut fds, PollTimeout::from_millis(0)), 0);
    assert_eq!(adapter.poll(&mut fds, PollTimeout::from_millis(0)), 0);

    let looper = looper(&adapter);
    assert_eq!(*looper.add_calls.borrow(), vec![5, 5]);
    assert!(looper.removed.borrow().is_empty());
    assert_eq!(looper.registered.borrow().len(), 1);
    assert_eq!(looper.registered.borrow()[&5], (3, LooperEvents::INPUT));
}

#[test]
fn test_infinite_timeout_rewaits_after_reserved_event() {
    let processed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&processed);
    let script = ScriptedLooper::new()
        .then(reserved(1, 40, move || flag.set(true)))
        .then(fired(3, 5, LooperEvents::INPUT));
    let mut adapter = PollAdapter::new(script);
    let mut fds = [PollFd::new(5, Interest::READABLE)];

    assert_eq!(adapter.poll(&mut fds, PollTimeout::Infinite), 1);
    assert!(processed.get());
    assert_eq!(looper(&adapter).wait_count(), 2);
    assert!(looper(&adapter)
        .timeouts
        .borrow()
        .iter()
        .all(PollTimeout::is_infinite));
}

#[test]
fn test_callback_outcome_rewaits() {
    let script = ScriptedLooper::new()
        .then(LooperPoll::Callback)
        .then(fired(3, 5, LooperEvents::INPUT));
    let mut adapter = PollAdapter::new(script);
    let mut fds = [PollFd::new(5, Interest::READABLE)];

    assert_eq!(adapter.poll(&mut fds, PollTimeout::Infinite), 1);
    assert_eq!(looper(&adapter).wait_count(), 2);
}

#[test]
fn test_reserved_event_charges_the_budget() {
    let script = ScriptedLooper::new().then_after(Duration::from_millis(40), reserved(2, 41, || {}));
    let mut adapter = PollAdapter::new(script);
    let mut fds = [PollFd::new(5, Interest::READABLE)];

    assert_eq!(adapter.poll(&mut fds, PollTimeout::from_millis(100)), 0);

    let timeouts = looper(&adapter).timeouts.borrow().clone();
    assert_eq!(timeouts.len(), 2);
    assert_eq!(timeouts[0], PollTimeout::from_millis(100));
    let remaining = timeouts[1].remaining().unwrap();
    assert!(remaining <= Duration::from_millis(60), "remaining {:?}", remaining);
    assert!(!remaining.is_zero());
    assert_eq!(fds[0].revents, 0);
}

#[test]
fn test_wake_returns_zero() {
    let script = ScriptedLooper::new().then(LooperPoll::Wake);
    let mut adapter = PollAdapter::new(script);
    let mut fds = [PollFd::new(5, Interest::READABLE)];

    assert_eq!(adapter.poll(&mut fds, PollTimeout::Infinite), 0);
    assert_eq!(looper(&adapter).wait_count(), 1);
}

#[test]
fn test_readable_and_writable_pair() {
    let script = ScriptedLooper::new().then_after(
        Duration::from_millis(200),
        fired(4, 9, LooperEvents::OUTPUT),
    );
    let mut adapter = PollAdapter::new(script);
    let mut fds = [
        PollFd::new(5, Interest::READABLE),
        PollFd::new(9, Interest::WRITABLE),
    ];

    assert_eq!(adapter.poll(&mut fds, PollTimeout::from_millis(1000)), 1);

    assert_eq!(fds[1].ready(), Interest::WRITABLE);
    assert_eq!(fds[0].revents, 0);
    assert_eq!(looper(&adapter).removals_of(9), 1);
    assert_eq!(looper(&adapter).removals_of(5), 0);
    assert_eq!(fds_of(&adapter), vec![5, 9]);
}

#[test]
fn test_fired_descriptor_registered_again_next_call() {
    let script = ScriptedLooper::new().then(fired(3, 5, LooperEvents::INPUT));
    let mut adapter = PollAdapter::new(script);
    let mut fds = [PollFd::new(5, Interest::READABLE)];

    assert_eq!(adapter.poll(&mut fds, PollTimeout::from_millis(0)), 1);
    assert!(!looper(&adapter).registered.borrow().contains_key(&5));

    fds[0].revents = 0;
    assert_eq!(adapter.poll(&mut fds, PollTimeout::from_millis(0)), 0);
    assert!(looper(&adapter).registered.borrow().contains_key(&5));
}

#[test]
fn test_backend_trait_uses_millisecond_timeout() {
    let mut adapter = PollAdapter::new(ScriptedLooper::new());
    let mut fds = [PollFd::new(5, Interest::READABLE)];

    let backend: &mut dyn PollBackend = &mut adapter;
    assert_eq!(backend.poll(&mut fds, -1), 0);
    assert_eq!(backend.poll(&mut fds, 25), 0);

    let timeouts = looper(&adapter).timeouts.borrow().clone();
    assert_eq!(timeouts, vec![PollTimeout::Infinite, PollTimeout::from_millis(25)]);
}
