/// Tests for BinarySemaphore

use super::*;
use std::sync::Arc;
use std::thread;

#[test]
fn test_new_semaphore_is_waited() {
    let semaphore = BinarySemaphore::new(7u64);
    assert_eq!(*semaphore.handle(), 7);
    assert_eq!(semaphore.crossings(), 0);
    assert!(semaphore.is_waited());
    assert!(!semaphore.is_signaled());
}

#[test]
fn test_signal_then_wait_alternates_parity() {
    let semaphore = BinarySemaphore::new(1u64);

    semaphore.signal();
    assert!(semaphore.is_signaled());
    assert_eq!(semaphore.crossings(), 1);

    semaphore.wait();
    assert!(semaphore.is_waited());
    assert_eq!(semaphore.crossings(), 2);

    for _ in 0..10 {
        semaphore.signal();
        semaphore.wait();
    }
    assert_eq!(semaphore.crossings(), 22);
    assert!(semaphore.is_waited());
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "already signaled")]
fn test_double_signal_asserts_in_debug() {
    let semaphore = BinarySemaphore::new(1u64);
    semaphore.signal();
    semaphore.signal();
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "never signaled")]
fn test_wait_without_signal_asserts_in_debug() {
    let semaphore = BinarySemaphore::new(1u64);
    semaphore.wait();
}

#[test]
fn test_state_visible_from_another_thread() {
    let semaphore = Arc::new(BinarySemaphore::new(3u64));
    semaphore.signal();

    let observer = Arc::clone(&semaphore);
    let signaled = thread::spawn(move || observer.is_signaled()).join().unwrap();
    assert!(signaled);
}

#[test]
fn test_into_handle_returns_device_handle() {
    let semaphore = BinarySemaphore::new(42u64);
    semaphore.signal();
    assert_eq!(semaphore.into_handle(), 42);
}

#[test]
fn test_debug_shows_crossings() {
    let semaphore = BinarySemaphore::new(5u64);
    semaphore.signal();
    assert_eq!(format!("{:?}", semaphore), "BinarySemaphore { handle: 5, crossings: 1 }");
}
