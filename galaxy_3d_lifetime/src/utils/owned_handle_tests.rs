use super::*;

#[test]
fn test_new_handle_is_valid() {
    let handle = OwnedHandle::new(42u64);
    assert!(handle.is_valid());
    assert_eq!(handle.get(), Some(&42));
}

#[test]
fn test_take_empties_the_wrapper() {
    let mut handle = OwnedHandle::new(7u64);
    assert_eq!(handle.take(), Some(7));
    assert!(!handle.is_valid());
    // Taking twice yields nothing: ownership moved out once
    assert_eq!(handle.take(), None);
}

#[test]
fn test_default_is_empty() {
    let handle: OwnedHandle<u64> = OwnedHandle::default();
    assert!(!handle.is_valid());
    assert_eq!(handle.get(), None);
}

#[test]
fn test_retire_with_hands_over_exactly_once() {
    let mut retired = Vec::new();

    let handle = OwnedHandle::from(3u64);
    assert!(handle.retire_with(|h| retired.push(h)));

    let mut emptied = OwnedHandle::new(4u64);
    emptied.take();
    assert!(!emptied.retire_with(|h| retired.push(h)));

    assert_eq!(retired, vec![3]);
}

#[test]
fn test_debug_format() {
    let handle = OwnedHandle::new(9u32);
    assert_eq!(format!("{:?}", handle), "OwnedHandle(Some(9))");
    let mut handle = handle;
    handle.take();
    assert_eq!(format!("{:?}", handle), "OwnedHandle(None)");
}
