use super::*;
use std::collections::HashSet;

#[derive(Debug)]
struct Payload(i64);

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "payload {}", self.0)
    }
}

#[test]
fn test_equal_contents_are_distinct_tokens() {
    let a = Opaque::new("overflow");
    let b = Opaque::new("overflow");
    assert_ne!(a, b);
    assert!(!a.ptr_eq(&b));
}

#[test]
fn test_clone_preserves_identity() {
    let a = Opaque::new("overflow");
    let b = a.clone();
    assert_eq!(a, b);
    assert!(a.ptr_eq(&b));
}

#[test]
fn test_hash_follows_identity() {
    let a = Opaque::new(1_i64);
    let b = Opaque::new(1_i64);

    let mut set = HashSet::new();
    set.insert(a.clone());
    set.insert(a.clone());
    set.insert(b);
    assert_eq!(set.len(), 2);
    assert!(set.contains(&a));
}

#[test]
fn test_display_and_debug_forward() {
    let token = Opaque::new(Payload(7));
    assert_eq!(token.to_string(), "payload 7");
    assert_eq!(format!("{token:?}"), "Payload(7)");
    assert_eq!(token.object().to_string(), "payload 7");
}

#[test]
fn test_downcast_ref() {
    let token = Opaque::new(Payload(3));
    assert_eq!(token.downcast_ref::<Payload>().map(|p| p.0), Some(3));
    assert!(token.downcast_ref::<String>().is_none());
}
