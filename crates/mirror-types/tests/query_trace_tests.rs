use super::*;
use crate::test_fixtures::Jdk;
use std::io;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[test]
fn test_disabled_without_subscriber() {
    assert!(!enabled());
}

#[test]
fn test_query_events_are_json() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(Level::TRACE)
        .with_writer(move || writer.clone())
        .finish();

    let jdk = Jdk::new();
    tracing::subscriber::with_default(subscriber, || {
        assert!(enabled());
        let cache = jdk.cache();
        let number = cache.reflect(&HostType::Class(jdk.number)).unwrap();
        let integer = cache.reflect(&HostType::Class(jdk.integer)).unwrap();
        let strings = jdk.generic(&cache, jdk.list, &[jdk.ty(&cache, jdk.string)]);
        assert!(cache.is_assignable_from(number, integer).unwrap());
        assert_ne!(strings, jdk.ty(&cache, jdk.list));
    });

    let text = captured.text();
    assert!(text.contains("\"target\":\"mirror::query_json\""));
    assert!(text.contains("\"op\":\"reflect\""));
    assert!(text.contains("\"handle_kind\":\"class\""));
    assert!(text.contains("\"op\":\"is_assignable_from\""));
    assert!(text.contains("\"event\":\"specialize\""));
    assert!(text.lines().all(|line| line.starts_with('{')));
}

#[test]
fn test_query_ids_increase() {
    let first = next_query_id();
    let second = next_query_id();
    assert!(second > first);
}
