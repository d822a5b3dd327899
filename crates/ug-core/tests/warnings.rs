//! Diagnostics emitted while loading patterns.

use std::cell::RefCell;
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};
use ug_core::{AccessType, UrlGroup};

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Keeps records per test thread so parallel tests do not see each other.
struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        let message = record.args().to_string();
        RECORDS.with(|r| r.borrow_mut().push((record.level(), message)));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

fn capture() {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).expect("logger already set");
        log::set_max_level(LevelFilter::Trace);
    });
    RECORDS.with(|r| r.borrow_mut().clear());
}

fn warnings() -> Vec<String> {
    RECORDS.with(|r| {
        r.borrow()
            .iter()
            .filter(|(level, _)| *level == Level::Warn)
            .map(|(_, message)| message.clone())
            .collect()
    })
}

#[test]
fn malformed_pattern_emits_one_warning() {
    for access in [AccessType::Regexp, AccessType::Replace, AccessType::Redir] {
        capture();
        let mut group = UrlGroup::new(1, access);
        assert!(group.add_url("(unclosed").is_err());

        let warnings = warnings();
        assert_eq!(warnings.len(), 1, "{access}: {warnings:?}");
        assert!(warnings[0].contains("(unclosed"));
        assert!(group.is_empty());
    }
}

#[test]
fn valid_patterns_emit_no_warning() {
    capture();
    let mut group = UrlGroup::new(2, AccessType::Redir);
    let report = group.add_urls([r"^ads\..*", r".*\.doubleclick\.net/.*"]);
    assert!(report.is_clean());
    assert!(warnings().is_empty());
}

#[test]
fn batch_warns_once_per_rejected_pattern() {
    capture();
    let mut group = UrlGroup::new(3, AccessType::Regexp);
    let report = group.add_urls(["ok.*", "[", "also.*", "(", "*"]);
    assert_eq!(report.added, 2);
    assert_eq!(report.rejected.len(), 3);
    assert_eq!(warnings().len(), 3);
    assert_eq!(group.len(), group.compiled_len());
}

#[test]
fn match_is_logged_at_debug() {
    capture();
    let mut group = UrlGroup::new(4, AccessType::Deny);
    group.add_url("mail.ru").unwrap();
    assert!(group.has_url("http://www.mail.ru/"));

    let found = RECORDS.with(|r| {
        r.borrow()
            .iter()
            .any(|(level, message)| *level == Level::Debug && message.contains("is part of net mail.ru"))
    });
    assert!(found);
}
