use herald::*;

#[test]
fn test_basic_logging_functions() {
  warn("Test warning message");
  error("Test error message");
  success("Test success message");
  verbose("Test verbose message");
}

#[test]
fn test_multiline_messages() {
  let multiline_msg = "First line\nSecond line\nThird line";
  warn(multiline_msg);
  error(multiline_msg);
}

#[test]
fn test_banners() {
  announce("Definition");
}

#[test]
fn test_journal_is_exported() {
  let mut journal = AttemptJournal::new(8);
  journal.record("abc", 1, "warn", "retry");
  let entry: &JournalEntry = &journal.entries()[0];
  assert_eq!(entry.request_id, "abc");
}

#[test]
fn test_empty_handle_renders_nothing() {
  let handle = JournalHandle::new(8);
  assert!(handle.entries().is_empty());
  assert_eq!(handle.render(), "");
}
