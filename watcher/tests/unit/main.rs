//! Unit test harness

mod test_notify;
mod test_snapshot;
mod test_watcher;
