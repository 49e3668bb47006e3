//! Scheduler test suite
