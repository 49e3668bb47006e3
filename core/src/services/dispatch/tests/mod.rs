//! Tests for channel dispatch


mod dispatcher_tests;
