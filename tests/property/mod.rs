//! Property-based tests

mod positionals;
