//! Scenario test suites
//!
//! Tests are grouped by the part of the engine they exercise; the example
//! types and listeners they share live in `example_types`.

#[cfg(test)]
mod type_tests;
#[cfg(test)]
mod view_tests;
#[cfg(test)]
mod integration;
