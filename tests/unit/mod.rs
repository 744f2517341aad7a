//! Unit test suite for context-copy
//!
//! Property-style checks of the public data model, run against the library
//! API only.
//!
//! ```bash
//! cargo test --test unit
//! ```

mod tree_properties;
