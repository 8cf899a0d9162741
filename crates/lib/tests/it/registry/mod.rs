//! Registry integration tests
//!
//! Token issuing, validation and resolution through the public API.

mod token_lifecycle;
