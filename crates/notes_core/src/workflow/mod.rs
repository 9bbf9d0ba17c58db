//! Use-case workflows.
//!
//! # Responsibility
//! - Compose adapter calls and the access engine into top-level operations.
//! - Translate every adapter fault into a `WorkflowError`.

pub mod create_note;
