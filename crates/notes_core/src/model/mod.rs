//! Domain model for the create-note use case.
//!
//! # Responsibility
//! - Define the value objects, entities, commands and events that flow
//!   through the workflow.
//! - Keep every record immutable and default-constructible through its
//!   `TaggedRecord` factory.
//!
//! # Invariants
//! - Every entity, command and event is identified by an `Id`.
//! - Workflow code never constructs entities; they come from adapters.

pub mod command;
pub mod entity;
pub mod event;
pub mod value;
