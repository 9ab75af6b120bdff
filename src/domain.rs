//! Domain models for the question board.
//!
//! This module contains the core domain types: questions and their
//! identifiers, the thread index, users, and configuration.

/// Question domain model.
pub mod question;
pub use question::{validate_text, NewQuestion, Question, QuestionId, TextError, UserId};

mod config;
pub use config::Config;

/// Grouping of questions into threads.
pub mod thread;
pub use thread::ThreadIndex;

/// User domain model.
pub mod user;
pub use user::{NewUser, User, UserIdentity, UserLookup};
