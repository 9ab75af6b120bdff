//! Plain-text Question Board
//!
//! Users ask each other questions, optionally anonymously and optionally as
//! replies in an existing thread, and answer the questions addressed to them.
//! Questions and users are stored as delimited text files.

pub mod domain;
pub use domain::{
    Config, NewQuestion, NewUser, Question, QuestionId, TextError, ThreadIndex, User, UserId,
    UserIdentity, UserLookup,
};

/// Flat-file storage for questions and users.
pub mod storage;
pub use storage::{AnswerOutcome, QuestionStore, StoreError, UserDirectory, UserError};
