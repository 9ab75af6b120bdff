/// Record line format for questions.
pub mod codec;
pub mod lines;
pub mod store;
pub mod users;

pub use codec::{decode_question, encode_question, DecodeError, DELIMITER};
pub use store::{AnswerOutcome, QuestionStore, StoreError};
pub use users::{UserDirectory, UserError};
