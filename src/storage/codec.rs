//! Line format for question records.
//!
//! Each question is a single line of seven fields separated by [`DELIMITER`]:
//!
//! ```text
//! id,parent_id,from_user_id,to_user_id,anonymous,text,answer
//! ```
//!
//! `parent_id` is `-1` for thread roots, `anonymous` is `0` or `1`, and an
//! empty `answer` means the question has not been answered. Nothing is
//! escaped: text fields are assumed free of the delimiter and of line breaks,
//! which [`validate_text`](crate::domain::validate_text) enforces on input.

use non_empty_string::NonEmptyString;

use crate::domain::{Question, QuestionId, UserId};

/// The field separator used by every record file.
pub const DELIMITER: char = ',';

/// The number of fields in a question record.
pub const QUESTION_FIELDS: usize = 7;

/// The `parent_id` value marking a thread root.
const NO_PARENT: &str = "-1";

/// A line that does not describe a well-formed record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The line has the wrong number of fields.
    #[error("expected {expected} fields, found {found}")]
    FieldCount {
        /// Fields a record must have.
        expected: usize,
        /// Fields the line has.
        found: usize,
    },
    /// A numeric field is not a canonical decimal integer in range.
    #[error("field `{field}` is not a valid integer: {value:?}")]
    Integer {
        /// Name of the offending field.
        field: &'static str,
        /// The raw field value.
        value: String,
    },
    /// A flag field is neither `0` nor `1`.
    #[error("field `{field}` must be 0 or 1, found {value:?}")]
    Flag {
        /// Name of the offending field.
        field: &'static str,
        /// The raw field value.
        value: String,
    },
    /// A field that must have content is empty.
    #[error("field `{field}` must not be empty")]
    Empty {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Serializes a question into a single record line, without terminator.
#[must_use]
pub fn encode_question(question: &Question) -> String {
    let id = question.id.to_string();
    let parent = question
        .parent
        .map_or_else(|| NO_PARENT.to_string(), |parent| parent.to_string());
    let from = question.from.to_string();
    let to = question.to.to_string();
    let anonymous = encode_flag(question.anonymous);
    let answer = question.answer.as_ref().map_or("", NonEmptyString::as_str);

    join_fields(&[
        id.as_str(),
        parent.as_str(),
        from.as_str(),
        to.as_str(),
        anonymous,
        question.text.as_str(),
        answer,
    ])
}

/// Parses a record line into a question.
///
/// # Errors
///
/// Returns an error if the line does not have exactly seven fields, if a
/// numeric field is not a canonical integer, if the anonymity flag is not
/// `0`/`1`, or if the question text is empty.
pub fn decode_question(line: &str) -> Result<Question, DecodeError> {
    let fields = split_fields(line, QUESTION_FIELDS)?;

    let id = QuestionId::new(parse_u32("id", fields[0])?);
    let parent = if fields[1] == NO_PARENT {
        None
    } else {
        Some(QuestionId::new(parse_u32("parent_id", fields[1])?))
    };
    let from = UserId::new(parse_u32("from_user_id", fields[2])?);
    let to = UserId::new(parse_u32("to_user_id", fields[3])?);
    let anonymous = parse_flag("anonymous", fields[4])?;
    let text = NonEmptyString::new(fields[5].to_string())
        .map_err(|_| DecodeError::Empty { field: "text" })?;
    let answer = NonEmptyString::new(fields[6].to_string()).ok();

    Ok(Question {
        id,
        parent,
        from,
        to,
        anonymous,
        text,
        answer,
    })
}

/// Joins fields with the delimiter.
pub(crate) fn join_fields(fields: &[&str]) -> String {
    let mut line = String::with_capacity(fields.iter().map(|f| f.len() + 1).sum());
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(DELIMITER);
        }
        line.push_str(field);
    }
    line
}

/// Splits a line into exactly `expected` fields.
pub(crate) fn split_fields(line: &str, expected: usize) -> Result<Vec<&str>, DecodeError> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() == expected {
        Ok(fields)
    } else {
        Err(DecodeError::FieldCount {
            expected,
            found: fields.len(),
        })
    }
}

/// Parses a canonical, unsigned decimal integer.
///
/// Non-canonical spellings such as `+1` or `007` are rejected so that every
/// accepted line re-encodes to the same bytes.
pub(crate) fn parse_u32(field: &'static str, value: &str) -> Result<u32, DecodeError> {
    value
        .parse::<u32>()
        .ok()
        .filter(|n| n.to_string() == value)
        .ok_or_else(|| DecodeError::Integer {
            field,
            value: value.to_string(),
        })
}

pub(crate) fn parse_flag(field: &'static str, value: &str) -> Result<bool, DecodeError> {
    match value {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(DecodeError::Flag {
            field,
            value: value.to_string(),
        }),
    }
}

pub(crate) const fn encode_flag(flag: bool) -> &'static str {
    if flag { "1" } else { "0" }
}
