use std::{fmt, num::ParseIntError, str::FromStr};

use non_empty_string::NonEmptyString;

use crate::storage::codec::DELIMITER;

/// Identifier of a question.
///
/// Identifiers are assigned by the store in increasing order and are never
/// handed out twice during the lifetime of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuestionId(u32);

impl QuestionId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for QuestionId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuestionId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Identifier of a user, as handed out by the user directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(u32);

impl UserId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for UserId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A question asked by one user to another.
///
/// A question either starts a thread (it has no parent) or replies to the
/// root of an existing thread. Only the answer ever changes after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub(crate) id: QuestionId,
    pub(crate) parent: Option<QuestionId>,
    pub(crate) from: UserId,
    pub(crate) to: UserId,
    pub(crate) anonymous: bool,
    pub(crate) text: NonEmptyString,
    pub(crate) answer: Option<NonEmptyString>,
}

impl Question {
    /// Builds an unanswered question with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the question text is not valid free text (see
    /// [`validate_text`]).
    pub fn new(id: QuestionId, new: NewQuestion) -> Result<Self, TextError> {
        Ok(Self {
            id,
            parent: new.parent,
            from: new.from,
            to: new.to,
            anonymous: new.anonymous,
            text: validate_text(new.text)?,
            answer: None,
        })
    }

    /// The question's identifier.
    #[must_use]
    pub const fn id(&self) -> QuestionId {
        self.id
    }

    /// The root of the thread this question replies to, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<QuestionId> {
        self.parent
    }

    /// The identifier of the thread this question belongs to.
    ///
    /// This is the parent for replies, and the question itself for roots.
    #[must_use]
    pub fn thread(&self) -> QuestionId {
        self.parent.unwrap_or(self.id)
    }

    /// Whether this question starts a thread.
    #[must_use]
    pub const fn is_thread_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The author. Still recorded for anonymous questions.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.from
    }

    /// The recipient.
    #[must_use]
    pub const fn recipient(&self) -> UserId {
        self.to
    }

    /// Whether the author must be hidden from the recipient.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    /// The author as it may be shown to others, `None` for anonymous
    /// questions.
    #[must_use]
    pub const fn visible_author(&self) -> Option<UserId> {
        if self.anonymous { None } else { Some(self.from) }
    }

    /// The question body.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// The recipient's answer, if there is one.
    #[must_use]
    pub fn answer(&self) -> Option<&str> {
        self.answer.as_ref().map(NonEmptyString::as_str)
    }

    /// Whether the recipient has answered.
    #[must_use]
    pub const fn is_answered(&self) -> bool {
        self.answer.is_some()
    }

    /// Sets the answer, returning the answer it replaced.
    pub(crate) fn set_answer(&mut self, answer: NonEmptyString) -> Option<NonEmptyString> {
        self.answer.replace(answer)
    }
}

/// The caller-supplied part of a new question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    /// The asking user.
    pub from: UserId,
    /// The user being asked.
    pub to: UserId,
    /// Hide the author from the recipient.
    pub anonymous: bool,
    /// Root of the thread to reply to, or `None` to start a new thread.
    pub parent: Option<QuestionId>,
    /// The question body.
    pub text: String,
}

/// Reasons free text cannot be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The text is empty.
    #[error("text must not be empty")]
    Empty,
    /// The text contains the record field delimiter.
    #[error("text must not contain ','")]
    ContainsDelimiter,
    /// The text spans more than one line.
    #[error("text must fit on a single line")]
    ContainsNewline,
}

/// Checks that text can be stored in a single record field.
///
/// The record format does not escape anything, so the delimiter and line
/// breaks are rejected here rather than corrupting the file.
///
/// # Errors
///
/// Returns an error if the text is empty, contains the field delimiter, or
/// contains a line break.
pub fn validate_text(text: String) -> Result<NonEmptyString, TextError> {
    if text.contains(DELIMITER) {
        return Err(TextError::ContainsDelimiter);
    }
    if text.contains(['\n', '\r']) {
        return Err(TextError::ContainsNewline);
    }
    NonEmptyString::new(text).map_err(|_| TextError::Empty)
}
