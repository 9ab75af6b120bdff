//! Display of questions and users.
//!
//! Authors of anonymous questions are never shown, whoever is looking.

use askbox::{Question, User, UserDirectory, UserId};
use serde::Serialize;

use super::terminal::Colorize;

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

/// A question as exposed in JSON output.
#[derive(Debug, Serialize)]
pub struct QuestionJson<'a> {
    id: u32,
    thread: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<u32>,
    to: u32,
    anonymous: bool,
    text: &'a str,
    answer: Option<&'a str>,
}

impl<'a> From<&'a Question> for QuestionJson<'a> {
    fn from(question: &'a Question) -> Self {
        Self {
            id: question.id().get(),
            thread: question.thread().get(),
            parent: question.parent().map(askbox::QuestionId::get),
            from: question.visible_author().map(UserId::get),
            to: question.recipient().get(),
            anonymous: question.is_anonymous(),
            text: question.text(),
            answer: question.answer(),
        }
    }
}

/// A user as exposed in JSON output.
#[derive(Debug, Serialize)]
pub struct UserJson<'a> {
    id: u32,
    username: &'a str,
    name: &'a str,
    allows_anonymous: bool,
}

impl<'a> From<&'a User> for UserJson<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: user.id().get(),
            username: user.username(),
            name: user.name(),
            allows_anonymous: user.allows_anonymous(),
        }
    }
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `alice (#1)`, or just `#1` for users that no longer exist.
pub fn user_label(users: &UserDirectory, id: UserId) -> String {
    users.user(id).map_or_else(
        || format!("#{id}"),
        |user| format!("{} (#{id})", user.username()),
    )
}

fn heading(question: &Question) -> String {
    let id = format!("Question {}", question.id()).accent();
    match question.parent() {
        Some(parent) => format!("  {} {id}", format!("↳ in thread {parent}").dim()),
        None => id,
    }
}

fn indent(question: &Question) -> &'static str {
    if question.is_thread_root() { "  " } else { "    " }
}

/// A question as seen by its recipient.
pub fn question_to_me(users: &UserDirectory, question: &Question) {
    let from = question
        .visible_author()
        .map_or_else(|| "anonymous".dim(), |author| user_label(users, author));
    println!("{} from {from}", heading(question));
    println!("{}Q: {}", indent(question), question.text());
    match question.answer() {
        Some(answer) => println!("{}A: {answer}", indent(question)),
        None => println!("{}{}", indent(question), "not answered yet".warning()),
    }
}

/// A question as seen by its author.
pub fn question_from_me(users: &UserDirectory, question: &Question) {
    let anonymously = if question.is_anonymous() {
        format!(" {}", "(anonymously)".dim())
    } else {
        String::new()
    };
    println!(
        "{} to {}{anonymously}",
        heading(question),
        user_label(users, question.recipient())
    );
    println!("{}Q: {}", indent(question), question.text());
    match question.answer() {
        Some(answer) => println!("{}A: {answer}", indent(question)),
        None => println!("{}{}", indent(question), "not answered yet".warning()),
    }
}

/// A question as anyone may see it.
pub fn public_question(users: &UserDirectory, question: &Question) {
    let from = question
        .visible_author()
        .map_or_else(|| "anonymous".dim(), |author| user_label(users, author));
    println!(
        "{} from {from} to {}",
        heading(question),
        user_label(users, question.recipient())
    );
    println!("{}Q: {}", indent(question), question.text());
    if let Some(answer) = question.answer() {
        println!("{}A: {answer}", indent(question));
    }
}
