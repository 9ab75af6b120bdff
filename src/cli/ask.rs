use std::path::Path;

use askbox::{NewQuestion, QuestionId, UserId};
use tracing::instrument;

use super::{
    render::user_label,
    session::{Credentials, Session},
    terminal::Colorize,
};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The id of the user to ask
    to: UserId,

    /// The question
    text: String,

    /// Reply in the thread started by this question
    #[arg(long, short)]
    parent: Option<QuestionId>,

    /// Hide your name from the recipient
    #[arg(long, short)]
    anonymous: bool,
}

impl Command {
    #[instrument(skip(credentials))]
    pub fn run(self, root: &Path, credentials: &Credentials) -> anyhow::Result<()> {
        let mut session = Session::open(root, credentials)?;
        let recipient = session.users.require(self.to)?;

        let anonymous = if self.anonymous && !recipient.allows_anonymous() {
            eprintln!(
                "{}",
                format!(
                    "Note: {} does not accept anonymous questions, asking with your name",
                    recipient.username()
                )
                .warning()
            );
            false
        } else {
            self.anonymous
        };

        let question = session.questions.ask(
            NewQuestion {
                from: session.user.id(),
                to: self.to,
                anonymous,
                parent: self.parent,
                text: self.text,
            },
            &session.users,
        )?;

        let thread = question
            .parent()
            .map(|parent| format!(" in thread {parent}"))
            .unwrap_or_default();
        println!(
            "{}",
            format!(
                "Asked question {} to {}{thread}",
                question.id(),
                user_label(&session.users, question.recipient())
            )
            .success()
        );
        Ok(())
    }
}
