use std::path::Path;

use askbox::{AnswerOutcome, QuestionId};
use tracing::instrument;

use super::{
    render,
    session::{Credentials, Session},
    terminal::Colorize,
};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The id of the question to answer
    id: QuestionId,

    /// The answer
    text: String,
}

impl Command {
    #[instrument(skip(credentials))]
    pub fn run(self, root: &Path, credentials: &Credentials) -> anyhow::Result<()> {
        let mut session = Session::open(root, credentials)?;

        let question = session
            .questions
            .question_for_recipient(self.id, session.user.id())?;
        render::question_to_me(&session.users, question);

        match session.questions.answer(self.id, self.text)? {
            AnswerOutcome::Answered => {
                println!("{}", format!("Answered question {}", self.id).success());
            }
            AnswerOutcome::Overwritten { previous } => {
                eprintln!(
                    "{}",
                    format!("Warning: question {} was already answered", self.id).warning()
                );
                eprintln!("{}", format!("Replaced: {previous}").dim());
                println!("{}", format!("Updated answer to question {}", self.id).success());
            }
        }
        Ok(())
    }
}
