use std::path::Path;

use serde::Serialize;
use tracing::instrument;

use super::{
    render::{self, print_json, OutputFormat, QuestionJson},
    session::{Credentials, Session},
};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,

    /// Only show questions you haven't answered yet
    #[arg(long)]
    unanswered: bool,
}

#[derive(Debug, Serialize)]
struct ThreadJson<'a> {
    thread: u32,
    questions: Vec<QuestionJson<'a>>,
}

impl Command {
    #[instrument(skip(credentials))]
    pub fn run(self, root: &Path, credentials: &Credentials) -> anyhow::Result<()> {
        let session = Session::open(root, credentials)?;
        let store = &session.questions;

        let threads: Vec<_> = store
            .questions_to_user(session.user_id())
            .into_iter()
            .map(|(thread, ids)| {
                let questions: Vec<_> = ids
                    .into_iter()
                    .filter_map(|id| store.question(id))
                    .filter(|question| !(self.unanswered && question.is_answered()))
                    .collect();
                (thread, questions)
            })
            .filter(|(_, questions)| !questions.is_empty())
            .collect();

        if let OutputFormat::Json = self.output {
            let json: Vec<_> = threads
                .iter()
                .map(|(thread, questions)| ThreadJson {
                    thread: thread.get(),
                    questions: questions.iter().copied().map(QuestionJson::from).collect(),
                })
                .collect();
            return print_json(&json);
        }

        if threads.is_empty() {
            println!("No questions to you.");
            return Ok(());
        }

        for (_, questions) in &threads {
            for question in questions {
                render::question_to_me(&session.users, question);
            }
            println!();
        }
        Ok(())
    }
}
