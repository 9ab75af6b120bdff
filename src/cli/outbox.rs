use std::path::Path;

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
}

impl Command {
    #[instrument(skip(credentials))]
    pub fn run(self, root: &Path, credentials: &Credentials) -> anyhow::Result<()> {
        let session = Session::open(root, credentials)?;
        let store = &session.questions;

        let asked: Vec<_> = store
            .questions_from_user(session.user_id())
            .into_iter()
            .filter_map(|id| store.question(id))
            .collect();

        match self.output {
            OutputFormat::Json => {
                let json: Vec<_> = asked.iter().copied().map(QuestionJson::from).collect();
                print_json(&json)?;
            }
            OutputFormat::Pretty if asked.is_empty() => {
                println!("You haven't asked any questions.");
            }
            OutputFormat::Pretty => {
                for question in asked {
                    render::question_from_me(&session.users, question);
                }
            }
        }
        Ok(())
    }
}
