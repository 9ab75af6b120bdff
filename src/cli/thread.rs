use std::path::Path;

use askbox::{QuestionId, QuestionStore, UserDirectory};
use tracing::instrument;

use super::{
    render::{self, print_json, OutputFormat, QuestionJson},
    session::load_config,
};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The id of the question that started the thread
    root: QuestionId,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Command {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let config = load_config(root);
        let users = UserDirectory::open(root, &config);
        let store = QuestionStore::open(root, &config);

        let Some(thread) = store.thread(self.root) else {
            match store.question(self.root) {
                Some(question) => anyhow::bail!(
                    "Question {} is a reply; its thread is {}",
                    self.root,
                    question.thread()
                ),
                None => anyhow::bail!("No thread with id {}", self.root),
            }
        };

        match self.output {
            OutputFormat::Json => {
                let json: Vec<_> = thread.into_iter().map(QuestionJson::from).collect();
                print_json(&json)?;
            }
            OutputFormat::Pretty => {
                for question in thread {
                    render::public_question(&users, question);
                }
            }
        }
        Ok(())
    }
}
