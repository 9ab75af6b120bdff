use std::path::Path;

use askbox::{QuestionStore, UserDirectory};
use tracing::instrument;

use super::{
    render::{self, print_json, OutputFormat, QuestionJson},
    session::load_config,
};

#[derive(Debug, Default, clap::Parser)]
pub struct Command {
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
        let feed = store.feed();

        match self.output {
            OutputFormat::Json => {
                let json: Vec<_> = feed.into_iter().map(QuestionJson::from).collect();
                print_json(&json)?;
            }
            OutputFormat::Pretty if feed.is_empty() => {
                println!("No answered questions in the feed.");
            }
            OutputFormat::Pretty => {
                for question in feed {
                    render::public_question(&users, question);
                    println!();
                }
            }
        }
        Ok(())
    }
}
