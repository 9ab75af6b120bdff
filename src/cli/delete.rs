use std::path::Path;

use askbox::QuestionId;
use dialoguer::Confirm;
use tracing::instrument;

use super::{
    render,
    session::{Credentials, Session},
    terminal::Colorize,
};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The id of the question to delete
    id: QuestionId,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    yes: bool,
}

impl Command {
    #[instrument(skip(credentials))]
    pub fn run(self, root: &Path, credentials: &Credentials) -> anyhow::Result<()> {
        let mut session = Session::open(root, credentials)?;
        let store = &session.questions;

        store.question_for_recipient(self.id, session.user.id())?;
        let doomed = store.deletion_set(self.id);

        if !self.yes {
            println!("Will delete {} question(s):", doomed.len());
            for question in doomed.iter().filter_map(|id| store.question(*id)) {
                render::question_to_me(&session.users, question);
            }
            let proceed = Confirm::new()
                .with_prompt("Proceed?")
                .default(false)
                .interact()?;
            if !proceed {
                println!("Cancelled");
                return Ok(());
            }
        }

        let removed = session.questions.delete(self.id)?;
        println!(
            "{}",
            format!("Deleted {} question(s)", removed.len()).success()
        );
        Ok(())
    }
}
