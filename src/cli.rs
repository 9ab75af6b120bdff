use std::path::PathBuf;

mod answer;
mod ask;
mod delete;
mod feed;
mod inbox;
mod init;
mod outbox;
mod render;
mod session;
mod signup;
mod terminal;
mod thread;
mod users;

use clap::ArgAction;
use session::Credentials;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the directory holding the board's data files
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(flatten)]
    credentials: Credentials,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_default()
            .run(self.root, &self.credentials)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show every answered question (default)
    Feed(feed::Command),

    /// Initialize a new board in the root directory
    Init(init::Command),

    /// Register a new user
    Signup(signup::Command),

    /// List registered users
    Users(users::Command),

    /// Show questions addressed to you, grouped by thread
    Inbox(inbox::Command),

    /// Show questions you have asked
    Outbox(outbox::Command),

    /// Ask a user a question
    ///
    /// Pass --parent to reply in an existing thread.
    Ask(ask::Command),

    /// Answer a question addressed to you
    ///
    /// Answering again replaces the previous answer.
    Answer(answer::Command),

    /// Delete a question addressed to you
    ///
    /// Deleting the first question of a thread deletes the whole thread.
    Delete(delete::Command),

    /// Show every question in a thread
    Thread(thread::Command),
}

impl Default for Command {
    fn default() -> Self {
        Self::Feed(feed::Command::default())
    }
}

impl Command {
    fn run(self, root: PathBuf, credentials: &Credentials) -> anyhow::Result<()> {
        match self {
            Self::Feed(command) => command.run(&root)?,
            Self::Init(command) => command.run(&root)?,
            Self::Signup(command) => command.run(&root, credentials)?,
            Self::Users(command) => command.run(&root)?,
            Self::Inbox(command) => command.run(&root, credentials)?,
            Self::Outbox(command) => command.run(&root, credentials)?,
            Self::Ask(command) => command.run(&root, credentials)?,
            Self::Answer(command) => command.run(&root, credentials)?,
            Self::Delete(command) => command.run(&root, credentials)?,
            Self::Thread(command) => command.run(&root)?,
        }
        Ok(())
    }
}
