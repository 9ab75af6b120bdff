use std::path::Path;

use askbox::{NewUser, UserDirectory};
use tracing::instrument;

use super::{
    session::{load_config, Credentials},
    terminal::Colorize,
};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The login name (a single word)
    username: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// Contact email
    #[arg(long)]
    email: String,

    /// Accept anonymous questions from other users
    #[arg(long, short)]
    allow_anonymous: bool,
}

impl Command {
    #[instrument(skip(credentials))]
    pub fn run(self, root: &Path, credentials: &Credentials) -> anyhow::Result<()> {
        let config = load_config(root);
        let mut users = UserDirectory::open(root, &config);

        let password = credentials.password(true)?;
        let user = users.signup(NewUser {
            username: self.username,
            password,
            name: self.name,
            email: self.email,
            allows_anonymous: self.allow_anonymous,
        })?;

        println!(
            "{}",
            format!("Signed up {} as user {}", user.username(), user.id()).success()
        );
        if user.allows_anonymous() {
            println!("{}", "Others may ask you questions anonymously".dim());
        }
        Ok(())
    }
}
