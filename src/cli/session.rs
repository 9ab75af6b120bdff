use std::{
    fmt,
    path::{Path, PathBuf},
};

use askbox::{Config, QuestionStore, User, UserDirectory, UserId};
use dialoguer::{Input, Password};

/// Who the command acts as.
#[derive(Clone, Default, clap::Args)]
pub struct Credentials {
    /// Username to act as (prompted for if omitted)
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Password (prompted for if omitted)
    #[arg(long, global = true)]
    password: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    /// The password given on the command line, or a prompted one.
    ///
    /// When `confirm` is set the prompt asks for the password twice.
    pub fn password(&self, confirm: bool) -> anyhow::Result<String> {
        if let Some(password) = &self.password {
            return Ok(password.clone());
        }
        let prompt = Password::new().with_prompt("Password");
        let prompt = if confirm {
            prompt.with_confirmation("Repeat password", "Passwords don't match")
        } else {
            prompt
        };
        Ok(prompt.interact()?)
    }

    fn username(&self) -> anyhow::Result<String> {
        match &self.user {
            Some(user) => Ok(user.clone()),
            None => Ok(Input::<String>::new()
                .with_prompt("Username")
                .interact_text()?),
        }
    }
}

/// A logged-in user together with the loaded board.
///
/// Every operation goes through the explicit `user`; nothing about the
/// current user is held by the stores themselves.
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub users: UserDirectory,
    pub questions: QuestionStore,
}

impl Session {
    /// Loads the board under `root` and logs in.
    pub fn open(root: &Path, credentials: &Credentials) -> anyhow::Result<Self> {
        let config = load_config(root);
        let users = UserDirectory::open(root, &config);

        let username = credentials.username()?;
        let password = credentials.password(false)?;
        let user = users.login(&username, &password)?.clone();
        tracing::debug!("Logged in as {} ({})", user.username(), user.id());

        let questions = QuestionStore::open(root, &config);

        Ok(Self {
            user,
            users,
            questions,
        })
    }

    pub const fn user_id(&self) -> UserId {
        self.user.id()
    }
}

/// The board's configuration, or the defaults if it has none.
pub fn load_config(root: &Path) -> Config {
    let path: PathBuf = root.join(Config::FILE_NAME);
    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}
