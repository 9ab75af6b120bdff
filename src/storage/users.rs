//! A file backed directory of users
//!
//! Users are stored one per line with the same delimiter as questions:
//!
//! ```text
//! id,username,password_digest,name,email,allow_anonymous
//! ```
//!
//! New users are appended to the file; existing records are never rewritten.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use tracing::instrument;

use crate::{
    domain::{
        user::password_digest, validate_text, Config, NewUser, TextError, User, UserId,
        UserIdentity, UserLookup,
    },
    storage::{
        codec::{encode_flag, join_fields, parse_flag, parse_u32, split_fields, DecodeError},
        lines,
    },
};

/// The number of fields in a user record.
pub const USER_FIELDS: usize = 6;

/// The registered users, keyed by id.
#[derive(Debug)]
pub struct UserDirectory {
    /// The file users are persisted to.
    path: PathBuf,
    users: BTreeMap<UserId, User>,
}

/// Errors returned by [`UserDirectory`] operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// The users file could not be written.
    #[error("user storage at {} is unavailable", .path.display())]
    StorageUnavailable {
        /// The users file.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Another user already has this username.
    #[error("username {0:?} is already taken")]
    UsernameTaken(String),
    /// The username is not a single word.
    #[error("username {0:?} must be a single word")]
    InvalidUsername(String),
    /// A signup field cannot be stored.
    #[error("invalid {field}: {source}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// Why the field was rejected.
        source: TextError,
    },
    /// The username or password is wrong.
    #[error("invalid username or password")]
    InvalidCredentials,
    /// No user has the given id.
    #[error("no user with id {0}")]
    NotFound(UserId),
    /// Every user id has been handed out.
    #[error("no user ids left to allocate")]
    IdsExhausted,
}

impl UserDirectory {
    /// Loads the directory from the users file configured for `root`.
    #[must_use]
    pub fn open(root: &Path, config: &Config) -> Self {
        Self::load(config.users_path(root))
    }

    /// Loads every user from the file at `path`.
    ///
    /// A file that cannot be read yields an empty directory. Lines that do not
    /// decode, and later records reusing an id or username, are skipped with
    /// a warning.
    #[must_use]
    #[instrument]
    pub fn load(path: PathBuf) -> Self {
        let records = match lines::read_lines(&path) {
            Ok(records) => records,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No user file at {}, starting empty", path.display());
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(
                    "Cannot read user file {}, starting empty: {e}",
                    path.display()
                );
                Vec::new()
            }
        };

        let mut directory = Self {
            path,
            users: BTreeMap::new(),
        };

        for (number, line) in records.iter().enumerate() {
            let user = match decode_user(line) {
                Ok(user) => user,
                Err(e) => {
                    tracing::warn!(
                        "Skipping malformed user record {} in {}: {e}",
                        number + 1,
                        directory.path.display()
                    );
                    continue;
                }
            };
            if directory.users.contains_key(&user.id)
                || directory.by_username(&user.username).is_some()
            {
                tracing::warn!(
                    "Skipping duplicate user {} ({}) in {}",
                    user.id,
                    user.username,
                    directory.path.display()
                );
                continue;
            }
            directory.users.insert(user.id, user);
        }

        tracing::debug!(
            "Loaded {} users from {}",
            directory.users.len(),
            directory.path.display()
        );
        directory
    }

    /// Registers a new user and appends them to the users file.
    ///
    /// The new user gets the id after the highest existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the username is taken or not a single word, if any
    /// field cannot be stored, if the highest user id is already taken, or if
    /// the users file cannot be written. The directory is unchanged on error.
    pub fn signup(&mut self, new: NewUser) -> Result<User, UserError> {
        if new.username.is_empty() || new.username.contains(char::is_whitespace) {
            return Err(UserError::InvalidUsername(new.username));
        }
        let username = field("username", new.username)?;
        if self.by_username(&username).is_some() {
            return Err(UserError::UsernameTaken(username));
        }
        if new.password.is_empty() {
            return Err(UserError::InvalidField {
                field: "password",
                source: TextError::Empty,
            });
        }

        let id = self
            .users
            .keys()
            .next_back()
            .map_or(0, |id| id.get())
            .checked_add(1)
            .map(UserId::new)
            .ok_or(UserError::IdsExhausted)?;
        let user = User {
            id,
            password_digest: password_digest(&username, &new.password),
            username,
            name: field("name", new.name)?,
            email: field("email", new.email)?,
            allows_anonymous: new.allows_anonymous,
        };

        lines::append_line(&self.path, &encode_user(&user)).map_err(|source| {
            UserError::StorageUnavailable {
                path: self.path.clone(),
                source,
            }
        })?;
        self.users.insert(id, user.clone());

        tracing::info!("Signed up user {} as {id}", user.username);
        Ok(user)
    }

    /// Finds the user with the given credentials.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::InvalidCredentials`] if there is no such user or
    /// the password does not match.
    pub fn login(&self, username: &str, password: &str) -> Result<&User, UserError> {
        self.by_username(username)
            .filter(|user| user.verify_password(password))
            .ok_or(UserError::InvalidCredentials)
    }

    /// Looks up a user by id.
    #[must_use]
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    /// Looks up a user by id, failing if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::NotFound`] if there is no such user.
    pub fn require(&self, id: UserId) -> Result<&User, UserError> {
        self.user(id).ok_or(UserError::NotFound(id))
    }

    /// Looks up a user by username.
    #[must_use]
    pub fn by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|user| user.username == username)
    }

    /// Iterates over all users in ascending id order.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    /// The number of registered users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no users are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserLookup for UserDirectory {
    fn lookup_user(&self, id: UserId) -> Option<UserIdentity> {
        self.user(id).map(User::identity)
    }
}

fn field(name: &'static str, value: String) -> Result<String, UserError> {
    validate_text(value)
        .map(|text| text.as_str().to_string())
        .map_err(|source| UserError::InvalidField {
            field: name,
            source,
        })
}

/// Serializes a user into a single record line, without terminator.
#[must_use]
pub fn encode_user(user: &User) -> String {
    let id = user.id.to_string();
    join_fields(&[
        id.as_str(),
        user.username.as_str(),
        user.password_digest.as_str(),
        user.name.as_str(),
        user.email.as_str(),
        encode_flag(user.allows_anonymous),
    ])
}

/// Parses a record line into a user.
///
/// # Errors
///
/// Returns an error if the line does not have exactly six fields, if the id
/// is not a canonical integer, if the anonymity flag is not `0`/`1`, or if
/// the username or password digest is empty.
pub fn decode_user(line: &str) -> Result<User, DecodeError> {
    let fields = split_fields(line, USER_FIELDS)?;

    let id = UserId::new(parse_u32("id", fields[0])?);
    let username = non_empty("username", fields[1])?;
    let password_digest = non_empty("password_digest", fields[2])?;
    let allows_anonymous = parse_flag("allow_anonymous", fields[5])?;

    Ok(User {
        id,
        username,
        password_digest,
        name: fields[3].to_string(),
        email: fields[4].to_string(),
        allows_anonymous,
    })
}

fn non_empty(field: &'static str, value: &str) -> Result<String, DecodeError> {
    if value.is_empty() {
        Err(DecodeError::Empty { field })
    } else {
        Ok(value.to_string())
    }
}
