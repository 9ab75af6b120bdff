use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for a question board.
///
/// This struct holds the locations of the data files, relative to the board's
/// root directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The file questions are stored in.
    questions_file: PathBuf,

    /// The file users are stored in.
    users_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            questions_file: default_questions_file(),
            users_file: default_users_file(),
        }
    }
}

impl Config {
    /// The name of the configuration file within the board's root.
    pub const FILE_NAME: &'static str = "config.toml";

    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The path of the questions file under `root`.
    #[must_use]
    pub fn questions_path(&self, root: &Path) -> PathBuf {
        root.join(&self.questions_file)
    }

    /// The path of the users file under `root`.
    #[must_use]
    pub fn users_path(&self, root: &Path) -> PathBuf {
        root.join(&self.users_file)
    }
}

fn default_questions_file() -> PathBuf {
    PathBuf::from("questions.txt")
}

fn default_users_file() -> PathBuf {
    PathBuf::from("users.txt")
}

/// The serialized versions of the configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_questions_file")]
        questions_file: PathBuf,

        #[serde(default = "default_users_file")]
        users_file: PathBuf,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                questions_file,
                users_file,
            } => Self {
                questions_file,
                users_file,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            questions_file: config.questions_file,
            users_file: config.users_file,
        }
    }
}
