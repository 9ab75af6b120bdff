use std::{fs, path::Path};

use askbox::Config;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Default, clap::Parser)]
pub struct Command {}

impl Command {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let config_path = root.join(Config::FILE_NAME);
        if config_path.exists() {
            anyhow::bail!(
                "Board already initialized (found existing {})",
                config_path.display()
            );
        }

        fs::create_dir_all(root)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", root.display()))?;

        let config = Config::default();
        config
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", Config::FILE_NAME))?;

        let mut created = vec![config_path];
        for data_file in [config.questions_path(root), config.users_path(root)] {
            if !data_file.exists() {
                fs::write(&data_file, "").map_err(|e| {
                    anyhow::anyhow!("Failed to create {}: {e}", data_file.display())
                })?;
                created.push(data_file);
            }
        }

        println!(
            "{}",
            format!("Initialized question board in {}", root.display()).success()
        );
        for path in &created {
            println!("  Created: {}", path.display());
        }
        println!();
        println!("Next steps:");
        println!("  ask signup <username> --name <name> --email <email>");
        Ok(())
    }
}
