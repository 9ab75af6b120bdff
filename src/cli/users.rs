use std::path::Path;

use askbox::UserDirectory;
use tracing::instrument;

use super::{
    render::{print_json, OutputFormat, UserJson},
    session::load_config,
    terminal::Colorize,
};

#[derive(Debug, clap::Parser)]
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

        if let OutputFormat::Json = self.output {
            let all: Vec<UserJson> = users.users().map(UserJson::from).collect();
            return print_json(&all);
        }

        if users.is_empty() {
            println!("No users yet.");
            return Ok(());
        }

        println!("{}", "System users".dim());
        for user in users.users() {
            let anonymous = if user.allows_anonymous() {
                format!("  {}", "accepts anonymous questions".dim())
            } else {
                String::new()
            };
            println!(
                "  {}  {} ({}){anonymous}",
                format!("#{}", user.id()).accent(),
                user.name(),
                user.username()
            );
        }
        Ok(())
    }
}
