//! CLI argument parsing for the nocbook-import binary.

use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "nocbook-import", about = "NocBook people import service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server (default if no subcommand given)
    Serve,
    /// Run database migrations and exit
    Migrate,
    /// Print a bearer token for a user (local development)
    IssueToken {
        /// Owner user id
        #[arg(long)]
        user_id: Uuid,
        /// Email stored in the token
        #[arg(long, default_value = "")]
        email: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_migrate_command_parses() {
        let cli = Cli::parse_from(["nocbook-import", "migrate"]);
        assert!(matches!(cli.command, Some(Command::Migrate)));
    }

    #[test]
    fn test_cli_no_command_defaults_to_none() {
        let cli = Cli::parse_from(["nocbook-import"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_serve_command_parses() {
        let cli = Cli::parse_from(["nocbook-import", "serve"]);
        assert!(matches!(cli.command, Some(Command::Serve)));
    }

    #[test]
    fn test_cli_issue_token_parses_user_id() {
        let user_id = Uuid::new_v4();
        let id = user_id.to_string();
        let cli = Cli::parse_from(["nocbook-import", "issue-token", "--user-id", id.as_str()]);
        match cli.command {
            Some(Command::IssueToken { user_id: parsed, email }) => {
                assert_eq!(parsed, user_id);
                assert_eq!(email, "");
            }
            _ => panic!("expected issue-token"),
        }
    }

    #[test]
    fn test_cli_issue_token_rejects_bad_uuid() {
        let result = Cli::try_parse_from(["nocbook-import", "issue-token", "--user-id", "nope"]);
        assert!(result.is_err());
    }
}
