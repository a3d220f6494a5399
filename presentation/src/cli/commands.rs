//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for screening-client
#[derive(Parser, Debug)]
#[command(name = "screening-client")]
#[command(author, version, about = "Applicant screening chat client")]
#[command(long_about = r#"
Screening Client talks to an applicant screening service: browse jobs,
sign in, chat with the screening agent, and review past applications.

Configuration files are loaded from (in priority order):
1. SCREENING_* environment variables
2. --config <path>     Explicit config file
3. ./screening.toml    Project-level config
4. ~/.config/screening-client/config.toml   Global config

Example:
  screening-client jobs
  screening-client chat --user u-123 --job job-42
  screening-client chat --user u-123 --job job-42 --restart
  screening-client summary app-9 --user u-123
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress the streaming spinner and banners
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Override the REST API base URL
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Override the chat WebSocket URL
    #[arg(long, value_name = "URL", global = true)]
    pub ws_url: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List open job postings
    Jobs,

    /// Sign in and show the applicant profile
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an applicant account
    Signup(SignupArgs),

    /// Show an applicant profile and their applications
    Profile {
        /// Applicant id
        user_id: String,
    },

    /// Start a screening chat for a job
    Chat(ChatArgs),

    /// Show the stored screening outcome of an application
    Summary {
        /// Application id
        application_id: String,
        /// Applicant id, used to fill in a missing decision
        #[arg(long)]
        user: String,
    },

    /// Download the conversation transcript of an application
    Download {
        /// Application id
        application_id: String,
        /// Directory to write the transcript into
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Withdraw (delete) an application
    Withdraw {
        /// Application id
        application_id: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SignupArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub apt_num: Option<String>,
    #[arg(long)]
    pub state: String,
    #[arg(long)]
    pub zip_code: String,
}

#[derive(Args, Debug, Clone)]
pub struct ChatArgs {
    /// Applicant id
    #[arg(long)]
    pub user: String,

    /// Job id
    #[arg(long)]
    pub job: String,

    /// Delete an existing application for this job and start over
    #[arg(long)]
    pub restart: bool,

    /// Use the ids as given without looking up the applicant profile
    #[arg(long)]
    pub skip_profile: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chat() {
        let cli = Cli::parse_from([
            "screening-client",
            "-vv",
            "chat",
            "--user",
            "u-1",
            "--job",
            "j-1",
            "--restart",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Command::Chat(args)) => {
                assert_eq!(args.user, "u-1");
                assert_eq!(args.job, "j-1");
                assert!(args.restart);
                assert!(!args.skip_profile);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_show_config_without_subcommand() {
        let cli = Cli::parse_from(["screening-client", "--show-config"]);
        assert!(cli.show_config);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "screening-client",
            "download",
            "app-1",
            "--output",
            "/tmp",
            "--api-url",
            "http://example.com",
        ]);
        assert_eq!(cli.api_url.as_deref(), Some("http://example.com"));
        match cli.command {
            Some(Command::Download {
                application_id,
                output,
            }) => {
                assert_eq!(application_id, "app-1");
                assert_eq!(output, Some(PathBuf::from("/tmp")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
