use crate::core::export::ExportFormat;
use clap::{ArgAction, Parser, Subcommand};

/// Command-line interface definition for rTimeTracker
/// CLI application to track time on cards with timers and time tracks
#[derive(Parser, Debug)]
#[command(
    name = "rtimetracker",
    version = env!("CARGO_PKG_VERSION"),
    about = "Card-scoped time tracking: one running timer per member, stored on a shared host or in SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Act as this member instead of the configured one
    #[arg(global = true, long = "member")]
    pub member: Option<String>,

    /// Card whose timers are used
    #[arg(global = true, long = "card")]
    pub card: Option<String>,

    /// Shared host directory; enables the host backend
    #[arg(global = true, long = "host-dir")]
    pub host_dir: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// More diagnostics on stderr (repeat for more)
    #[arg(global = true, short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show the configuration
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,
    },

    /// List the timer lists of the card
    Lists,

    /// Create an empty timer list on the card
    NewList,

    /// Create a timer and start it (stops the running one)
    Add {
        /// Timer list id; the list is created when missing
        list: String,
        title: String,
    },

    /// Start an existing timer again (stops the running one)
    Start { list: String, timer: String },

    /// Stop the running timer
    Stop,

    /// Show the running timer
    Status,

    /// Delete a timer and all its tracks
    Del {
        list: String,
        timer: String,

        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Show the timers of one list, or of every list on the card
    List { list: Option<String> },

    /// Export the card's time tracks
    Export {
        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,

        #[arg(long, short = 'o', help = "Output file (stdout when omitted)")]
        output: Option<String>,
    },

    /// Show the internal log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Print the merged dictionary of a locale as JSON
    Locale { code: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "rtimetracker", "add", "l1", "Design", "--card", "c1", "--member", "m1", "-vv",
        ]);
        assert_eq!(cli.card.as_deref(), Some("c1"));
        assert_eq!(cli.member.as_deref(), Some("m1"));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Add { ref title, .. } if title == "Design"));
    }

    #[test]
    fn export_format_is_validated() {
        assert!(Cli::try_parse_from(["rtimetracker", "export", "--format", "xlsx"]).is_err());
        let cli = Cli::parse_from(["rtimetracker", "export", "--format", "csv"]);
        assert!(matches!(
            cli.command,
            Commands::Export { format: ExportFormat::Csv, output: None }
        ));
    }
}
