use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI surface definition.
#[derive(Parser, Debug)]
#[command(
    name = "maestro",
    about = "Search movie showtimes and book tickets from the terminal",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Optional subcommand; defaults to the interactive booking session when absent.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Pick a location, date, movie, and showtime, then book (default).
    Interactive,
    /// List schedules with movie details for a location and date.
    Search {
        #[arg(short, long)]
        location: String,
        /// Date as YYYY-MM-DD; defaults to today.
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show details for a single movie.
    Movie {
        /// Movie identifier as returned by `search`.
        id: String,
    },
    /// Book seats for a movie showtime.
    Book {
        #[arg(short, long)]
        movie: String,
        #[arg(short, long)]
        showtime: String,
        /// Number of seats (must be greater than zero).
        #[arg(long, allow_hyphen_values = true)]
        seats: String,
    },
    /// Print version and exit.
    Version,
    /// Check that the key and encrypted credentials load and decrypt.
    Health,
    /// Manage settings and credentials.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Create default settings, key, and a plaintext credentials template.
    Init,
    /// Encrypt a plaintext credentials JSON file into the credential store.
    Seal {
        /// Plaintext file; defaults to `config.json` in the data directory.
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Print stored credentials with values masked.
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_interactive_when_missing_subcommand() {
        let cli = Cli::try_parse_from(["maestro"]).expect("parse should succeed");
        assert_eq!(cli.command, None);
    }

    #[test]
    fn parses_search_with_optional_date() {
        let cli = Cli::try_parse_from(["maestro", "search", "--location", "Location 1"])
            .expect("parse should succeed");
        assert_eq!(
            cli.command,
            Some(Command::Search {
                location: "Location 1".into(),
                date: None,
            })
        );

        let cli = Cli::try_parse_from(["maestro", "search", "-l", "Downtown", "-d", "2024-03-05"])
            .expect("parse should succeed");
        assert_eq!(
            cli.command,
            Some(Command::Search {
                location: "Downtown".into(),
                date: Some("2024-03-05".into()),
            })
        );
    }

    #[test]
    fn parses_book_keeping_raw_seat_text() {
        let cli = Cli::try_parse_from([
            "maestro", "book", "--movie", "m-1", "--showtime", "18:00", "--seats", "-1",
        ])
        .expect("parse should succeed");
        assert_eq!(
            cli.command,
            Some(Command::Book {
                movie: "m-1".into(),
                showtime: "18:00".into(),
                seats: "-1".into(),
            })
        );
    }

    #[test]
    fn parses_config_subcommands() {
        let cli = Cli::try_parse_from(["maestro", "config", "init"]).expect("parse should succeed");
        assert_eq!(cli.command, Some(Command::Config(ConfigCommand::Init)));

        let cli = Cli::try_parse_from(["maestro", "config", "seal", "--from", "plain.json"])
            .expect("parse should succeed");
        assert_eq!(
            cli.command,
            Some(Command::Config(ConfigCommand::Seal {
                from: Some(PathBuf::from("plain.json")),
            }))
        );
    }

    #[test]
    fn parses_health_subcommand() {
        let cli = Cli::try_parse_from(["maestro", "health"]).expect("parse should succeed");
        assert_eq!(cli.command, Some(Command::Health));
    }
}
