mod cli;
mod commands;
mod config;
mod console;
mod context;

use std::path::PathBuf;

use crate::cli::ConfigCommand;
use clap::Parser;
use color_eyre::Result;
use maestro_booking::{BookingForm, BookingSession, SessionEnd};
use maestro_core::{booking::TicketingService, movies::ScheduleService, presenter::Presenter};
use maestro_storage::config_store::{self, PLAINTEXT_CONFIG_FILE};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Entry point. Every network call is awaited in turn on a single thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = cli::Cli::parse();
    let config = config::load()?;
    match cli.command.unwrap_or(cli::Command::Interactive) {
        cli::Command::Interactive => {
            let ctx = context::AppContext::load(&config)?;
            run_interactive(&ctx).await
        }
        cli::Command::Search { location, date } => {
            let ctx = context::AppContext::load(&config)?;
            commands::search(&ctx, &location, date).await?
        }
        cli::Command::Movie { id } => {
            let ctx = context::AppContext::load(&config)?;
            commands::movie(&ctx, &id).await?
        }
        cli::Command::Book {
            movie,
            showtime,
            seats,
        } => {
            let ctx = context::AppContext::load(&config)?;
            let form = BookingForm {
                movie_id: movie,
                showtime,
                seats,
            };
            commands::book(&ctx, form).await?
        }
        cli::Command::Version => print_version(),
        cli::Command::Health => run_health_check(&config)?,
        cli::Command::Config(ConfigCommand::Init) => init_config(&config)?,
        cli::Command::Config(ConfigCommand::Seal { from }) => seal_credentials(&config, from)?,
        cli::Command::Config(ConfigCommand::Show) => show_credentials(&config)?,
    }

    Ok(())
}

fn init_tracing() {
    // Respect user-provided filters, default to info. Logs go to stderr so they
    // do not interleave with prompts.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn print_version() {
    println!("maestro {}", env!("CARGO_PKG_VERSION"));
}

async fn run_interactive(ctx: &context::AppContext) {
    let mut presenter = console::ConsolePresenter::stdio();
    let end = run_session(&ctx.schedules, &ctx.booking, &ctx.locations, &mut presenter).await;
    info!(?end, "session finished");
}

async fn run_session<S, T, P>(
    schedules: &S,
    ticketing: &T,
    locations: &[String],
    presenter: &mut P,
) -> SessionEnd
where
    S: ScheduleService + ?Sized,
    T: TicketingService + ?Sized,
    P: Presenter + ?Sized,
{
    BookingSession::new(schedules, ticketing, locations)
        .run(presenter)
        .await
}

/// Loads the key and decrypts the stored credentials.
fn run_health_check(config: &config::Config) -> Result<()> {
    let store = context::store_from_config(config)?;
    let (_key, credentials) = store.load_or_init()?;
    println!("Credentials: ok ({})", store.config_path().display());
    if credentials.has_placeholders() {
        println!("Warning: placeholder values present; edit config.json and run `maestro config seal`.");
    }
    Ok(())
}

fn init_config(config: &config::Config) -> Result<()> {
    let settings_path = config::write_default_if_missing(&config::Config::starter())?;
    println!("Settings at {}", settings_path.display());

    let data_dir = context::resolve_data_dir(config)?;
    let plaintext = data_dir.join(PLAINTEXT_CONFIG_FILE);
    if config_store::write_plaintext_default(&plaintext)? {
        println!("Credentials template written to {}", plaintext.display());
    }

    let store = context::store_from_config(config)?;
    store.load_or_init()?;
    println!("Encrypted credentials at {}", store.config_path().display());
    println!(
        "Fill in {} and run `maestro config seal` to encrypt it.",
        plaintext.display()
    );
    Ok(())
}

fn seal_credentials(config: &config::Config, from: Option<PathBuf>) -> Result<()> {
    let source = match from {
        Some(path) => path,
        None => context::resolve_data_dir(config)?.join(PLAINTEXT_CONFIG_FILE),
    };
    let store = context::store_from_config(config)?;
    store.seal_plaintext(&source)?;
    println!(
        "Sealed credentials from {} into {}",
        source.display(),
        store.config_path().display()
    );
    println!("You may now delete the plaintext file.");
    Ok(())
}

fn show_credentials(config: &config::Config) -> Result<()> {
    let credentials = context::load_credentials(config)?;
    for (name, value) in credentials.masked() {
        println!("{name} = {value}");
    }
    Ok(())
}
