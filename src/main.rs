use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sporlcover::{
    cli,
    config::{self, Credentials, DEFAULT_CREDENTIALS_FILE, Endpoints},
    download::DEFAULT_RETRIES,
    error, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Path to the JSON file with client_id, client_secret and redirect_uri
    #[clap(long, global = true, default_value = DEFAULT_CREDENTIALS_FILE)]
    config: PathBuf,

    /// Defaults to `covers` with its default options
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// List followed artists
    Artists(ArtistsOptions),

    /// List this year's albums of followed artists
    Releases(ReleasesOptions),

    /// Download cover art of this year's albums of followed artists
    Covers(CoversOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistsOptions {
    /// Only show artists whose name contains this term
    #[clap(long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ReleasesOptions {
    /// Release year to look for (defaults to the current year)
    #[clap(long)]
    pub year: Option<i32>,
}

#[derive(Parser, Debug, Clone)]
pub struct CoversOptions {
    /// Release year to look for (defaults to the current year)
    #[clap(long)]
    pub year: Option<i32>,

    /// Directory that receives the releases_<year> and albums_<year> folders
    #[clap(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Download attempts per cover
    #[clap(long, default_value_t = DEFAULT_RETRIES)]
    pub retries: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Some(Command::Completions(opt)) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let credentials = match Credentials::load(&cli.config).await {
        Ok(credentials) => credentials,
        Err(e) => error!("{}: {}", cli.config.display(), e),
    };
    let endpoints = Endpoints::from_env();

    match cli.command {
        Some(Command::Auth) => cli::auth(&credentials, &endpoints).await,
        Some(Command::Artists(opt)) => {
            cli::list_artists(&credentials, &endpoints, opt.search).await
        }
        Some(Command::Releases(opt)) => {
            cli::list_releases(&credentials, &endpoints, opt.year).await
        }
        Some(Command::Covers(opt)) => {
            let options = cli::CoverOptions {
                year: opt.year,
                out_dir: opt.out_dir,
                retries: opt.retries,
            };
            cli::covers(&credentials, &endpoints, options).await
        }
        None => cli::covers(&credentials, &endpoints, cli::CoverOptions::default()).await,
        Some(Command::Completions(_)) => {}
    }
}
