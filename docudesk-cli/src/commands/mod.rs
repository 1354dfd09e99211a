//! Subcommand implementations.

mod account;
mod calls;
mod documents;
mod folders;
mod notes;

use std::time::Duration;

use anyhow::Context as _;
use docudesk_lib::ConsoleClient;
use docudesk_lib::auth::StaticTokenProvider;
use docudesk_lib::config::AppConfig;
use docudesk_lib::config::ConfigSource;
use docudesk_lib::error::Error;
use docudesk_lib::error::ErrorPage;
use docudesk_lib::error::Presentation;
use docudesk_lib::page::PageError;
use docudesk_lib::query::ListParams;
use docudesk_lib::query::LocationSync;
use url::Url;

use crate::cli::Command;
use crate::cli::Opts;
use crate::paths;
use crate::session::StoredTokenProvider;
use crate::settings::SettingsProvider;
use crate::settings::SqliteBackend;

/// Everything a command needs.
pub struct Context {
    pub config: AppConfig,
    pub settings: SettingsProvider,
    pub client: ConsoleClient,
}

impl Context {
    pub async fn open(opts: &Opts) -> anyhow::Result<Self> {
        let settings = open_settings(opts).await?;

        let source = opts
            .config
            .as_deref()
            .map(ConfigSource::parse)
            .or_else(|| paths::default_config().map(ConfigSource::File));
        let mut config = match &source {
            Some(source) => AppConfig::load(source).await,
            None => AppConfig::default(),
        };
        if let Some(url) = &opts.api_url {
            config.api_base_url = url.clone();
        }

        let builder = ConsoleClient::builder()
            .base_url(config.api_base_url.clone())
            .timeout(Duration::from_secs(opts.timeout));
        let client = match &opts.token {
            Some(token) => builder.token_provider(StaticTokenProvider::new(token)).build(),
            None => builder
                .token_provider(StoredTokenProvider::new(settings.clone()))
                .build(),
        }?;

        Ok(Self {
            config,
            settings,
            client,
        })
    }
}

async fn open_settings(opts: &Opts) -> anyhow::Result<SettingsProvider> {
    if opts.ephemeral {
        return Ok(SettingsProvider::in_memory());
    }
    let dir = match &opts.data_dir {
        Some(dir) => dir.clone(),
        None => paths::data_dir().context("cannot determine the data directory; pass --data-dir")?,
    };
    tokio::fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("creating {}", dir.display()))?;
    let backend = SqliteBackend::open(paths::settings_db(&dir)).await?;
    Ok(SettingsProvider::new(backend))
}

pub async fn run(opts: Opts) -> anyhow::Result<()> {
    let ctx = Context::open(&opts).await?;
    match opts.command {
        Command::Login {
            access_token,
            expires_at,
            expires_in,
        } => account::login(&ctx, access_token, expires_at, expires_in).await,
        Command::Logout => account::logout(&ctx).await,
        Command::Language { code } => account::language(&ctx, code).await,
        Command::Config => account::show_config(&ctx),
        Command::Folders(command) => folders::run(&ctx, command).await,
        Command::Documents(command) => documents::run(&ctx, command).await,
        Command::Calls(command) => calls::run(&ctx, command).await,
        Command::Notes(command) => notes::run(&ctx, command).await,
    }
}

/// A location standing in for the console URL of a list view.
pub(crate) fn location(path: &str, params: &ListParams) -> anyhow::Result<LocationSync> {
    let mut url = Url::parse("docudesk://console/")?.join(path)?;
    url.set_query(Some(&params.to_query()));
    Ok(LocationSync::new(url))
}

/// Turns an inline list error into a command failure.
pub(crate) fn page_failure(error: PageError) -> anyhow::Error {
    anyhow::anyhow!(describe(&error.message, &error.presentation))
}

/// The message printed for a failed command.
pub fn report(error: &anyhow::Error) -> String {
    match error.downcast_ref::<Error>() {
        Some(e) => describe(&e.to_string(), &e.presentation()),
        None => format!("{error:#}"),
    }
}

fn describe(message: &str, presentation: &Presentation) -> String {
    match presentation {
        Presentation::ErrorPage(ErrorPage::Connection) => {
            format!("cannot reach the console API: {message}")
        }
        Presentation::ErrorPage(ErrorPage::ServerError) => {
            format!("the server failed, try again later: {message}")
        }
        Presentation::Toast(key) => format!("{message} [{key}]"),
        Presentation::Inline(fields) => {
            let mut out = String::from("invalid input:");
            for field in fields {
                out.push_str(&format!("\n  {}: {}", field.field, field.message));
            }
            out
        }
    }
}
