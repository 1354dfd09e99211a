//! login, logout, language and config

use anyhow::Context as _;
use anyhow::bail;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

use super::Context;
use crate::render;
use crate::session;
use crate::session::Session;

pub async fn login(
    ctx: &Context,
    token: Option<String>,
    expires_at: Option<String>,
    expires_in: Option<i64>,
) -> anyhow::Result<()> {
    let token = match token {
        Some(token) => token,
        None => {
            let mut line = String::new();
            BufReader::new(tokio::io::stdin())
                .read_line(&mut line)
                .await
                .context("reading token from stdin")?;
            line
        }
    };
    let token = token.trim();
    if token.is_empty() {
        bail!("no token given");
    }

    let expires_at = match (expires_at, expires_in) {
        (Some(at), _) => Some(
            DateTime::parse_from_rfc3339(&at)
                .with_context(|| format!("invalid --expires-at '{at}'"))?
                .with_timezone(&Utc),
        ),
        (None, Some(secs)) => {
            let ttl = Duration::try_seconds(secs).context("--expires-in is out of range")?;
            Some(Utc::now() + ttl)
        }
        (None, None) => None,
    };

    let session = Session::new(token, expires_at);
    if session.is_expired() {
        bail!("the token has already expired");
    }
    session::save(&ctx.settings, &session).await?;
    log::info!("stored session token");
    println!("Signed in.");
    Ok(())
}

pub async fn logout(ctx: &Context) -> anyhow::Result<()> {
    session::clear(&ctx.settings).await?;
    println!("Signed out.");
    Ok(())
}

pub async fn language(ctx: &Context, code: Option<String>) -> anyhow::Result<()> {
    match code {
        Some(code) => {
            let code = session::parse_language(&code).map_err(anyhow::Error::msg)?;
            session::set_language(&ctx.settings, &code).await?;
            println!("Language set to {code}.");
        }
        None => println!("{}", session::language(&ctx.settings).await?),
    }
    Ok(())
}

pub fn show_config(ctx: &Context) -> anyhow::Result<()> {
    let config = &ctx.config;
    print!(
        "{}",
        render::details(&[
            ("API base URL", Some(config.api_base_url.clone())),
            ("Reception domain", Some(config.reception_email_domain.clone())),
            ("Max upload files", Some(config.max_upload_files.to_string())),
            ("Allowed types", Some(config.allowed_file_types.join(", "))),
        ])
    );
    Ok(())
}
