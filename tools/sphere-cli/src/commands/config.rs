//! Configuration management commands.

use std::fs;

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force, base_url } => init_config(force, &base_url, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let api = &ctx.config.api;
    ctx.output.info("[api]");
    ctx.output.kv("base_url", &api.base_url);
    ctx.output.kv("with_credentials", &api.with_credentials.to_string());
    ctx.output.kv("xsrf_cookie", &api.xsrf_cookie);
    ctx.output.kv("xsrf_header", &api.xsrf_header);
    if let Some(secs) = api.timeout_secs {
        ctx.output.kv("timeout_secs", &secs.to_string());
    }

    ctx.output.info("[listing]");
    ctx.output.kv("page_size", &ctx.config.listing.page_size.to_string());
    ctx.output.kv("store_name", &ctx.config.listing.store_name);

    let database = &ctx.config.database;
    ctx.output.info("[database]");
    match &database.url {
        Some(url) => ctx.output.kv("url", &redact_password(url)),
        None => ctx.output.kv("url", "(from DATABASE_URL)"),
    }
    if let Some(name) = &database.application_name {
        ctx.output.kv("application_name", name);
    }
    if let Some(secs) = database.connect_timeout_secs {
        ctx.output.kv("connect_timeout_secs", &secs.to_string());
    }

    Ok(())
}

fn init_config(force: bool, base_url: &str, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("sphere.toml");

    if config_path.exists() && !force {
        if ctx.output.is_json() {
            bail!(
                "Config file already exists: {}. Use --force to overwrite.",
                config_path.display()
            );
        }
        let overwrite = Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", config_path.display()))
            .default(false)
            .interact()?;
        if !overwrite {
            ctx.output.info("Left existing config untouched.");
            return Ok(());
        }
    }

    fs::write(&config_path, generate_default_config(base_url))
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

/// Hide the password part of a connection URL.
fn redact_password(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((userinfo, host)) = rest.split_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{}://{}:****@{}", scheme, user, host),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_password() {
        assert_eq!(
            redact_password("postgres://shop:secret@db:5432/shop"),
            "postgres://shop:****@db:5432/shop"
        );
        assert_eq!(redact_password("postgres://db/shop"), "postgres://db/shop");
        assert_eq!(redact_password("host=db user=shop"), "host=db user=shop");
    }
}
