use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use outfit_core::{
    Config, Gender, OutfitEngine, OutfitService, Unit, engine::MAX_FORECAST_DAYS,
    provider_from_config,
};
use tracing::debug;

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "outfit", version, about = "Weather-based outfit recommendations")]
pub struct Cli {
    /// Log decisions to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct RequestArgs {
    /// City or location name.
    pub location: String,

    /// male, female or baby; defaults to the configured value.
    #[arg(long)]
    pub gender: Option<Gender>,

    /// C or F; defaults to the configured value.
    #[arg(long)]
    pub unit: Option<Unit>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the provider API key and request defaults.
    Configure,

    /// Recommend an outfit for the current weather.
    Now {
        #[command(flatten)]
        request: RequestArgs,
    },

    /// Recommend outfits for the upcoming days.
    Forecast {
        #[command(flatten)]
        request: RequestArgs,

        /// Number of days after today, 1 to 3.
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=MAX_FORECAST_DAYS as i64))]
        days: Option<u8>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Now { request } => {
                let service = build_service(&config)?;
                let (gender, unit) = resolve_defaults(&request, &config);

                let report = service.outfit(&request.location, gender, unit).await?;
                if request.json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print!("{}", output::CurrentView(&report));
                }
                Ok(())
            }
            Command::Forecast { request, days } => {
                let service = build_service(&config)?;
                let (gender, unit) = resolve_defaults(&request, &config);
                let days = days.map(usize::from).unwrap_or(config.defaults.days);

                let reports = service.forecast(&request.location, gender, unit, days).await?;
                if request.json {
                    println!("{}", serde_json::to_string_pretty(&reports)?);
                } else {
                    let view = output::ForecastView { location: &request.location, days: &reports };
                    print!("{view}");
                }
                Ok(())
            }
        }
    }
}

/// Everything here is startup-fatal: missing key, bad URLs, unreadable rule table.
fn build_service(config: &Config) -> anyhow::Result<OutfitService> {
    let provider = provider_from_config(config)?;
    let rules = config.rule_table()?;
    debug!(rules = rules.rules().len(), "rule table loaded");

    Ok(OutfitService::new(provider, OutfitEngine::with_rules(Arc::new(rules))))
}

fn resolve_defaults(request: &RequestArgs, config: &Config) -> (Gender, Unit) {
    (
        request.gender.unwrap_or(config.defaults.gender),
        request.unit.unwrap_or(config.defaults.unit),
    )
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let prompt = if config.api_key().is_some() {
        "OpenWeather API key (leave empty to keep the current one):"
    } else {
        "OpenWeather API key:"
    };
    let api_key = Password::new(prompt)
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("API key prompt was cancelled")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    config.defaults.gender = Select::new("Default gender:", vec![
        Gender::Male,
        Gender::Female,
        Gender::Baby,
    ])
    .prompt()
    .context("Gender prompt was cancelled")?;

    config.defaults.unit = Select::new("Default unit:", vec![Unit::Celsius, Unit::Fahrenheit])
        .prompt()
        .context("Unit prompt was cancelled")?;

    config.require_api_key()?;
    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
