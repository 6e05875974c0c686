use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use forecast_core::{Config, FetchState, ForecastWidget, Unit};
use inquire::Password;

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Weather forecast widget for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show the forecast for a city.
    Show {
        /// City name, e.g. "Paris" or "Paris,FR".
        city: String,

        /// Display temperatures in Fahrenheit.
        #[arg(long, short = 'f')]
        fahrenheit: bool,

        /// Select the N-th forecast day (0-based) instead of today.
        #[arg(long)]
        day: Option<usize>,

        /// Print the view model as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Search cities, pick days and toggle units interactively.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                city,
                fahrenheit,
                day,
                json,
            } => show(&city, fahrenheit, day, json).await,
            Command::Interactive => {
                let config = Config::load()?;
                let widget = ForecastWidget::from_config(&config)?;
                interactive::run(widget).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(city: &str, fahrenheit: bool, day: Option<usize>, json: bool) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if fahrenheit {
        config.unit = Unit::Fahrenheit;
    }

    let mut widget = ForecastWidget::from_config(&config)?;
    widget.input_city(city);
    let state = widget.settle().await;

    if let FetchState::Failed(message) = state {
        if !json {
            bail!("{message}");
        }
    }

    if let Some(index) = day {
        if widget.model().is_some() {
            widget.select_day(index)?;
        }
    }

    let view = widget.view();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::render(&view));
    }

    Ok(())
}
