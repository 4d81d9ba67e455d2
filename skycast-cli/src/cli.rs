use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, anyhow, bail};
use chrono::{Local, Timelike};
use clap::{Args, Parser, Subcommand};
use inquire::{InquireError, Password, Text};
use skycast_core::{
    Config, Coordinates, HttpImageCache, ImageLookup, ImageResolver, LocalityResolver,
    NominatimResolver, WeatherEvent, WeatherProvider, WeatherQuery, WeatherSession,
    provider::provider_from_config, select_window,
};

use crate::output::{render_current, render_window};

/// City used when neither the command line nor the config names one.
const FALLBACK_CITY: &str = "Riga";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Current weather and a 6-hour forecast")]
pub struct Cli {
    #[command(flatten)]
    pub api: ApiOverrides,

    #[command(subcommand)]
    pub command: Command,
}

/// Values that take precedence over the config file.
#[derive(Debug, Args)]
pub struct ApiOverrides {
    /// Provider API key.
    #[arg(long, global = true, env = "SKYCAST_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Value sent in the host header.
    #[arg(long, global = true, env = "SKYCAST_API_HOST")]
    pub api_host: Option<String>,

    /// Forecast endpoint URL.
    #[arg(long, global = true, env = "SKYCAST_ENDPOINT")]
    pub endpoint: Option<String>,
}

impl ApiOverrides {
    fn apply(self, config: &mut Config) {
        if let Some(key) = self.api_key {
            config.set_api_key(key);
        }
        if let Some(host) = self.api_host {
            config.api.api_host = host;
        }
        if let Some(endpoint) = self.endpoint {
            config.api.endpoint = endpoint;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the API key, host, endpoint and default city.
    Configure,

    /// Show current weather and the hourly window for a city.
    Show {
        /// City name; defaults to the configured city.
        city: Option<String>,

        /// Latitude to reverse geocode instead of naming a city.
        #[arg(long, requires = "lon", conflicts_with = "city", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude to reverse geocode instead of naming a city.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Hour of day the window starts at; defaults to the local clock.
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
        hour: Option<u32>,

        /// Print the snapshot and window as JSON.
        #[arg(long)]
        json: bool,

        /// Download the condition icon to this path.
        #[arg(long)]
        save_icon: Option<PathBuf>,
    },

    /// Prompt for city names until an empty line or Ctrl-C.
    Interactive {
        /// Hour of day the window starts at; defaults to the local clock.
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
        hour: Option<u32>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli { api, command } = self;

        let mut config = Config::load()?;
        api.apply(&mut config);

        match command {
            Command::Configure => configure(config).await,
            Command::Show { city, lat, lon, hour, json, save_icon } => {
                let coords =
                    lat.zip(lon).map(|(latitude, longitude)| Coordinates { latitude, longitude });
                show(&config, city, coords, hour, json, save_icon).await
            }
            Command::Interactive { hour } => interactive(&config, hour).await,
        }
    }
}

fn current_hour(hour: Option<u32>) -> u32 {
    hour.unwrap_or_else(|| Local::now().hour())
}

async fn configure(mut config: Config) -> anyhow::Result<()> {
    let answers = tokio::task::spawn_blocking(move || -> Result<Config, InquireError> {
        let key = Password::new("API key:")
            .without_confirmation()
            .with_help_message("Leave empty to keep the current key")
            .prompt()?;
        if !key.trim().is_empty() {
            config.set_api_key(key.trim().to_string());
        }

        config.api.api_host = Text::new("API host:").with_default(&config.api.api_host).prompt()?;
        config.api.endpoint = Text::new("Endpoint:").with_default(&config.api.endpoint).prompt()?;

        let city = Text::new("Default city:")
            .with_default(config.default_city.as_deref().unwrap_or(FALLBACK_CITY))
            .prompt()?;
        config.set_default_city(&city);

        Ok(config)
    })
    .await
    .context("Configuration prompt panicked")?;

    let config = match answers {
        Ok(config) => config,
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            println!("Configuration cancelled, nothing saved.");
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to read configuration input"),
    };

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn resolve_query(
    config: &Config,
    city: Option<String>,
    coords: Option<Coordinates>,
) -> anyhow::Result<WeatherQuery> {
    if let Some(city) = city {
        return WeatherQuery::new(&city).ok_or_else(|| anyhow!("City name must not be empty"));
    }

    if let Some(coords) = coords {
        let resolver = NominatimResolver::new(config.geocode.base_url.clone())
            .context("Failed to create geocoding client")?;
        let locality = resolver.resolve_locality(coords).await.ok_or_else(|| {
            anyhow!(
                "Could not determine a place name for {}, {}",
                coords.latitude,
                coords.longitude
            )
        })?;
        return WeatherQuery::new(&locality)
            .ok_or_else(|| anyhow!("Reverse geocoding returned an empty place name"));
    }

    let city = config.default_city.as_deref().unwrap_or(FALLBACK_CITY);
    WeatherQuery::new(city).ok_or_else(|| anyhow!("Configured default city is empty"))
}

async fn show(
    config: &Config,
    city: Option<String>,
    coords: Option<Coordinates>,
    hour: Option<u32>,
    json: bool,
    save_icon: Option<PathBuf>,
) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;
    let query = resolve_query(config, city, coords).await?;

    let snapshot = provider.fetch_weather(&query).await.map_err(|e| {
        tracing::debug!(error = %e, "fetch failed");
        anyhow!(e.kind().user_message())
    })?;

    let window = select_window(&snapshot, current_hour(hour));

    if json {
        let doc = serde_json::json!({ "snapshot": snapshot, "window": window });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        print!("{}", render_current(&snapshot));
        println!();
        print!("{}", render_window(&window));
    }

    if let Some(path) = save_icon {
        let icon = snapshot
            .current
            .condition_icon
            .as_deref()
            .ok_or_else(|| anyhow!("The provider did not return a condition icon"))?;

        let cache = HttpImageCache::new(Duration::from_secs(config.api.timeout_secs))
            .context("Failed to create image client")?;
        match cache.resolve_image(icon).await {
            ImageLookup::Found(image) => {
                std::fs::write(&path, &image.bytes)
                    .with_context(|| format!("Failed to write icon to {}", path.display()))?;
                eprintln!("Saved icon to {}", path.display());
            }
            ImageLookup::NotFound => bail!("Condition icon not found"),
        }
    }

    Ok(())
}

async fn interactive(config: &Config, hour: Option<u32>) -> anyhow::Result<()> {
    let provider: Arc<dyn WeatherProvider> = provider_from_config(config)?.into();
    let mut session = WeatherSession::new(provider);

    if let Some(city) = &config.default_city {
        session.on_location_submitted(city);
        print_events(session.next_events(current_hour(hour)).await);
    }

    loop {
        let input = tokio::task::spawn_blocking(|| {
            Text::new("City:").with_help_message("Empty line to quit").prompt()
        })
        .await
        .context("City prompt panicked")?;

        let input = match input {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city name"),
        };

        if session.on_location_submitted(&input).is_none() {
            break;
        }
        print_events(session.next_events(current_hour(hour)).await);
    }

    Ok(())
}

fn print_events(events: Vec<WeatherEvent>) {
    for event in events {
        match event {
            WeatherEvent::SnapshotReady(snapshot) => {
                println!();
                print!("{}", render_current(&snapshot));
            }
            WeatherEvent::ForecastWindowReady(window) => {
                println!();
                print!("{}", render_window(&window));
                println!();
            }
            WeatherEvent::FetchFailed(kind) => {
                eprintln!("Error: {}", kind.user_message());
            }
        }
    }
}
