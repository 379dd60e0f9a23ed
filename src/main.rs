use anyhow::Result;
use skycast::{
    JsonFileStore, KeyValue, LocationResolver, MemoryStore, Phase, SessionController,
    SkycastConfig, Snapshot, StaticGeolocator, Store, Unit, WeatherApiClient, condition_info,
    locate, units,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = SkycastConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    if config.logging.format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let backend: Arc<dyn KeyValue> = match JsonFileStore::default_path() {
        Some(path) => Arc::new(JsonFileStore::new(path)),
        None => Arc::new(MemoryStore::new()),
    };
    let store = Store::new(backend);

    let api = WeatherApiClient::new(config.api.clone())?;
    let controller = SessionController::new(api, store.clone(), config.search.max_suggestions);

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if query.is_empty() {
        controller.start(None).await;
    } else if query == "--here" {
        let geolocator = StaticGeolocator::from_config(&config.geolocation);
        let timeout = Duration::from_secs(config.geolocation.timeout_seconds);
        match locate(&geolocator, timeout).await {
            Ok(position) => controller.fetch_by_position(position).await,
            Err(e) => {
                eprintln!("{}", e.user_message());
                std::process::exit(1);
            }
        }
    } else {
        // Prefer the best geocoding candidate; a query the provider cannot
        // resolve is forwarded as free text for fetch-by-name
        let mut candidates = controller.search(&query).await;
        let selection = if candidates.is_empty() {
            LocationResolver::from_free_text(&query)
        } else {
            candidates.remove(0)
        };
        controller.select(selection).await;
    }

    let snapshot = controller.snapshot();
    let unit = store.preferred_unit();

    match snapshot.phase {
        Phase::Ready => render(&snapshot, unit),
        Phase::Idle => {
            println!("☁️  Sky Cast");
            println!();
            println!("No location yet. Search for a city:  skycast <query>");
            let recent = store.recent_searches();
            if !recent.is_empty() {
                println!();
                println!("Recent searches:");
                for location in recent {
                    if location.country.is_empty() {
                        println!("  - {}", location.name);
                    } else {
                        println!("  - {}, {}", location.name, location.country);
                    }
                }
            }
        }
        Phase::Error => {
            if let Some(error) = &snapshot.error {
                eprintln!("{}", error.user_message());
            }
            std::process::exit(1);
        }
        Phase::Loading => {}
    }

    Ok(())
}

fn render(snapshot: &Snapshot, unit: Unit) {
    let Some(current) = &snapshot.current else {
        return;
    };

    if let Some(location) = &snapshot.location {
        if location.country.is_empty() {
            println!("☁️  Sky Cast · {}", location.name);
        } else {
            println!("☁️  Sky Cast · {}, {}", location.name, location.country);
        }
    }
    if let Some(updated) = snapshot.last_updated {
        println!("Updated {}", units::relative_time(updated, chrono::Utc::now()));
    }
    println!();

    let info = condition_info(current.condition, &current.description);
    println!(
        "{}  {}  {}  (feels like {})",
        info.icon,
        info.description,
        units::format_temperature(current.temperature, unit),
        units::format_temperature(current.feels_like, unit),
    );
    println!(
        "Humidity {}   Pressure {}   Wind {} {}",
        units::format_humidity(current.humidity),
        units::format_pressure(current.pressure, unit),
        units::format_wind_speed(current.wind_speed, unit),
        units::format_wind_direction(current.wind_deg),
    );
    if let Some(visibility) = current.visibility {
        println!("Visibility {}", units::format_visibility(visibility, unit));
    }
    if let (Some(sunrise), Some(sunset)) = (current.sunrise, current.sunset) {
        println!(
            "Sunrise {}   Sunset {}",
            units::format_clock(sunrise),
            units::format_clock(sunset)
        );
    }

    if !snapshot.forecast.is_empty() {
        println!();
        println!("5-day forecast:");
        for day in &snapshot.forecast {
            let info = condition_info(day.summary.condition, &day.summary.condition_description);
            println!(
                "  {}  {}  {} / {}  {}",
                units::day_name(day.timestamp, true),
                info.icon,
                units::format_temperature(day.summary.temp_min, unit),
                units::format_temperature(day.summary.temp_max, unit),
                info.description,
            );
        }
    }
}
