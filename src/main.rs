use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storefront_delivery::config::{load_app_config, AppConfig};
use storefront_delivery::delivery::{
    config_warnings, DeliveryAddress, DeliveryAreaResolver, DeliveryConfig, DeliveryConfigStore, DeliveryError,
    DeliveryMode,
};
use storefront_delivery::geo::{format_coords, haversine_great_circle_distance_km, GeoPoint};
use storefront_delivery::money::format_cents;
use tracing_subscriber::EnvFilter;

/// Storefront delivery — which stores deliver where, and for how much.
///
/// Examples:
///   delivery quote --lat -23.5874 --lon -46.6576
///   delivery quote --lat -23.56 --lon -46.69 --neighborhood Pinheiros --city "São Paulo" --state SP
///   delivery distance --from-lat -23.55 --from-lon -46.63 --to-lat -22.90 --to-lon -43.17
///   delivery areas --config ./delivery.json
///   delivery serve --port 8080
#[derive(Parser)]
#[command(name = "delivery", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Quote the delivery fee for a destination.
    Quote {
        /// Latitude (-90 to 90).
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude (-180 to 180).
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Neighborhood, for stores priced by named areas.
        #[arg(long, requires_all = ["city", "state"])]
        neighborhood: Option<String>,

        #[arg(long, requires_all = ["neighborhood", "state"])]
        city: Option<String>,

        #[arg(long, requires_all = ["neighborhood", "city"])]
        state: Option<String>,

        /// Store delivery configuration (JSON).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Great-circle distance between two points, in km.
    Distance {
        #[arg(long, allow_hyphen_values = true)]
        from_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        from_lon: f64,
        #[arg(long, allow_hyphen_values = true)]
        to_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        to_lon: f64,
    },

    /// List configured delivery areas and anything left unfinished.
    Areas {
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Serve quotes over HTTP.
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,

        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("storefront_delivery=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Quote {
            lat,
            lon,
            neighborhood,
            city,
            state,
            config,
        } => {
            let order = checked_point(lat, lon);
            let store = load_store(config, &app_config());
            let address = match (neighborhood, city, state) {
                (Some(neighborhood), Some(city), Some(state)) => Some(DeliveryAddress {
                    neighborhood,
                    city,
                    state,
                }),
                _ => None,
            };

            let quote = DeliveryAreaResolver::new(&store).quote(order, address.as_ref());

            eprintln!("  \u{1F4CD} {}", format_coords(order));
            match quote.fee_in_cents {
                Some(fee) if quote.covered => eprintln!("  \u{1F6F5} Delivers here: {}", format_cents(fee)),
                _ => eprintln!("  \u{1F6AB} Outside delivery area"),
            }
            if store.mode == DeliveryMode::Neighborhood && address.is_none() {
                eprintln!("  Hint: this store prices by neighborhood; pass --neighborhood, --city and --state");
            }

            print_json(&quote);
        }

        Command::Distance {
            from_lat,
            from_lon,
            to_lat,
            to_lon,
        } => {
            let from = checked_point(from_lat, from_lon);
            let to = checked_point(to_lat, to_lon);
            println!("{:.3}", haversine_great_circle_distance_km(from, to));
        }

        Command::Areas { config } => {
            let store = load_store(config, &app_config());
            print_areas(&store);
        }

        Command::Serve { host, port, config } => {
            let settings = app_config();
            let store = load_store(config, &settings);
            let host = host.unwrap_or(settings.bind_host);
            let port = port.unwrap_or(settings.bind_port);

            let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| fail(e));
            if let Err(e) = runtime.block_on(storefront_delivery::server::start(&host, port, store)) {
                fail(format!("Cannot serve on {}:{}: {}", host, port, e));
            }
        }
    }
}

/// Environment settings; only the subcommands that read them load them.
fn app_config() -> AppConfig {
    load_app_config().unwrap_or_else(|e| fail(e))
}

fn load_store(path: Option<PathBuf>, app_config: &AppConfig) -> DeliveryConfig {
    let path = path.unwrap_or_else(|| app_config.delivery_config_path.clone());
    DeliveryConfigStore::load_from(&path).unwrap_or_else(|e| fail(e))
}

fn checked_point(lat: f64, lon: f64) -> GeoPoint {
    let point = GeoPoint::new(lat, lon);
    if !point.is_valid() {
        fail(DeliveryError::InvalidCoordinates {
            latitude: lat,
            longitude: lon,
        });
    }
    point
}

fn print_areas(store: &DeliveryConfig) {
    eprintln!("  Store: {} ({} mode)", store.store_id, store.mode);
    if let Some(origin) = store.origin {
        eprintln!("  Origin: {}", format_coords(origin));
    }

    for band in store.effective_bands() {
        let radius = band
            .max_distance_km
            .map_or_else(|| "?".to_string(), |km| format!("{:.1} km", km));
        let fee = band.fee_in_cents.map_or_else(|| "?".to_string(), format_cents);
        eprintln!("    [band] {:<16} up to {:>9}  {}", band.area_id, radius, fee);
    }
    for area in &store.named_areas {
        let fee = area.fee_in_cents.map_or_else(|| "?".to_string(), format_cents);
        eprintln!(
            "    [area] {:<16} {}, {} - {}  {}",
            area.area_id, area.neighborhood, area.city, area.state, fee
        );
    }

    for warning in config_warnings(store) {
        eprintln!("  \u{26A0}\u{FE0F}  {}", warning);
    }

    print_json(store);
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(e),
    }
}

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(1);
}
