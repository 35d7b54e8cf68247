use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hotel_booking_flow::{
    simulate_payment, BookingStep, EngineConfig, GuestDetails, HotelSearchCriteria, PaymentMethod,
    SearchState, SortKey,
};

#[derive(Parser)]
#[command(name = "hotel-search", version, about = "Search hotels and price bookings")]
struct Cli {
    /// JSON config file; HOTEL_* variables override it
    #[arg(long, env = "HOTEL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full catalog
    List,
    /// Show one hotel's detail page
    Show { id: u32 },
    /// Filter and sort the catalog the way the results page does
    Search {
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long)]
        guests: Option<String>,
        #[arg(short, long, default_value = "default")]
        sort: String,
    },
    /// Query-endpoint style search by location, price range, category and guests
    Find {
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        guests: Option<String>,
    },
    /// Price a stay
    Quote {
        id: u32,
        #[arg(short, long, default_value = "Standard Room")]
        room_type: String,
        #[arg(short, long, default_value_t = 1)]
        days: i64,
    },
    /// Run the booking flow through the simulated payment
    Book {
        id: u32,
        #[arg(long, default_value = "Standard Room")]
        room_type: String,
        #[arg(long)]
        check_in: Option<NaiveDate>,
        #[arg(long)]
        check_out: Option<NaiveDate>,
        #[arg(long)]
        guests: Option<String>,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        mobile: String,
        #[arg(long, default_value = "debit-card")]
        method: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    }
    .with_env_overrides()?;

    let service = config.build_service()?;

    match cli.command {
        Commands::List => print_json(&service.list_hotels().await?)?,
        Commands::Show { id } => print_json(&service.hotel_detail(id).await?)?,
        Commands::Search {
            query,
            guests,
            sort,
        } => {
            let mut state = SearchState::default();
            state.set_search_query(query);
            if let Some(guests) = guests {
                state.set_guests(guests);
            }
            let sort_key = SortKey::parse_lenient(&sort);
            print_json(&service.results(&state, sort_key).await?)?;
        }
        Commands::Find {
            location,
            min_price,
            max_price,
            category,
            guests,
        } => {
            let criteria = HotelSearchCriteria {
                location,
                min_price,
                max_price,
                category,
                guests,
            };
            print_json(&service.search(&criteria).await?)?;
        }
        Commands::Quote {
            id,
            room_type,
            days,
        } => print_json(&service.quote(id, &room_type, days).await?)?,
        Commands::Book {
            id,
            room_type,
            check_in,
            check_out,
            guests,
            first_name,
            last_name,
            email,
            mobile,
            method,
        } => {
            let mut state = SearchState::new(Local::now().date_naive());
            state.set_room_type(room_type);
            if let Some(check_in) = check_in {
                state.set_check_in(check_in);
            }
            if let Some(check_out) = check_out {
                state.set_check_out(check_out);
            }
            if let Some(guests) = guests {
                state.set_guests(guests);
            }

            let params = service.start_booking(id, &state).await?;
            println!("{}", BookingStep::Payment.path(&params));

            let guest = GuestDetails {
                first_name,
                last_name,
                email,
                mobile,
                special_request: String::new(),
            };
            let method: PaymentMethod = method.parse()?;
            let confirmation = simulate_payment(&params, &guest, method)?;
            print_json(&confirmation)?;
            println!("{}", BookingStep::Success.path(&params));
        }
    }

    Ok(())
}
