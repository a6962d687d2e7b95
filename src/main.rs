use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use route_schedules::{server, ScheduleReader};
use std::path::PathBuf;

/// Serve the stop schedules of the trips of each route
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory or zip archive holding trips.txt and stop_times.txt
    #[arg(default_value = "../MBTA_GTFS")]
    schedule: PathBuf,
    /// trips.txt to use instead of the one of the schedule
    #[arg(long)]
    trips: Option<PathBuf>,
    /// stop_times.txt to use instead of the one of the schedule
    #[arg(long)]
    stop_times: Option<PathBuf>,
    /// Read the two tables one after the other
    #[arg(long)]
    sequential: bool,
    #[arg(short, long, default_value = "0.0.0.0")]
    address: String,
    #[arg(short, long, default_value_t = 4000)]
    port: u16,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut reader = ScheduleReader::default();
    if args.sequential {
        reader.sequential();
    }

    // nothing is served until both tables are completely read
    let schedule = if args.trips.is_some() || args.stop_times.is_some() {
        let trips = args
            .trips
            .clone()
            .unwrap_or_else(|| args.schedule.join("trips.txt"));
        let stop_times = args
            .stop_times
            .clone()
            .unwrap_or_else(|| args.schedule.join("stop_times.txt"));
        reader.from_files(&trips, &stop_times)
    } else {
        reader.read(&args.schedule)
    }
    .with_context(|| format!("impossible to load the schedule {}", args.schedule.display()))?;
    schedule.print_stats();

    let schedule = web::Data::new(schedule);
    log::info!("listening on {}:{}", args.address, args.port);
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(schedule.clone())
            .configure(server::config)
    })
    .bind((args.address.as_str(), args.port))?
    .run()
    .await?;
    Ok(())
}
