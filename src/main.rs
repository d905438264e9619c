use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ctf_rating::aggregate::team_report;
use ctf_rating::calculate::{RatingForm, ValidationError};
use ctf_rating::config::AppConfig;
use ctf_rating::fetch::Fetcher;
use ctf_rating::scrape::CtftimeClient;

#[derive(Parser)]
#[command(name = "ctf-rating")]
#[command(about = "CTF event rating calculator and team rating totals from CTFtime")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number (defaults to config, then $PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Log all HTTP requests
        #[arg(long)]
        access_log: bool,
    },

    /// Calculate the rating for a single event result
    Rate {
        /// Event weight shown on CTFtime
        #[arg(long, default_value = "")]
        weight: String,

        /// Total number of teams in the event
        #[arg(long, default_value = "")]
        total_teams: String,

        /// Score of the first-place team
        #[arg(long, default_value = "")]
        best_points: String,

        /// Your team's place
        #[arg(long, default_value = "")]
        team_place: String,

        /// Your team's score
        #[arg(long, default_value = "")]
        team_points: String,
    },

    /// Show a team's top-N rated events and their total
    Team {
        /// CTFtime team id, e.g. 123456
        team_id: String,

        /// Number of events counted towards the total
        #[arg(long)]
        top_n: Option<i64>,

        /// Add the hosted event given by --event-id
        #[arg(long)]
        include_hosted: bool,

        /// CTFtime id of the event your team hosted
        #[arg(long)]
        event_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::debug!("Starting ctf-rating v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve {
            host,
            port,
            access_log,
        } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = ctf_rating::api::state::AppState {
                source: Arc::new(build_client(&config)?),
                config: Arc::new(config),
            };
            let mut app = ctf_rating::api::build_router(state);
            if access_log {
                app = app.layer(TraceLayer::new_for_http());
            }

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Rate {
            weight,
            total_teams,
            best_points,
            team_place,
            team_points,
        } => {
            let form = RatingForm {
                weight: Some(weight.as_str().into()),
                total_teams: Some(total_teams.as_str().into()),
                best_points: Some(best_points.as_str().into()),
                team_place: Some(team_place.as_str().into()),
                team_points: Some(team_points.as_str().into()),
            };
            match form.parse() {
                Ok(inputs) => println!("Calculated Rating: {}", inputs.rate()),
                Err(e) => {
                    tracing::debug!("{}", e);
                    report_validation_error(&e);
                }
            }
        }
        Commands::Team {
            team_id,
            top_n,
            include_hosted,
            event_id,
        } => {
            if team_id.trim().is_empty() {
                eprintln!("Please provide a team ID (e.g., 123456).");
                std::process::exit(2);
            }

            let client = build_client(&config)?;
            let top_n = top_n.unwrap_or(config.ranking.default_top_n);
            let report = match team_report(
                &client,
                &team_id,
                top_n,
                event_id.as_deref(),
                include_hosted,
            )
            .await
            {
                Ok(report) => report,
                Err(e) => {
                    eprintln!("Failed to fetch team data: {}", e);
                    std::process::exit(1);
                }
            };

            if let Some(warning) = &report.ranking.warning {
                eprintln!("{}", warning);
            }
            if let (Some(weight), Some(points)) =
                (report.ranking.hosted_weight, report.ranking.hosted_points)
            {
                println!("Hosted event weight: {} ({} points)", weight, points);
            }
            for event in report.ranking.top() {
                println!(
                    "{:>4} | {:<40} | Rating: {:.3}{}",
                    event.place,
                    event.name,
                    event.rating_points,
                    event.table_marker()
                );
            }
            println!();
            println!("Teams total rating: {:.3}", report.ranking.total());
        }
    }

    Ok(())
}

fn build_client(config: &AppConfig) -> Result<CtftimeClient> {
    let fetcher = Fetcher::new(config.leaderboard.fetcher_config())?;
    let base_url = config.leaderboard.base_url()?;
    Ok(CtftimeClient::new(fetcher, base_url))
}

fn report_validation_error(e: &ValidationError) -> ! {
    eprintln!("{}", e.user_message());
    std::process::exit(2);
}
