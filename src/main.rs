use actix_web::{middleware, web, App, HttpServer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use goalpost::data::Roster;
use goalpost::handlers::{self, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("{}:{}", host, port);

    let data_path = std::env::var("DATA_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/MAINRAW.csv"));

    if !data_path.exists() {
        warn!("Data file {:?} not found; requests will fail until it exists", data_path);
    }

    let roster = match std::env::var("T9_ROSTER_FILE") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)?;
            Roster::from_json(&json).map_err(|e| {
                std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
            })?
        }
        Err(_) => Roster::default(),
    };

    let app_state = Arc::new(AppState::new(data_path, roster));

    info!("Starting Goalpost API server at http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .route("/health", web::get().to(handlers::health::health_check))
            .route(
                "/api/investment/calculate",
                web::post().to(handlers::invest::calculate),
            )
            .route(
                "/api/investment/teams-ranking",
                web::post().to(handlers::invest::teams_ranking),
            )
            .route(
                "/api/investment/filters",
                web::get().to(handlers::invest::filters),
            )
            .route(
                "/api/backtesting/run",
                web::post().to(handlers::backtest::run),
            )
            .route(
                "/api/backtesting/teams",
                web::get().to(handlers::backtest::teams),
            )
            .route(
                "/api/backtesting/seasons",
                web::get().to(handlers::backtest::seasons),
            )
            .route(
                "/api/markets/analysis",
                web::get().to(handlers::markets::analysis),
            )
    })
    .bind(&addr)?
    .run()
    .await
}
