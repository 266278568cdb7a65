#![warn(clippy::all, clippy::pedantic)]

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use tracing::info;
use watches::{LibsqlWatchStore, SystemClock, WatchRegistry};

mod config;
mod error;
mod routes;

use config::ServerArgs;
use error::AppError;
use logger::init_tracing;

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = ServerArgs::parse();
    let addr = args.socket_addr()?;

    let store = LibsqlWatchStore::open(&args.database, args.pool_size).await?;
    let registry = web::Data::new(WatchRegistry::new(Arc::new(store), Arc::new(SystemClock)));

    run_server(addr, registry, args.cors_origins()).await
}

async fn run_server(
    addr: SocketAddr,
    registry: web::Data<WatchRegistry>,
    cors_origins: Vec<String>,
) -> Result<(), AppError> {
    info!("Serving watch registry on http://{addr} (CORS origins: {cors_origins:?})");

    HttpServer::new(move || {
        App::new()
            .wrap(routes::cors(&cors_origins))
            .app_data(registry.clone())
            .app_data(routes::json_config())
            .configure(routes::routes)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
