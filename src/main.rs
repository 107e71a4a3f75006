use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use actix_web_prom::PrometheusMetricsBuilder;
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use fittrack::config::AppConfig;
use fittrack::db::{ConnectionProvider, DbConfig, Repositories};
use fittrack::handlers::{self, fitness::FitnessPage};
use fittrack::tasks::analytics::shared_output;
use fittrack::tasks::auto_sync::{AutoSync, SyncEvent};

fn to_io_error<E: std::fmt::Display>(err: E) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    let db_config = DbConfig::from_env().map_err(to_io_error)?;
    let provider = ConnectionProvider::new(&db_config).map_err(to_io_error)?;

    if config.run_migrations {
        provider.migrate().await.map_err(|e| {
            error!("{}", e);
            to_io_error(e)
        })?;
        info!("Database schema is up to date");
    }

    let repos = Repositories::new(provider);
    let shutdown = CancellationToken::new();

    // Periodic refresh of whoever logged in last
    let (current_user, current_user_rx) = watch::channel(None);
    let auto_sync = AutoSync::spawn(Arc::new(repos.workouts.clone()), current_user_rx, config.sync);
    let mut sync_events = auto_sync.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = sync_events.recv().await {
            if let SyncEvent::Failed { email, message, .. } = event {
                error!("Auto-sync for {} failed: {}", email, message);
            }
        }
    });

    let fitness_page = FitnessPage {
        user_id: config.web_user_id,
        summary_delay: config.summary_delay,
        output: shared_output(std::io::stdout()),
        shutdown: shutdown.clone(),
    };

    let mut labels = HashMap::new();
    labels.insert("app".to_string(), "fittrack".to_string());
    let prometheus = PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics")
        .const_labels(labels)
        .build()
        .map_err(to_io_error)?;

    let repos = web::Data::new(repos);
    let current_user = web::Data::new(current_user);
    let fitness_page = web::Data::new(fitness_page);

    info!("Starting server at {}", config.bind_address);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(prometheus.clone())
            .app_data(repos.clone())
            .app_data(current_user.clone())
            .app_data(fitness_page.clone())
            .configure(handlers::configure)
    })
    .workers(num_cpus::get())
    .bind(&config.bind_address)?
    .run()
    .await?;

    shutdown.cancel();
    auto_sync.shutdown().await;
    info!("Server stopped");
    Ok(())
}
