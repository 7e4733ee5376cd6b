mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;
mod utils;

#[cfg(test)]
mod testing;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use actix_web_prom::PrometheusMetricsBuilder;
use dotenv::dotenv;
use env_logger::Env;
use log::{info, warn};
use sqlx::PgPool;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use crate::config::Config;
use crate::db::PgActivityRepository;
use crate::services::activity::ActivityService;
use crate::services::publisher::{AmqpPublisher, Topology};
use crate::services::user_validation::HttpUserValidator;

fn startup_error<E: std::fmt::Display>(context: &str) -> impl FnOnce(E) -> io::Error + '_ {
    move |err| io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(startup_error("Invalid configuration"))?;

    // Initialize the database pool and bring the schema up to date
    let pool = PgPool::connect(&config.database_url)
        .await
        .map_err(startup_error("Failed to connect to the database"))?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(startup_error("Failed to run migrations"))?;

    // Events are advisory: start without the broker and connect on first publish
    let rabbitmq = &config.rabbitmq;
    let publisher = AmqpPublisher::new(
        rabbitmq.url.clone(),
        Topology {
            exchange: rabbitmq.exchange.clone(),
            queue: rabbitmq.queue.clone(),
            routing_key: rabbitmq.routing_key.clone(),
        },
    );
    if let Err(e) = publisher.ensure_channel().await {
        warn!("RabbitMQ unavailable at startup, activities will not be published until it is reachable: {}", e);
    }

    let user_validator =
        HttpUserValidator::new(config.user_service_url.clone(), config.user_service_timeout)
            .map_err(startup_error("Failed to build user service client"))?;

    let service = web::Data::new(ActivityService::new(
        Arc::new(PgActivityRepository::new(pool)),
        Arc::new(user_validator),
        Arc::new(publisher),
        rabbitmq.exchange.clone(),
        rabbitmq.routing_key.clone(),
    ));

    // Set up Prometheus metrics
    let mut labels = HashMap::new();
    labels.insert("app".to_string(), "activity_service".to_string());
    let prometheus = PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics")
        .const_labels(labels)
        .build()
        .map_err(startup_error("Failed to create Prometheus metrics"))?;

    info!("Starting server at {}", config.bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(prometheus.clone())
            .app_data(service.clone())
            .configure(handlers::configure)
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
