mod api;
mod config;
mod dal;
mod db;
mod dto;
mod error;
mod model;
mod telemetry;

use actix_web::web::Data;
use actix_web::{get, middleware::Logger, web, App, HttpResponse, HttpServer, Responder, Result};
use anyhow::Context;

use crate::config::Config;
use crate::db::MongoDbClient;
use crate::dto::MessageResponse;

#[get("/health")]
async fn healthcheck() -> impl Responder {
    HttpResponse::Ok().json(MessageResponse::new("Everything is working fine"))
}

#[get("/health/db")]
async fn database_healthcheck(client: web::Data<MongoDbClient>) -> impl Responder {
    match client.ping().await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Database is reachable")),
        Err(err) => {
            tracing::warn!(error = %err, "database ping failed");
            HttpResponse::ServiceUnavailable().json(MessageResponse::new("Database is not available"))
        }
    }
}

async fn not_found() -> Result<HttpResponse> {
    Ok(HttpResponse::NotFound().json(MessageResponse::new("Resource not found")))
}

async fn setup(config: &Config) -> anyhow::Result<(Data<MongoDbClient>, Data<dal::ToDoDal>)> {
    let client = MongoDbClient::new(config)
        .await
        .context("failed to create MongoDB client")?;
    let dal = client.todo_dal();
    Ok((web::Data::new(client), web::Data::new(dal)))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::new()?;
    telemetry::init(config.debug)?;

    let (client, dal) = setup(&config).await?;
    client.ping().await.context("database is not available")?;
    tracing::info!(database = %config.database_name, "connected to MongoDB");

    tracing::info!(host = %config.host, port = config.port, "starting HTTP server");
    let server_client = client.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(server_client.clone())
            .app_data(dal.clone())
            .configure(api::config)
            .service(healthcheck)
            .service(database_healthcheck)
            .default_service(web::route().to(not_found))
            .wrap(Logger::default())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    client.get_ref().clone().shutdown().await;
    tracing::info!("server stopped, MongoDB client shut down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use actix_web::test::TestRequest;

    const UNREACHABLE_URI: &str = "mongodb://localhost:1/?serverSelectionTimeoutMS=200";

    #[actix_web::test]
    async fn test_healthcheck() {
        let app = test::init_service(App::new().service(healthcheck)).await;
        let req = TestRequest::default().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(StatusCode::OK, resp.status());
    }

    #[actix_web::test]
    async fn test_not_found() {
        let app = test::init_service(App::new().default_service(web::route().to(not_found))).await;
        let req = TestRequest::default().uri("/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(StatusCode::NOT_FOUND, resp.status());
        let body: MessageResponse = test::read_body_json(resp).await;
        assert_eq!(body.message, "Resource not found");
    }

    #[actix_web::test]
    async fn test_database_healthcheck_unreachable() {
        let (client, _dal) = setup(&Config::new_mongodb_uri(UNREACHABLE_URI.to_string())).await.unwrap();
        let app = test::init_service(App::new().app_data(client).service(database_healthcheck)).await;
        let req = TestRequest::default().uri("/health/db").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(StatusCode::SERVICE_UNAVAILABLE, resp.status());
    }

    #[actix_web::test]
    async fn test_database_healthcheck() {
        let (_container, uri) = db::testing::start_mongo().await;
        let (client, dal) = setup(&Config::new_mongodb_uri(uri)).await.unwrap();
        let app = test::init_service(
            App::new()
                .app_data(client)
                .app_data(dal)
                .configure(api::config)
                .service(database_healthcheck),
        )
        .await;
        let req = TestRequest::default().uri("/health/db").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(StatusCode::OK, resp.status());

        let req = TestRequest::get().uri("/api/lists").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(StatusCode::OK, resp.status());
    }
}
