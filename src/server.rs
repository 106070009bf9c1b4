use crate::manager::{Manager, Operation, OperationRequest};
use crate::Error;
use actix_web::{
    get, middleware, post,
    web::{self, Data, Json, Path},
    App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use anyhow::{Context, Result};
use prometheus::{Encoder, TextEncoder};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter, Registry};

/// Installs the global subscriber. Logs go to stderr so stdout stays free
/// for rendered manifests and schemas.
pub fn init_tracing(filter: &str) -> Result<()> {
    let logger = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let env_filter = EnvFilter::try_new(filter)
        .or_else(|_| EnvFilter::try_new("info"))
        .context("invalid log filter")?;
    let collector = Registry::default().with(logger).with(env_filter);

    tracing::subscriber::set_global_default(collector)?;
    Ok(())
}

/// Registers every route on an app or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(health)
        .service(metrics)
        .service(schema)
        .service(resource_schema)
        .service(operation);
}

pub async fn run(manager: Manager, bind: &str) -> Result<()> {
    info!(%bind, resources = manager.provider().type_names().len(), "starting provider server");

    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(manager.clone()))
            .wrap(middleware::Logger::default().exclude("/health"))
            .configure(configure)
    })
    .bind(bind)
    .with_context(|| format!("Can not bind to {bind}"))?
    .shutdown_timeout(5)
    .run()
    .await?;

    info!("actix exited");
    Ok(())
}

#[get("/health")]
async fn health(_: HttpRequest) -> impl Responder {
    HttpResponse::Ok().json("healthy")
}

#[get("/")]
async fn index(c: Data<Manager>, _req: HttpRequest) -> impl Responder {
    let d = c.diagnostics().await;
    HttpResponse::Ok().json(&d)
}

#[get("/metrics")]
async fn metrics(c: Data<Manager>, _req: HttpRequest) -> impl Responder {
    let metrics = c.metrics();
    let encoder = TextEncoder::new();
    let mut buffer = vec![];
    match encoder.encode(&metrics, &mut buffer) {
        Ok(()) => HttpResponse::Ok()
            .content_type(encoder.format_type())
            .body(buffer),
        Err(e) => HttpResponse::InternalServerError().json(Error::MetricsError(e).diagnostics()),
    }
}

#[get("/schema")]
async fn schema(c: Data<Manager>) -> impl Responder {
    HttpResponse::Ok().json(c.provider().schema())
}

#[get("/schema/{type_name}")]
async fn resource_schema(c: Data<Manager>, type_name: Path<String>) -> impl Responder {
    match c.provider().resource(&type_name) {
        Ok(resource) => HttpResponse::Ok().json(resource.schema()),
        Err(e) => HttpResponse::NotFound().json(e.diagnostics()),
    }
}

#[post("/resources/{type_name}/{operation}")]
async fn operation(
    c: Data<Manager>,
    path: Path<(String, Operation)>,
    request: Json<OperationRequest>,
) -> impl Responder {
    let (type_name, operation) = path.into_inner();
    match c.execute(&type_name, operation, request.into_inner().value).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => HttpResponse::NotFound().json(e.diagnostics()),
    }
}
