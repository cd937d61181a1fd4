use crate::state::{AppState, ServerConfig};
use actix_web::{HttpRequest, HttpResponse, HttpServer, get, post, web};
use std::collections::HashMap;
use std::io::Write;

fn render_page(app_state: &AppState, result: Option<&str>) -> Result<HttpResponse, actix_web::Error> {
    let html = app_state
        .page
        .render(result)
        .map_err(actix_web::error::ErrorInternalServerError)?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

#[get("/health")]
pub async fn health(_req: HttpRequest, _: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().body("Ok")
}

#[get("/")]
pub async fn index(
    _req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, actix_web::Error> {
    render_page(&app_state, None)
}

/// Prediction failures never change the status code; the page carries the
/// generic failure message instead.
#[post("/predict")]
pub async fn predict(
    _req: HttpRequest,
    form: Option<web::Form<HashMap<String, String>>>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, actix_web::Error> {
    // an undecodable body is handled like one with every field missing
    let form = form.map(|f| f.into_inner()).unwrap_or_default();
    let result = app_state.predictor.recommend(&form);
    render_page(&app_state, Some(&result))
}

pub fn init_logging(level: log::LevelFilter) {
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, level)
        .init();
}

pub async fn startup(config: ServerConfig, app_state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(app_state);

    log::info!("Starting server at {}:{}", config.host, config.port);

    let mut server = HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(app_state.clone())
            .service(health)
            .service(index)
            .service(predict)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }
    server.bind((config.host, config.port))?.run().await?;

    std::io::Result::Ok(())
}
