use actix_web::{middleware::Logger, web, App, HttpServer};

use placement_bot::{app_state::AppState, config::Config, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = AppState::new(config)
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    log::info!("starting placement bot on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .service(handlers::inbound_message)
            .service(handlers::health_check)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
