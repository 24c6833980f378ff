use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;

use recipe_api::config::ServerConfig;
use recipe_api::db::establish_connection_pool;
use recipe_api::repository::DieselRepository;
use recipe_api::routes::configure;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let server_config = ServerConfig::from_env();

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    if let Err(e) = std::fs::create_dir_all(&server_config.media_root) {
        log::error!(
            "Failed to create media root {}: {e}",
            server_config.media_root.display()
        );
        std::process::exit(1);
    }

    let address = server_config.address.clone();
    let port = server_config.port;
    log::info!("Listening on {address}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new(
                &server_config.media_url,
                &server_config.media_root,
            ))
            .configure(configure)
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
