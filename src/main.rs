use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use tera::Tera;

use component_compares::ai::client::OpenAiClient;
use component_compares::db::establish_connection_pool;
use component_compares::models::config::AppConfig;
use component_compares::repository::DieselRepository;
use component_compares::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database pool: {e}");
            std::process::exit(1);
        }
    };

    let tera = match Tera::new("templates/**/*.html") {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Failed to load templates: {e}");
            std::process::exit(1);
        }
    };

    let repo = DieselRepository::new(pool);
    let ai_client = OpenAiClient::new(&config.ai);
    let secret = Key::derive_from(config.secret_key.as_bytes());
    let bind_address = (config.bind_address.clone(), config.port);

    log::info!("Starting server on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        let message_store = CookieMessageStore::builder(secret.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        App::new()
            .wrap(Logger::default())
            .wrap(IdentityMiddleware::default())
            .wrap(message_framework)
            .wrap(SessionMiddleware::new(
                CookieSessionStore::default(),
                secret.clone(),
            ))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(ai_client.clone()))
            .service(Files::new("/static", "./static"))
            .service(routes::main::index)
            .service(routes::main::show_components)
            .service(routes::main::show_component)
            .service(routes::auth::show_login)
            .service(routes::auth::login)
            .service(routes::auth::register)
            .service(routes::auth::logout)
            .service(routes::builds::show_builder)
            .service(routes::builds::select_component)
            .service(routes::builds::remove_component)
            .service(routes::builds::clear_selection)
            .service(routes::builds::save_build)
            .service(routes::builds::download_build)
            .service(routes::builds::show_builds)
            .service(routes::builds::delete_build)
            .service(routes::ai::show_ai_builder)
            .service(routes::ai::generate_build)
            .service(routes::ai::show_compatibility)
            .service(routes::ai::check_compatibility)
            .service(routes::admin::show_dashboard)
            .service(routes::admin::show_products)
            .service(routes::admin::show_product_edit)
            .service(routes::admin::add_product)
            .service(routes::admin::update_product)
            .service(routes::admin::delete_product)
            .service(routes::admin::find_product_prices)
            .service(routes::admin::enrich_product)
            .service(routes::admin::show_users)
            .service(routes::admin::set_user_role)
            .service(routes::api::api_v1_components)
            .default_service(web::route().to(routes::main::default_not_found))
    })
    .bind(bind_address)?
    .run()
    .await
}
