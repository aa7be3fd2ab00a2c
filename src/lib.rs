#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod dto;
#[cfg(feature = "data")]
pub mod pagination;

#[cfg(feature = "server")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod sessions;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use std::time::Duration;

    use actix_files::Files;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::domain::catalog::ReportProfile;
    use crate::models::config::ServerConfig;
    use crate::repository::Dhis2Repository;
    use crate::routes::certificate::{close_certificate, show_certificate};
    use crate::routes::main::show_index;
    use crate::routes::org_units::{
        collapse_org_unit, expand_org_unit, highlight_org_unit, save_org_unit, show_org_units,
    };
    use crate::routes::period::{save_period, show_period};
    use crate::routes::report::{change_page, change_page_size, generate_report};
    use crate::sessions::ReportStore;

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    ///
    /// The repository wraps a blocking HTTP client and must be built by the
    /// caller outside of any async runtime.
    pub async fn run(server_config: ServerConfig, repo: Dhis2Repository) -> std::io::Result<()> {
        let profile = ReportProfile::try_from(&server_config)
            .map_err(|e| std::io::Error::other(format!("Invalid report settings: {e}")))?;

        let store = web::Data::new(ReportStore::new(
            Duration::from_secs(server_config.session_idle_minutes * 60),
            profile.default_page_size,
        ));

        // Keys and stores for sessions and flash messages.
        let secret_key = Key::try_from(server_config.secret.as_bytes())
            .map_err(|e| std::io::Error::other(format!("Invalid secret: {e}")))?;

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!(
            "Serving birth notification report for program {} on {}:{}",
            profile.program_id,
            bind_address.0,
            bind_address.1
        );

        HttpServer::new(move || {
            App::new()
                .wrap(message_framework.clone())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false) // set to true in prod
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .service(show_index)
                .service(show_org_units)
                .service(expand_org_unit)
                .service(collapse_org_unit)
                .service(highlight_org_unit)
                .service(save_org_unit)
                .service(show_period)
                .service(save_period)
                .service(generate_report)
                .service(change_page)
                .service(change_page_size)
                .service(show_certificate)
                .service(close_certificate)
                .app_data(web::Data::new(tera.clone()))
                .app_data(web::Data::new(repo.clone()))
                .app_data(store.clone())
                .app_data(web::Data::new(profile.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
