use std::env;

use birth_notification_report::models::config::ServerConfig;
use birth_notification_report::repository::Dhis2Repository;
use config::Config;
use dotenvy::dotenv;

fn main() -> std::io::Result<()> {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        // Add `./config/default.yaml`
        .add_source(config::File::with_name("config/default"))
        // Add environment-specific overrides
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        // Add settings from the environment (with a prefix of APP)
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {err}");
            std::process::exit(1);
        }
    };

    let server_config = match settings.try_deserialize::<ServerConfig>() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    // The blocking client may not be created inside the async runtime.
    let repo = match Dhis2Repository::from_config(&server_config) {
        Ok(repo) => repo,
        Err(err) => {
            log::error!("Error creating DHIS2 client: {err}");
            std::process::exit(1);
        }
    };

    actix_web::rt::System::new().block_on(birth_notification_report::run(server_config, repo))
}
