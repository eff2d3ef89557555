use std::sync::Arc;

use tracing::{error, info};

use campus::auth::{ensure_user, HashParams};
use campus::{Config, Database, Role, WebServer};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    let config_path =
        std::env::var("CAMPUS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let config = match Config::load_with_env(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = campus::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        campus::logging::init_console_only(&config.logging.level);
    }

    info!("campus - learning-management backend");

    if let Err(e) = run(config).await {
        error!("Fatal: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> campus::Result<()> {
    config.validate()?;

    let db = Arc::new(Database::open(&config.database.path).await?);

    if config.admin.is_configured() {
        let params = HashParams::from_config(&config.auth);
        let admin = &config.admin;
        let name = if admin.name.is_empty() {
            "Administrator"
        } else {
            admin.name.as_str()
        };
        match ensure_user(&db, &params, name, &admin.email, &admin.password, Role::Admin).await? {
            Some(user) => info!(user_id = user.id, "Created bootstrap administrator"),
            None => info!("Bootstrap administrator already present"),
        }
    }

    let server = WebServer::new(&config, db)?;
    info!("Server configured on {}", server.addr());
    server.run().await?;

    info!("Server stopped");
    Ok(())
}
