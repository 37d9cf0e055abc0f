use homework_notifier::config::BotConfig;

#[tokio::main]
async fn main() {
    // A missing .env is fine; variables may come from the real environment.
    let _ = dotenvy::dotenv();
    homework_notifier::logging::init();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}. Program stopped.", e);
            std::process::exit(1);
        }
    };

    match serde_json::to_string(&config) {
        Ok(json) => log::info!("Configuration: {}", json),
        Err(e) => log::warn!("Could not render configuration: {}", e),
    }

    if let Err(e) = homework_notifier::run(&config).await {
        log::error!("{}. Program stopped.", e);
        std::process::exit(1);
    }
}
