use account_service::{api, args::ServiceArgs, config::ServiceConfig, AppState};
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServiceArgs::parse_args(std::env::args().collect());

    // 1. Resolve configuration (defaults < file < env < flags)
    let mut config = ServiceConfig::load(args.get_config_path())?;
    args.apply_overrides(&mut config);
    config.validate()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();
    info!("=== Account Registry Service Starting ===");

    // 2. Build registry and generator
    let state = AppState::from_config(&config);
    info!(
        "Strategy policy: {} (sync mode {:?}, refresh on update: {})",
        state.generator.name(),
        state.settings.sync_mode,
        state.settings.regenerate_on_update
    );

    // 3. Serve
    api::serve(&config, state).await?;

    Ok(())
}
