use speaksafe_core::RelayConfig;

// mimalloc as the global allocator: lower fragmentation in musl containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = RelayConfig::from_env()?;

    let (_state, router) = speaksafe_api::setup::initialize_app(config.clone()).await?;

    speaksafe_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
