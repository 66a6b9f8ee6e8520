use anyhow::Context;
use std::sync::Arc;
use tracing::{error, info, warn};

use otp_core::{ExpiredOtpReaper, OtpEngine, OtpRepository};
use otp_infra::database::{DatabasePool, MySqlOtpRepository};
use otp_infra::InMemoryOtpStore;
use otp_shared::config::{AppConfig, StoreBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = otp_infra::load_config()?;
    otp_infra::logging::init(&config.logging)?;

    info!(
        environment = %config.environment,
        store = ?config.store,
        "Starting OTP worker"
    );

    match config.store {
        StoreBackend::Memory => {
            if config.environment.is_production() {
                error!(
                    event = "otp_memory_store_in_production",
                    "Using the in-memory store in production: codes are not shared between \
                     workers and will not survive a restart"
                );
            } else {
                warn!("Using the in-memory store, issued codes will not survive a restart");
            }
            run(Arc::new(InMemoryOtpStore::new()), &config).await
        }
        StoreBackend::Mysql => {
            let pool = DatabasePool::new(config.database.clone())
                .await
                .context("Failed to connect to the database")?;
            pool.run_migrations().await?;
            if !pool.health_check().await? {
                anyhow::bail!("Database health check failed");
            }

            let store = Arc::new(MySqlOtpRepository::new(pool.get_pool().clone()));
            let result = run(store, &config).await;

            info!("{}", pool.get_statistics());
            pool.close().await;
            result
        }
    }
}

/// Host the engine and its reaper until ctrl-c
async fn run<R: OtpRepository + 'static>(store: Arc<R>, config: &AppConfig) -> anyhow::Result<()> {
    let engine = OtpEngine::new(store, &config.otp).context("Invalid OTP configuration")?;
    let engine = Arc::new(engine);

    let policy = engine.policy();
    info!(
        code_length = policy.length(),
        validity_seconds = policy.validity().num_seconds(),
        max_attempts = policy.max_attempts(),
        "OTP engine ready"
    );

    let reaper = Arc::new(ExpiredOtpReaper::new(engine, config.reaper.clone()));
    let handle = reaper.start();

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for the shutdown signal")?;
    info!("Shutdown signal received, waiting for the reaper");

    handle.shutdown().await;
    info!("OTP worker stopped");
    Ok(())
}
