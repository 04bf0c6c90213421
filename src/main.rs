// src/main.rs
//
// Batch entry point: wire the object graph from configuration, run one
// recovery pass over the approval feed, report the summary.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use adrescue::db::{create_connection_pool, default_database_path, initialize_database};
use adrescue::integrations::{
    ApprovalFeed, AssetCatalog, CommandComposition, CompositionService, HttpUploadService,
    JsonApprovalFeed, LocalDirCatalog, UploadService,
};
use adrescue::repositories::{QueueRepository, SqliteQueueRepository};
use adrescue::services::{ChannelRouter, RecoveryOptions, RecoveryService};
use adrescue::{AppConfig, QueueStatus, RecoveryWorkspace};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    // 1. CONFIGURATION (fatal before any candidate is processed)
    let config_path =
        std::env::var("ADRESCUE_CONFIG").unwrap_or_else(|_| "adrescue.json".to_string());
    let config = AppConfig::load(Path::new(&config_path))?;

    // 2. INFRASTRUCTURE
    let db_path = match &config.database_path {
        Some(path) => path.clone(),
        None => default_database_path()?,
    };
    let pool = Arc::new(create_connection_pool(&db_path)?);
    {
        let conn = pool.get()?;
        initialize_database(&conn)?;
    }
    let mut workspace = RecoveryWorkspace::new(None)?;

    // 3. REPOSITORIES
    let queue_repo: Arc<dyn QueueRepository> = Arc::new(SqliteQueueRepository::new(pool.clone()));

    // 4. COLLABORATORS
    let feed: Arc<dyn ApprovalFeed> = Arc::new(JsonApprovalFeed::new(
        config.feed_path.clone(),
        config.disapproved_label.clone(),
    ));
    let catalog: Arc<dyn AssetCatalog> = Arc::new(LocalDirCatalog::new(config.catalog_root.clone()));
    let composition: Arc<dyn CompositionService> = Arc::new(CommandComposition::new(
        config.composition.program.clone(),
        workspace.outputs_dir().to_path_buf(),
    ));
    let upload: Arc<dyn UploadService> =
        Arc::new(HttpUploadService::new(config.upload_endpoint.clone()));

    // 5. SERVICES
    let router = ChannelRouter::new(config.channels.clone());
    log::info!("Configured channels: {:?}", router.configured_tags());

    let service = RecoveryService::new(
        feed,
        catalog,
        composition,
        upload,
        queue_repo.clone(),
        router,
        RecoveryOptions {
            inter_item_delay: Duration::from_secs(config.inter_item_delay_secs),
            composition: config.composition.to_request(),
            visibility: config.upload_visibility,
        },
    );

    // 6. RUN ONE BATCH, cancellable between candidates via Ctrl-C
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("Interrupt received, finishing current candidate");
                cancel.cancel();
            }
        });
    }

    let summary = service.run_batch(&cancel).await?;

    // 7. REPORT
    println!(
        "Batch result: {} succeeded, {} failed, {} skipped (of {})",
        summary.succeeded, summary.failed, summary.skipped, summary.total
    );
    for outcome in &summary.outcomes {
        println!(
            "  {:9} {} ({})",
            format!("{:?}", outcome.disposition).to_lowercase(),
            outcome.identifier,
            outcome.detail
        );
    }

    let counts = queue_repo.counts_by_status()?;
    for status in QueueStatus::ALL {
        println!("  queue {}: {}", status, counts[&status]);
    }

    workspace.cleanup()?;
    Ok(())
}
