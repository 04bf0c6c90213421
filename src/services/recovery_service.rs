// src/services/recovery_service.rs
//
// Disapproval recovery orchestrator.
//
// One batch run walks every disapproved creative reported by the approval
// feed through: parse -> resolve -> compose -> upload -> enqueue. Candidates
// are processed strictly sequentially; a failure in one candidate never
// aborts the batch (continue-on-error), and every await point races the
// cancellation token so a run can be stopped cleanly between candidates.
//
// The batch ends with an aggregate summary; the enqueued rows are picked up
// by the downstream replacement sink.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::domain::{DisapprovalCandidate, MatchOutcome, NewQueueItem, Visibility};
use crate::error::{AppError, AppResult};
use crate::integrations::composition::CompositionRequest;
use crate::integrations::{ApprovalFeed, AssetCatalog, CompositionService, UploadService};
use crate::repositories::QueueRepository;
use crate::services::asset_resolver::AssetResolver;
use crate::services::channel_router::ChannelRouter;
use crate::services::identifier_parser::IdentifierParser;

/// Pacing and production settings for a batch run.
#[derive(Debug, Clone)]
pub struct RecoveryOptions {
    /// Courtesy pause between external-service-heavy candidates. This is a
    /// cooperative delay, not a scheduling guarantee.
    pub inter_item_delay: Duration,

    pub composition: CompositionRequest,

    pub visibility: Visibility,
}

impl Default for RecoveryOptions {
    fn default() -> Self {
        Self {
            inter_item_delay: Duration::from_secs(5),
            composition: CompositionRequest {
                orientation: Default::default(),
                duration_seconds: 5,
                style: String::new(),
            },
            visibility: Visibility::Unlisted,
        }
    }
}

/// How one candidate ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Replacement produced, uploaded and enqueued
    Succeeded,

    /// Expected, recoverable outcome: unroutable project, no matching
    /// asset, or an already-enqueued identifier
    Skipped,

    /// Infrastructure failure in a collaborator
    Failed,
}

#[derive(Debug, Clone)]
pub struct CandidateOutcome {
    pub identifier: String,
    pub disposition: Disposition,
    pub detail: String,
}

impl CandidateOutcome {
    fn new(candidate: &DisapprovalCandidate, disposition: Disposition, detail: String) -> Self {
        Self {
            identifier: candidate.identifier.clone(),
            disposition,
            detail,
        }
    }
}

/// Aggregate result of one batch run.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Candidates reported by the feed (processed or not)
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,

    /// Per-candidate detail, in processing order
    pub outcomes: Vec<CandidateOutcome>,
}

impl BatchSummary {
    fn new(total: usize) -> Self {
        Self {
            total,
            succeeded: 0,
            failed: 0,
            skipped: 0,
            outcomes: Vec::with_capacity(total),
        }
    }

    /// Candidates actually processed before the batch ended.
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }
}

pub struct RecoveryService {
    feed: Arc<dyn ApprovalFeed>,
    catalog: Arc<dyn AssetCatalog>,
    composition: Arc<dyn CompositionService>,
    upload: Arc<dyn UploadService>,
    queue_repo: Arc<dyn QueueRepository>,
    router: ChannelRouter,
    parser: IdentifierParser,
    resolver: AssetResolver,
    options: RecoveryOptions,
}

impl RecoveryService {
    pub fn new(
        feed: Arc<dyn ApprovalFeed>,
        catalog: Arc<dyn AssetCatalog>,
        composition: Arc<dyn CompositionService>,
        upload: Arc<dyn UploadService>,
        queue_repo: Arc<dyn QueueRepository>,
        router: ChannelRouter,
        options: RecoveryOptions,
    ) -> Self {
        Self {
            feed,
            catalog,
            composition,
            upload,
            queue_repo,
            router,
            parser: IdentifierParser::default(),
            resolver: AssetResolver::default(),
            options,
        }
    }

    /// Run one batch pass over the approval feed.
    ///
    /// Returns an error only when the feed itself cannot be read; everything
    /// per-candidate is caught, logged and counted.
    pub async fn run_batch(&self, cancel: &CancellationToken) -> AppResult<BatchSummary> {
        let candidates = self.feed.list_disapproved().await?;
        let total = candidates.len();

        if total == 0 {
            log::info!("No disapproved creatives; nothing to do");
            return Ok(BatchSummary::new(0));
        }

        log::info!("Batch started: {} disapproved creatives", total);
        let mut summary = BatchSummary::new(total);

        for (index, candidate) in candidates.iter().enumerate() {
            if cancel.is_cancelled() {
                log::warn!("Batch cancelled after {} of {} candidates", index, total);
                break;
            }

            log::info!("[{}/{}] {}", index + 1, total, candidate.identifier);
            let outcome = self.process_candidate(candidate).await;

            match outcome.disposition {
                Disposition::Succeeded => {
                    summary.succeeded += 1;
                    log::info!("[{}/{}] succeeded: {}", index + 1, total, outcome.detail);
                }
                Disposition::Skipped => {
                    summary.skipped += 1;
                    log::warn!("[{}/{}] skipped: {}", index + 1, total, outcome.detail);
                }
                Disposition::Failed => {
                    summary.failed += 1;
                    log::error!("[{}/{}] failed: {}", index + 1, total, outcome.detail);
                }
            }
            summary.outcomes.push(outcome);

            // Courtesy pause between candidates, cancellation-aware.
            if index + 1 < total && !self.options.inter_item_delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        log::warn!("Batch cancelled during inter-item delay");
                        break;
                    }
                    _ = tokio::time::sleep(self.options.inter_item_delay) => {}
                }
            }
        }

        log::info!(
            "Batch finished: {} succeeded, {} failed, {} skipped of {}",
            summary.succeeded,
            summary.failed,
            summary.skipped,
            summary.total
        );
        Ok(summary)
    }

    /// Walk a single candidate through the pipeline. Never returns an error:
    /// every failure becomes a disposition.
    async fn process_candidate(&self, candidate: &DisapprovalCandidate) -> CandidateOutcome {
        // Parsing never fails; degraded results are still routed, since the
        // salvaged project tag may well be valid.
        let parsed = self.parser.parse(&candidate.identifier);
        if parsed.degraded {
            log::warn!(
                "Identifier outside naming convention, best-effort parse: {}",
                candidate.identifier
            );
        }
        if !parsed.has_marker && !parsed.degraded {
            log::warn!("Marker token missing from {}", candidate.identifier);
        }

        let binding = match self.router.route(&parsed.project) {
            Ok(binding) => binding,
            Err(e) => {
                return CandidateOutcome::new(candidate, Disposition::Skipped, e.to_string())
            }
        };

        let assets = match self.catalog.list(&parsed.project) {
            Ok(assets) => assets,
            Err(e) => return CandidateOutcome::new(candidate, Disposition::Failed, e.to_string()),
        };

        let chosen = match self.resolver.resolve(&parsed, &assets) {
            MatchOutcome::Exact(chosen) => chosen,
            MatchOutcome::Fuzzy { candidate: chosen, score } => {
                log::info!(
                    "Fuzzy match at {:.2}: {} -> {}",
                    score,
                    parsed.video_name,
                    chosen.display_name
                );
                chosen
            }
            MatchOutcome::NoMatch { best_score } => {
                return CandidateOutcome::new(
                    candidate,
                    Disposition::Skipped,
                    format!(
                        "no catalog asset matches '{}' (best score {:.2})",
                        parsed.video_name, best_score
                    ),
                );
            }
        };

        let source = match self.catalog.fetch(&chosen) {
            Ok(path) => path,
            Err(e) => return CandidateOutcome::new(candidate, Disposition::Failed, e.to_string()),
        };

        // Composition failure is non-fatal: upload the unmodified source.
        let upload_path = match self
            .composition
            .compose(source.clone(), self.options.composition.clone())
            .await
        {
            Ok(path) => path,
            Err(e) => {
                log::warn!("Composition failed, using unmodified source: {}", e);
                source.clone()
            }
        };
        let composited = upload_path != source;

        let video_url = match self
            .upload
            .upload(
                upload_path,
                parsed.video_name.clone(),
                binding.credential.clone(),
                self.options.visibility,
            )
            .await
        {
            Ok(url) => url,
            Err(e) => return CandidateOutcome::new(candidate, Disposition::Failed, e.to_string()),
        };

        let metadata = serde_json::json!({
            "original_identifier": candidate.identifier,
            "account_id": candidate.account_id,
            "reason": candidate.reason,
            "composited": composited,
        });

        match self.queue_repo.enqueue(NewQueueItem {
            video_url: video_url.clone(),
            project_name: parsed.project.clone(),
            creative_identifier: candidate.identifier.clone(),
            metadata,
        }) {
            Ok(item) => CandidateOutcome::new(
                candidate,
                Disposition::Succeeded,
                format!("enqueued {} -> {}", item.id, video_url),
            ),
            Err(AppError::DuplicateQueueItem { .. }) => CandidateOutcome::new(
                candidate,
                Disposition::Skipped,
                "replacement already enqueued".to_string(),
            ),
            Err(e) => CandidateOutcome::new(candidate, Disposition::Failed, e.to_string()),
        }
    }
}
