use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_sync_offers::{
    BssOffer, SyncOffers, SyncOffersRequest, SyncSummary,
};
use tokio::sync::Mutex;

use super::errors::SyncError;
use super::reconciliation::{ReconcileOutcome, Reconciler};

/// Executor для UseCase синхронизации каталога
///
/// Пакет обрабатывается последовательно: сначала основные предложения,
/// затем дополнительные, каждое в порядке пакета. Ошибка одного предложения
/// пишется в лог и не останавливает остальные.
pub struct SyncExecutor {
    reconciler: Reconciler,
    // один писатель: сверка (поиск -> слияние -> upsert) не атомарна
    writer: Mutex<()>,
}

impl SyncExecutor {
    pub fn new(reconciler: Reconciler) -> Self {
        Self {
            reconciler,
            writer: Mutex::new(()),
        }
    }

    pub async fn execute(&self, request: &SyncOffersRequest) -> Result<SyncSummary, SyncError> {
        let _guard = self.writer.lock().await;

        let (primary, supplementary): (Vec<&BssOffer>, Vec<&BssOffer>) =
            request.offers().partition(|offer| offer.is_primary());

        tracing::info!(
            "[{}] Starting offer sync: {} primary, {} supplementary",
            SyncOffers::full_name(),
            primary.len(),
            supplementary.len()
        );

        let mut summary = SyncSummary {
            total: primary.len() + supplementary.len(),
            ..SyncSummary::default()
        };

        for offer in primary.into_iter().chain(supplementary) {
            match self.reconciler.reconcile(offer).await {
                Ok(outcome) => {
                    tracing::debug!(
                        offer = %offer.name,
                        external_id = %offer.id,
                        ?outcome,
                        "Offer synced"
                    );
                    match outcome {
                        ReconcileOutcome::Inserted(_) => summary.inserted += 1,
                        ReconcileOutcome::Updated(_) => summary.updated += 1,
                        ReconcileOutcome::Removed => summary.removed += 1,
                        ReconcileOutcome::Absent => {}
                    }
                }
                Err(e) => {
                    tracing::error!(
                        offer = %offer.name,
                        external_id = %offer.id,
                        "Failed to sync offer: {}",
                        e
                    );
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            "[{}] Offer sync completed: total={}, inserted={}, updated={}, removed={}, failed={}",
            SyncOffers::full_name(),
            summary.total,
            summary.inserted,
            summary.updated,
            summary.removed,
            summary.failed
        );

        if summary.is_success() {
            Ok(summary)
        } else {
            Err(SyncError::PartialFailure {
                failed: summary.failed,
                total: summary.total,
            })
        }
    }
}
