use std::sync::Arc;

use contracts::domain::a001_offer::{Offer, OfferId};
use contracts::usecases::u501_sync_offers::BssOffer;

use super::errors::ReconcileError;
use super::relationships::RelationshipResolver;
use super::translator::OfferTranslator;
use crate::domain::a001_offer::repository::OfferStore;

/// Что произошло с предложением при сверке
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Inserted(OfferId),
    Updated(OfferId),
    Removed,
    /// Снятое с продажи предложение и так отсутствовало в каталоге
    Absent,
}

/// Сверка одного предложения с каталогом по внешнему ID
pub struct Reconciler {
    translator: OfferTranslator,
    primary: Arc<dyn OfferStore>,
    supplementary: Arc<dyn OfferStore>,
    relationships: RelationshipResolver,
}

impl Reconciler {
    pub fn new(
        translator: OfferTranslator,
        primary: Arc<dyn OfferStore>,
        supplementary: Arc<dyn OfferStore>,
    ) -> Self {
        Self {
            translator,
            relationships: RelationshipResolver::new(supplementary.clone()),
            primary,
            supplementary,
        }
    }

    pub async fn reconcile(&self, offer: &BssOffer) -> Result<ReconcileOutcome, ReconcileError> {
        let store = if offer.is_primary() {
            &self.primary
        } else {
            &self.supplementary
        };

        if offer.status.is_withdrawn() {
            let removed = store.remove_by_external_id(&offer.id).await?;
            return Ok(if removed {
                ReconcileOutcome::Removed
            } else {
                ReconcileOutcome::Absent
            });
        }

        // Трансляция до любых записей: битое предложение ничего не оставляет
        let translated = self.translator.translate(offer)?;
        let mut spec = translated.spec;

        if offer.is_primary() {
            spec.supplementaries = self.relationships.resolve(offer.attached()).await?;
        }

        let (record, inserted) = match store.get_by_external_id(&translated.external_id).await? {
            Some(existing) => (Offer::revise(&existing, spec), false),
            None => (
                Offer::new_for_insert(Some(translated.external_id), spec),
                true,
            ),
        };

        let saved = store.upsert(record).await?;
        Ok(if inserted {
            ReconcileOutcome::Inserted(saved.id)
        } else {
            ReconcileOutcome::Updated(saved.id)
        })
    }
}
