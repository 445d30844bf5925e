use std::sync::Arc;

use contracts::domain::a001_offer::{Offer, OfferId};
use contracts::usecases::u501_sync_offers::BssAttached;

use crate::domain::a001_offer::repository::{OfferStore, StoreError};

/// Подбор внутренних ID дополнительных предложений для основного
pub struct RelationshipResolver {
    supplementary: Arc<dyn OfferStore>,
}

impl RelationshipResolver {
    pub fn new(supplementary: Arc<dyn OfferStore>) -> Self {
        Self { supplementary }
    }

    /// Для каждой ссылки: найти запись по внешнему ID или создать
    /// заготовку. Первая ошибка хранилища прерывает весь список.
    pub async fn resolve(&self, attached: &[BssAttached]) -> Result<Vec<OfferId>, StoreError> {
        let mut ids = Vec::with_capacity(attached.len());

        for reference in attached {
            if let Some(existing) = self.supplementary.get_by_external_id(&reference.id).await? {
                ids.push(existing.id);
                continue;
            }

            let stub = self.supplementary.upsert(Offer::stub(reference.id.clone())).await?;
            tracing::debug!(
                external_id = %reference.id,
                id = %stub.to_string_id(),
                "Created supplementary offer stub"
            );
            ids.push(stub.id);
        }

        Ok(ids)
    }
}
