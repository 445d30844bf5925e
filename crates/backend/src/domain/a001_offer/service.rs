use std::sync::Arc;

use contracts::domain::a001_offer::{Offer, OfferId};

use super::repository::{OfferFilter, OfferStore, StoreError};

/// Чтение каталога: поиск, карточка предложения, дополнительные предложения
#[derive(Clone)]
pub struct OfferService {
    primary: Arc<dyn OfferStore>,
    supplementary: Arc<dyn OfferStore>,
}

impl OfferService {
    pub fn new(primary: Arc<dyn OfferStore>, supplementary: Arc<dyn OfferStore>) -> Self {
        Self {
            primary,
            supplementary,
        }
    }

    /// Поиск по основному каталогу
    pub async fn search(&self, filter: &OfferFilter) -> Result<Vec<Offer>, StoreError> {
        self.primary.search(filter).await
    }

    /// Получение основного предложения по ID
    pub async fn get_by_id(&self, id: OfferId) -> Result<Option<Offer>, StoreError> {
        self.primary.get_by_id(id).await
    }

    /// Дополнительные предложения по списку ID (в порядке запроса)
    pub async fn list_supplementaries(&self, ids: &[OfferId]) -> Result<Vec<Offer>, StoreError> {
        self.supplementary.list_by_ids(ids).await
    }
}
