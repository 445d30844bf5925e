use async_trait::async_trait;
use chrono::Utc;
use contracts::domain::a001_offer::{
    Catalog, ClientType, Offer, OfferId, OfferSpec, PayMode, ResourceAttributes,
};
use contracts::domain::common::{AggregateId, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select, Set,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("stored offer {id} is corrupted: {source}")]
    Corrupted {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored offer has invalid id {0:?}")]
    InvalidId(String),

    #[error("cannot serialize offer: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Фильтр поиска по каталогу
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferFilter {
    /// `Some(true)` - только действующие сейчас, `Some(false)` - только
    /// вне окна действия
    pub active: Option<bool>,
    pub category: Option<String>,
}

/// Хранилище одного каталога предложений
#[async_trait]
pub trait OfferStore: Send + Sync {
    /// Каталог, с которым работает хранилище
    fn catalog(&self) -> Catalog;

    async fn get_by_id(&self, id: OfferId) -> Result<Option<Offer>, StoreError>;

    async fn get_by_external_id(&self, external_id: &str) -> Result<Option<Offer>, StoreError>;

    /// Вставка или обновление по внутреннему идентификатору
    async fn upsert(&self, offer: Offer) -> Result<Offer, StoreError>;

    /// Удаление по внешнему идентификатору; `false`, если записи не было
    async fn remove_by_external_id(&self, external_id: &str) -> Result<bool, StoreError>;

    async fn search(&self, filter: &OfferFilter) -> Result<Vec<Offer>, StoreError>;

    /// Записи в порядке запрошенных ID, неизвестные ID пропускаются
    async fn list_by_ids(&self, ids: &[OfferId]) -> Result<Vec<Offer>, StoreError>;
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_offer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub catalog: String,
    pub external_id: Option<String>,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub client_type: String,
    pub pay_mode: String,
    pub standalone: bool,
    pub category: String,
    pub offer_type: String,
    pub effective_date: Option<chrono::DateTime<chrono::Utc>>,
    pub expiration_date: Option<chrono::DateTime<chrono::Utc>>,
    pub monthly_fee: f64,
    pub one_off_fee: f64,
    pub currency: Option<String>,
    pub temporal: bool,
    pub resource_attributes_json: Option<String>,
    pub supplementaries_json: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Offer {
    type Error = StoreError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let corrupted = |source| StoreError::Corrupted {
            id: m.id.clone(),
            source,
        };

        let resource_attributes: Option<ResourceAttributes> = m
            .resource_attributes_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(corrupted)?;
        let supplementaries: Vec<OfferId> =
            serde_json::from_str(&m.supplementaries_json).map_err(corrupted)?;
        let uuid = Uuid::parse_str(&m.id).map_err(|_| StoreError::InvalidId(m.id.clone()))?;

        Ok(Offer {
            id: OfferId(uuid),
            external_id: m.external_id,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
                version: m.version,
            },
            spec: OfferSpec {
                name: m.name,
                code: m.code,
                description: m.description,
                client_type: ClientType::from_code(&m.client_type).unwrap_or_default(),
                pay_mode: PayMode::from_code(&m.pay_mode).unwrap_or_default(),
                standalone: m.standalone,
                category: m.category,
                offer_type: m.offer_type,
                effective_date: m.effective_date,
                expiration_date: m.expiration_date,
                monthly_fee: m.monthly_fee,
                one_off_fee: m.one_off_fee,
                currency: m.currency,
                temporal: m.temporal,
                resource_attributes,
                supplementaries,
            },
        })
    }
}

fn to_active_model(catalog: Catalog, offer: &Offer) -> Result<ActiveModel, StoreError> {
    let spec = &offer.spec;
    let resource_attributes_json = spec
        .resource_attributes
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    Ok(ActiveModel {
        id: Set(offer.to_string_id()),
        catalog: Set(catalog.as_str().to_string()),
        external_id: Set(offer.external_id.clone()),
        name: Set(spec.name.clone()),
        code: Set(spec.code.clone()),
        description: Set(spec.description.clone()),
        client_type: Set(spec.client_type.as_str().to_string()),
        pay_mode: Set(spec.pay_mode.as_str().to_string()),
        standalone: Set(spec.standalone),
        category: Set(spec.category.clone()),
        offer_type: Set(spec.offer_type.clone()),
        effective_date: Set(spec.effective_date),
        expiration_date: Set(spec.expiration_date),
        monthly_fee: Set(spec.monthly_fee),
        one_off_fee: Set(spec.one_off_fee),
        currency: Set(spec.currency.clone()),
        temporal: Set(spec.temporal),
        resource_attributes_json: Set(resource_attributes_json),
        supplementaries_json: Set(serde_json::to_string(&spec.supplementaries)?),
        created_at: Set(offer.metadata.created_at),
        updated_at: Set(offer.metadata.updated_at),
        version: Set(offer.metadata.version),
    })
}

fn into_offers(models: Vec<Model>) -> Result<Vec<Offer>, StoreError> {
    models.into_iter().map(Offer::try_from).collect()
}

/// Каталог предложений в SQLite (sea-orm)
#[derive(Clone)]
pub struct SqliteOfferStore {
    conn: DatabaseConnection,
    catalog: Catalog,
}

impl SqliteOfferStore {
    pub fn new(conn: DatabaseConnection, catalog: Catalog) -> Self {
        Self { conn, catalog }
    }

    fn scoped(&self) -> Select<Entity> {
        Entity::find().filter(Column::Catalog.eq(self.catalog.as_str()))
    }
}

#[async_trait]
impl OfferStore for SqliteOfferStore {
    fn catalog(&self) -> Catalog {
        self.catalog
    }

    async fn get_by_id(&self, id: OfferId) -> Result<Option<Offer>, StoreError> {
        self.scoped()
            .filter(Column::Id.eq(id.as_string()))
            .one(&self.conn)
            .await?
            .map(Offer::try_from)
            .transpose()
    }

    async fn get_by_external_id(&self, external_id: &str) -> Result<Option<Offer>, StoreError> {
        self.scoped()
            .filter(Column::ExternalId.eq(external_id))
            .one(&self.conn)
            .await?
            .map(Offer::try_from)
            .transpose()
    }

    async fn upsert(&self, offer: Offer) -> Result<Offer, StoreError> {
        let active = to_active_model(self.catalog, &offer)?;
        let exists = Entity::find_by_id(offer.to_string_id())
            .one(&self.conn)
            .await?
            .is_some();

        if exists {
            active.update(&self.conn).await?;
        } else {
            active.insert(&self.conn).await?;
        }
        Ok(offer)
    }

    async fn remove_by_external_id(&self, external_id: &str) -> Result<bool, StoreError> {
        let result = Entity::delete_many()
            .filter(Column::Catalog.eq(self.catalog.as_str()))
            .filter(Column::ExternalId.eq(external_id))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn search(&self, filter: &OfferFilter) -> Result<Vec<Offer>, StoreError> {
        let mut query = self.scoped();
        if let Some(category) = &filter.category {
            query = query.filter(Column::Category.eq(category.as_str()));
        }
        let offers = into_offers(query.order_by_asc(Column::Name).all(&self.conn).await?)?;

        let Some(active) = filter.active else {
            return Ok(offers);
        };
        let now = Utc::now();
        Ok(offers
            .into_iter()
            .filter(|offer| offer.is_active_at(now) == active)
            .collect())
    }

    async fn list_by_ids(&self, ids: &[OfferId]) -> Result<Vec<Offer>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let found = into_offers(
            self.scoped()
                .filter(Column::Id.is_in(ids.iter().map(|id| id.as_string())))
                .all(&self.conn)
                .await?,
        )?;

        Ok(ids
            .iter()
            .filter_map(|id| found.iter().find(|offer| offer.id == *id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;
    use chrono::Duration;
    use contracts::domain::a001_offer::Capacity;

    async fn stores() -> (SqliteOfferStore, SqliteOfferStore) {
        let conn = connect_in_memory().await.unwrap();
        (
            SqliteOfferStore::new(conn.clone(), Catalog::Primary),
            SqliteOfferStore::new(conn, Catalog::Supplementary),
        )
    }

    fn offer(external_id: &str, name: &str, category: &str) -> Offer {
        Offer::new_for_insert(
            Some(external_id.to_string()),
            OfferSpec {
                name: name.to_string(),
                category: category.to_string(),
                offer_type: "VPS".into(),
                pay_mode: PayMode::All,
                client_type: ClientType::Corporative,
                monthly_fee: 99.5,
                resource_attributes: Some(ResourceAttributes {
                    ram: Some(Capacity {
                        amount: 4.0,
                        unit: "GB".into(),
                    }),
                    ..ResourceAttributes::default()
                }),
                supplementaries: vec![OfferId::new_v4()],
                ..OfferSpec::default()
            },
        )
    }

    #[tokio::test]
    async fn upsert_then_lookup_by_external_id() {
        let (primary, _) = stores().await;
        let stored = primary.upsert(offer("A", "VPS A", "DATACENTER")).await.unwrap();

        let found = primary.get_by_external_id("A").await.unwrap().unwrap();
        assert_eq!(found, stored);
        assert_eq!(primary.get_by_id(stored.id).await.unwrap(), Some(stored));
        assert!(primary.get_by_external_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_updates_existing_row_in_place() {
        let (primary, _) = stores().await;
        let stored = primary.upsert(offer("A", "VPS A", "DATACENTER")).await.unwrap();

        let mut spec = stored.spec.clone();
        spec.name = "VPS A+".into();
        primary.upsert(Offer::revise(&stored, spec)).await.unwrap();

        let all = primary.search(&OfferFilter::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, stored.id);
        assert_eq!(all[0].spec.name, "VPS A+");
        assert_eq!(all[0].metadata.created_at, stored.metadata.created_at);
        assert_eq!(all[0].metadata.version, 1);
    }

    #[tokio::test]
    async fn catalogs_are_independent() {
        let (primary, supplementary) = stores().await;
        primary.upsert(offer("A", "VPS A", "DATACENTER")).await.unwrap();
        supplementary.upsert(Offer::stub("A".into())).await.unwrap();

        assert_eq!(primary.search(&OfferFilter::default()).await.unwrap().len(), 1);
        assert!(supplementary.remove_by_external_id("A").await.unwrap());
        assert!(primary.get_by_external_id("A").await.unwrap().is_some());
        assert!(!supplementary.remove_by_external_id("A").await.unwrap());
    }

    #[tokio::test]
    async fn search_filters_by_category_and_validity() {
        let (primary, _) = stores().await;
        let now = Utc::now();

        primary.upsert(offer("A", "Active", "DATACENTER")).await.unwrap();
        let mut expired = offer("B", "Expired", "DATACENTER");
        expired.spec.expiration_date = Some(now - Duration::days(1));
        primary.upsert(expired).await.unwrap();
        primary.upsert(offer("C", "Pages", "YELLOW_PAGES")).await.unwrap();

        let active_dc = primary
            .search(&OfferFilter {
                active: Some(true),
                category: Some("DATACENTER".into()),
            })
            .await
            .unwrap();
        assert_eq!(active_dc.len(), 1);
        assert_eq!(active_dc[0].spec.name, "Active");

        let inactive = primary
            .search(&OfferFilter {
                active: Some(false),
                category: None,
            })
            .await
            .unwrap();
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].spec.name, "Expired");
    }

    #[tokio::test]
    async fn list_by_ids_keeps_requested_order() {
        let (_, supplementary) = stores().await;
        let first = supplementary.upsert(Offer::stub("S1".into())).await.unwrap();
        let second = supplementary.upsert(Offer::stub("S2".into())).await.unwrap();

        let listed = supplementary
            .list_by_ids(&[second.id, OfferId::new_v4(), first.id])
            .await
            .unwrap();

        let ids: Vec<OfferId> = listed.iter().map(|offer| offer.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn external_id_is_unique_per_catalog() {
        let (primary, _) = stores().await;
        primary.upsert(offer("A", "First", "DATACENTER")).await.unwrap();

        let duplicate = primary.upsert(offer("A", "Second", "DATACENTER")).await;
        assert!(matches!(duplicate, Err(StoreError::Database(_))));
    }
}
