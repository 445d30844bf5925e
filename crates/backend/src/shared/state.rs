use std::sync::Arc;

use contracts::domain::a001_offer::Catalog;
use sea_orm::DatabaseConnection;

use crate::domain::a001_offer::repository::{OfferStore, SqliteOfferStore};
use crate::domain::a001_offer::service::OfferService;
use crate::shared::config::Config;
use crate::shared::tracking::TrackingClient;
use crate::usecases::u501_sync_offers::{
    CategoryResolver, OfferTranslator, Reconciler, SyncExecutor,
};

/// Общее состояние HTTP-слоя, собирается один раз при старте
#[derive(Clone)]
pub struct AppState {
    pub offers: OfferService,
    pub sync: Arc<SyncExecutor>,
    /// Пакеты синхронизации обрабатываются в фоне
    pub background_sync: bool,
    pub tracking: TrackingClient,
}

impl AppState {
    pub fn new(conn: DatabaseConnection, config: &Config) -> anyhow::Result<Self> {
        let primary: Arc<dyn OfferStore> =
            Arc::new(SqliteOfferStore::new(conn.clone(), Catalog::Primary));
        let supplementary: Arc<dyn OfferStore> =
            Arc::new(SqliteOfferStore::new(conn, Catalog::Supplementary));

        let translator = OfferTranslator::new(CategoryResolver::new(config.categories.clone()));
        let reconciler = Reconciler::new(translator, primary.clone(), supplementary.clone());

        Ok(Self {
            offers: OfferService::new(primary, supplementary),
            sync: Arc::new(SyncExecutor::new(reconciler)),
            background_sync: config.sync.background,
            tracking: TrackingClient::new(config.tracking.host.clone())?,
        })
    }
}
