pub mod request;
pub mod response;

pub use request::{
    BssAttached, BssAttribute, BssAttributeList, BssClientType, BssOffer, BssPayMode,
    BssRelationshipList, BssStatus, SyncOfferEntry, SyncOffersRequest,
};
pub use response::SyncSummary;

use crate::usecases::common::UseCaseMetadata;

pub struct SyncOffers;

impl UseCaseMetadata for SyncOffers {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "sync_offers"
    }

    fn description() -> &'static str {
        "Синхронизация каталога предложений из коммерческой системы (BSS)"
    }
}
