pub mod attribute_mapper;
pub mod category_resolver;
pub mod errors;
pub mod executor;
pub mod reconciliation;
pub mod relationships;
pub mod translator;

pub use category_resolver::CategoryResolver;
pub use errors::{MappingError, ReconcileError, SyncError, TranslationError};
pub use executor::SyncExecutor;
pub use reconciliation::{ReconcileOutcome, Reconciler};
pub use relationships::RelationshipResolver;
pub use translator::{OfferTranslator, TranslatedOffer};
