use crate::domain::a001_offer::repository::StoreError;

/// Ошибка разбора атрибутов предложения
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("attribute {code} expects a number, got {value:?}")]
    InvalidNumber { code: String, value: String },
}

/// Ошибка трансляции предложения во внутреннюю модель.
/// Любая из них отменяет обработку только этого предложения.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslationError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error("service type cannot be found: {0}")]
    UnknownCategory(String),

    #[error("service type is missing")]
    MissingCategory,

    #[error("invalid {field} timestamp {value:?}")]
    InvalidDate { field: &'static str, value: String },
}

/// Ошибка сверки одного предложения с каталогом
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Итог пакета, если хотя бы одно предложение не удалось обработать
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("{failed} of {total} offers failed to sync")]
    PartialFailure { failed: usize, total: usize },
}
