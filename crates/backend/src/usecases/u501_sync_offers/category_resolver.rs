use std::collections::HashMap;

use super::errors::TranslationError;
use crate::shared::config::CategoryMapping;

/// Перевод кода услуги внешней системы в пару (категория, тип) каталога.
/// Таблица приходит из конфигурации.
#[derive(Debug, Clone, Default)]
pub struct CategoryResolver {
    table: HashMap<String, CategoryMapping>,
}

impl CategoryResolver {
    pub fn new(table: HashMap<String, CategoryMapping>) -> Self {
        Self { table }
    }

    pub fn resolve(&self, code: &str) -> Result<&CategoryMapping, TranslationError> {
        self.table
            .get(code)
            .ok_or_else(|| TranslationError::UnknownCategory(code.to_string()))
    }
}
