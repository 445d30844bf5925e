use serde::{de::DeserializeOwned, Serialize};
use std::hash::Hash;

/// Идентификатор записи каталога, передаваемый как строка
/// (HTTP-пути, колонки SQLite)
pub trait AggregateId:
    Clone + Copy + PartialEq + Eq + Hash + Serialize + DeserializeOwned + std::fmt::Debug
{
    fn as_string(&self) -> String;

    /// Разбор строкового представления; ошибка описывает причину
    fn from_string(s: &str) -> Result<Self, String>;
}
