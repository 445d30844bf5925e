use chrono::{DateTime, NaiveDateTime, Utc};
use contracts::domain::a001_offer::{ClientType, OfferSpec, PayMode};
use contracts::usecases::u501_sync_offers::{BssClientType, BssOffer, BssPayMode};

use super::attribute_mapper::{map_attributes, parse_float};
use super::category_resolver::CategoryResolver;
use super::errors::TranslationError;

/// Атрибут с кодом услуги (ключ таблицы категорий)
pub const SERVICE_TYPE_CODE: &str = "C_PH2_SERVICE_TYPE";
const TEMPORAL_FLAG_CODE: &str = "C_TEMPPREPAID_FLAG";
const AMOUNT_CODE: &str = "amount";
const MEASURE_CODE: &str = "measureId";
const DEFAULT_CURRENCY: &str = "CUP";

/// Результат трансляции: содержимое записи и ключ сверки.
/// Внутренний ID здесь не назначается.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedOffer {
    pub external_id: String,
    pub spec: OfferSpec,
}

/// Перевод предложения внешней системы в запись каталога
#[derive(Debug, Clone)]
pub struct OfferTranslator {
    categories: CategoryResolver,
}

impl OfferTranslator {
    pub fn new(categories: CategoryResolver) -> Self {
        Self { categories }
    }

    /// Всё или ничего: любая ошибка атрибутов, категории или дат
    /// возвращается без частичного результата
    pub fn translate(&self, offer: &BssOffer) -> Result<TranslatedOffer, TranslationError> {
        let attributes = offer.attributes();

        let category_code = attributes
            .iter()
            .rev()
            .find(|attr| attr.code == SERVICE_TYPE_CODE)
            .map(|attr| attr.value.as_str())
            .or_else(|| non_empty(&offer.category))
            .ok_or(TranslationError::MissingCategory)?;
        let mapping = self.categories.resolve(category_code)?;

        let resource_attributes = map_attributes(attributes)?;

        let mut spec = OfferSpec {
            name: offer.name.clone(),
            code: non_empty(&offer.code).map(str::to_string),
            description: non_empty(&offer.description).map(str::to_string),
            client_type: client_type(offer.client_type),
            pay_mode: pay_mode(offer.pay_mode),
            standalone: offer.is_primary(),
            category: mapping.category.clone(),
            offer_type: mapping.offer_type.clone(),
            effective_date: parse_timestamp("effective", offer.effective_date.as_deref())?,
            expiration_date: parse_timestamp("expiration", offer.expiration_date.as_deref())?,
            monthly_fee: offer.monthly_fee,
            one_off_fee: offer.one_off_fee,
            currency: None,
            temporal: false,
            resource_attributes,
            supplementaries: Vec::new(),
        };

        // Атрибуты уровня предложения
        for attr in attributes {
            match attr.code.as_str() {
                TEMPORAL_FLAG_CODE => {
                    if attr.value == "1" {
                        spec.temporal = true;
                    }
                }
                AMOUNT_CODE => spec.monthly_fee = parse_float(attr)?,
                MEASURE_CODE => spec.currency = Some(DEFAULT_CURRENCY.to_string()),
                _ => {}
            }
        }

        Ok(TranslatedOffer {
            external_id: offer.id.clone(),
            spec,
        })
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn client_type(code: BssClientType) -> ClientType {
    match code {
        BssClientType::Corporative => ClientType::Corporative,
        _ => ClientType::Individual,
    }
}

fn pay_mode(code: BssPayMode) -> PayMode {
    match code {
        BssPayMode::Prepaid => PayMode::Prepaid,
        BssPayMode::All => PayMode::All,
        BssPayMode::Postpaid | BssPayMode::Unknown => PayMode::Postpaid,
    }
}

/// Дата окна действия; пустое значение означает открытую границу
fn parse_timestamp(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, TranslationError> {
    let Some(raw) = value.and_then(non_empty) else {
        return Ok(None);
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    // Формат коммерческой системы: 20240101000000
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y%m%d%H%M%S") {
        return Ok(Some(naive.and_utc()));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(Some(naive.and_utc()));
    }

    Err(TranslationError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}
