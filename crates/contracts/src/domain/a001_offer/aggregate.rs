use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{AggregateId, EntityMetadata};

/// Единица измерения по умолчанию для всех количественных ресурсов
pub const DEFAULT_UNIT: &str = "MB";

// ============================================================================
// ID Type
// ============================================================================

/// Внутренний идентификатор предложения в каталоге
///
/// Назначается при первом создании записи и больше никогда не меняется.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(pub Uuid);

impl OfferId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for OfferId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(OfferId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Каталог, к которому относится запись
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Catalog {
    /// Основные предложения (продаются самостоятельно)
    Primary,
    /// Дополнительные предложения (подключаются только к основному)
    Supplementary,
}

impl Catalog {
    pub fn as_str(&self) -> &'static str {
        match self {
            Catalog::Primary => "primary",
            Catalog::Supplementary => "supplementary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientType {
    #[default]
    Individual,
    Corporative,
}

impl ClientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::Individual => "INDIVIDUAL",
            ClientType::Corporative => "CORPORATIVE",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "INDIVIDUAL" => Some(ClientType::Individual),
            "CORPORATIVE" => Some(ClientType::Corporative),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayMode {
    Prepaid,
    #[default]
    Postpaid,
    All,
}

impl PayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayMode::Prepaid => "PREPAID",
            PayMode::Postpaid => "POSTPAID",
            PayMode::All => "ALL",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PREPAID" => Some(PayMode::Prepaid),
            "POSTPAID" => Some(PayMode::Postpaid),
            "ALL" => Some(PayMode::All),
            _ => None,
        }
    }
}

/// Зона доступа канала связи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BandwidthScope {
    National,
    International,
}

// ============================================================================
// Resource attributes (только для предложений категории дата-центра)
// ============================================================================

/// Объём с единицей измерения (RAM, HDD)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Capacity {
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Database {
    pub quantity: i64,
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Vpn {
    pub ip_address: String,
    pub name: String,
    pub speed: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dns {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Bandwidth {
    pub amount: f64,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<BandwidthScope>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Port {
    pub description: String,
}

/// Технические характеристики предложения дата-центра
///
/// `included` показывает, входят ли ресурсы в базовое предложение
/// (`true`) или подключаются опционально (`false`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceAttributes {
    pub included: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram: Option<Capacity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hdd: Option<Capacity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_qty: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<Database>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ftp_qty: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_qty: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_interface_qty: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lan_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wan_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpn: Option<Vpn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<Dns>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<Bandwidth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_vm: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<Port>,
}

impl Default for ResourceAttributes {
    fn default() -> Self {
        Self {
            included: true,
            ram: None,
            hdd: None,
            cpu_qty: None,
            database: None,
            ftp_qty: None,
            alias_qty: None,
            network_interface_qty: None,
            public_ip_address: None,
            lan_ip_address: None,
            wan_ip_address: None,
            vpn: None,
            dns: None,
            bandwidth: None,
            save_vm: None,
            access_type: None,
            port: None,
        }
    }
}

impl ResourceAttributes {
    /// Проставить единицу измерения по умолчанию во все блоки,
    /// где она осталась пустой
    pub fn apply_default_units(&mut self) {
        fn default_unit(unit: &mut String) {
            if unit.is_empty() {
                *unit = DEFAULT_UNIT.to_string();
            }
        }

        if let Some(ram) = self.ram.as_mut() {
            default_unit(&mut ram.unit);
        }
        if let Some(hdd) = self.hdd.as_mut() {
            default_unit(&mut hdd.unit);
        }
        if let Some(database) = self.database.as_mut() {
            default_unit(&mut database.unit);
        }
        if let Some(vpn) = self.vpn.as_mut() {
            default_unit(&mut vpn.unit);
        }
        if let Some(bandwidth) = self.bandwidth.as_mut() {
            default_unit(&mut bandwidth.unit);
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Содержимое предложения без идентичности записи
///
/// Именно это строит трансляция из внешней системы; идентификатор и
/// временные метки добавляются только при сверке с каталогом.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub client_type: ClientType,
    pub pay_mode: PayMode,
    pub standalone: bool,
    pub category: String,
    #[serde(rename = "type")]
    pub offer_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
    pub monthly_fee: f64,
    pub one_off_fee: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub temporal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_attributes: Option<ResourceAttributes>,
    /// Внутренние идентификаторы подключаемых дополнительных предложений
    pub supplementaries: Vec<OfferId>,
}

/// Запись каталога предложений
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,

    /// Идентификатор во внешней коммерческой системе (ключ сверки)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(flatten)]
    pub metadata: EntityMetadata,

    #[serde(flatten)]
    pub spec: OfferSpec,
}

impl Offer {
    /// Создать новую запись для вставки в каталог (новый ID, текущее время)
    pub fn new_for_insert(external_id: Option<String>, spec: OfferSpec) -> Self {
        Self {
            id: OfferId::new_v4(),
            external_id,
            metadata: EntityMetadata::new(),
            spec,
        }
    }

    /// Заготовка дополнительного предложения, о котором пока известен
    /// только внешний идентификатор
    pub fn stub(external_id: String) -> Self {
        Self::new_for_insert(Some(external_id), OfferSpec::default())
    }

    /// Новое содержимое поверх существующей записи: ID, дата создания и
    /// версия сохраняются, дата обновления сдвигается вперёд
    pub fn revise(existing: &Offer, spec: OfferSpec) -> Self {
        let mut metadata = existing.metadata.clone();
        metadata.touch();
        metadata.increment_version();

        Self {
            id: existing.id,
            external_id: existing.external_id.clone(),
            metadata,
            spec,
        }
    }

    /// Получить ID как строку
    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    /// Действует ли предложение в указанный момент.
    /// Отсутствующая граница окна считается открытой.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        let started = self.spec.effective_date.map_or(true, |from| from <= now);
        let not_expired = self.spec.expiration_date.map_or(true, |to| to >= now);
        started && not_expired
    }
}
