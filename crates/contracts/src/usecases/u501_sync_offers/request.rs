use serde::{Deserialize, Serialize};

/// Тип клиента в коммерческой системе
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BssClientType {
    #[default]
    #[serde(rename = "1")]
    Individual,
    #[serde(rename = "2")]
    Corporative,
    #[serde(rename = "3")]
    Family,
    #[serde(other)]
    Unknown,
}

/// Способ оплаты в коммерческой системе
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BssPayMode {
    #[serde(rename = "0")]
    Prepaid,
    #[default]
    #[serde(rename = "1")]
    Postpaid,
    #[serde(rename = "2")]
    All,
    #[serde(other)]
    Unknown,
}

/// Статус предложения в коммерческой системе
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BssStatus {
    #[serde(rename = "0")]
    Draft,
    #[serde(rename = "1")]
    Test,
    #[serde(rename = "2")]
    Released,
    #[serde(rename = "3")]
    Suspended,
    #[serde(rename = "4")]
    Retired,
    #[default]
    #[serde(other)]
    Unknown,
}

impl BssStatus {
    /// Предложение выведено из продажи и должно исчезнуть из каталога
    pub fn is_withdrawn(&self) -> bool {
        matches!(self, BssStatus::Suspended | BssStatus::Retired)
    }
}

/// Атрибут предложения в плоском виде (код, значение, признак включения)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BssAttribute {
    #[serde(rename = "attr_code")]
    pub code: String,
    #[serde(rename = "attr_value", default)]
    pub value: String,
    /// "1" - ресурс входит в базовое предложение, иначе опционален
    #[serde(rename = "attr_type", default)]
    pub attr_type: String,
    #[serde(rename = "attr_value_desc", default)]
    pub description: String,
}

impl BssAttribute {
    pub fn new(code: &str, value: &str, attr_type: &str) -> Self {
        Self {
            code: code.to_string(),
            value: value.to_string(),
            attr_type: attr_type.to_string(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BssAttributeList {
    #[serde(rename = "attr", default)]
    pub attributes: Vec<BssAttribute>,
}

/// Ссылка на подключаемое дополнительное предложение
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BssAttached {
    #[serde(rename = "offeringID")]
    pub id: String,
    #[serde(rename = "releationType", default)]
    pub relation_type: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BssRelationshipList {
    #[serde(default)]
    pub attached: Vec<BssAttached>,
}

/// Предложение в том виде, в каком его присылает коммерческая система
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BssOffer {
    #[serde(rename = "offer_id")]
    pub id: String,
    #[serde(rename = "offer_code", default)]
    pub code: String,
    #[serde(rename = "offer_name", default)]
    pub name: String,
    /// "1" - основное предложение, иначе дополнительное
    #[serde(default)]
    pub primary_flag: String,
    #[serde(rename = "offer_cata", default)]
    pub category: String,
    #[serde(rename = "eff_date", default)]
    pub effective_date: Option<String>,
    #[serde(rename = "exp_date", default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub status: BssStatus,
    #[serde(rename = "oneoff_fee", default)]
    pub one_off_fee: f64,
    #[serde(default)]
    pub monthly_fee: f64,
    #[serde(rename = "offer_desc", default)]
    pub description: String,
    #[serde(rename = "offer_type", default)]
    pub client_type: BssClientType,
    #[serde(default)]
    pub pay_mode: BssPayMode,
    /// "1" - продаётся самостоятельно
    #[serde(default)]
    pub on_sale: String,
    #[serde(rename = "attrList", default)]
    pub attribute_list: Option<BssAttributeList>,
    #[serde(rename = "relationshipList", default)]
    pub relationship_list: Option<BssRelationshipList>,
}

impl BssOffer {
    pub fn is_primary(&self) -> bool {
        self.primary_flag == "1"
    }

    pub fn attributes(&self) -> &[BssAttribute] {
        self.attribute_list
            .as_ref()
            .map(|list| list.attributes.as_slice())
            .unwrap_or_default()
    }

    pub fn attached(&self) -> &[BssAttached] {
        self.relationship_list
            .as_ref()
            .map(|list| list.attached.as_slice())
            .unwrap_or_default()
    }
}

/// Элемент пакета синхронизации
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SyncOfferEntry {
    pub offer: BssOffer,
}

/// Пакет предложений, присылаемый коммерческой системой
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SyncOffersRequest {
    #[serde(rename = "syncOffers", default)]
    pub sync_offers: Vec<SyncOfferEntry>,
}

impl SyncOffersRequest {
    pub fn from_offers(offers: Vec<BssOffer>) -> Self {
        Self {
            sync_offers: offers
                .into_iter()
                .map(|offer| SyncOfferEntry { offer })
                .collect(),
        }
    }

    pub fn offers(&self) -> impl Iterator<Item = &BssOffer> {
        self.sync_offers.iter().map(|entry| &entry.offer)
    }
}
