//! Human-labelled enumeration projection.
//!
//! Enumeration results pass through a per-class extraction into
//! [`ItemSummary`]: class name, access group, service or server, account
//! as "key", decoded value, accessibility and synchronizable
//! descriptions. This projection is presentation-oriented by contract;
//! callers needing full attribute fidelity should read through
//! [`Attributes`](crate::Attributes) instead.

use serde::{Deserialize, Serialize};

use crate::attributes::{AttrValue, AttributeBag};
use crate::keys;
use crate::model::{Accessibility, AuthenticationType, ItemClass, ProtocolType};

/// Decoded item value: text when the stored bytes are valid UTF-8, raw
/// bytes otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryValue {
    Text(String),
    Bytes(Vec<u8>),
}

/// Presentation-oriented snapshot of one enumerated item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<SummaryValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synchronizable: Option<String>,
}

fn text(bag: &AttributeBag, key: &str) -> Option<String> {
    bag.get(key)
        .and_then(AttrValue::as_text)
        .map(str::to_string)
}

/// Project raw attribute bags into summaries.
pub(crate) fn prettify(class: ItemClass, bags: Vec<AttributeBag>) -> Vec<ItemSummary> {
    bags.into_iter()
        .map(|bag| {
            let mut summary = ItemSummary {
                class: class.to_string(),
                access_group: text(&bag, keys::ATTR_ACCESS_GROUP),
                ..ItemSummary::default()
            };

            match class {
                ItemClass::GenericPassword => {
                    summary.service = text(&bag, keys::ATTR_SERVICE);
                }
                ItemClass::InternetPassword => {
                    summary.server = text(&bag, keys::ATTR_SERVER);
                    summary.protocol = bag
                        .get(keys::ATTR_PROTOCOL)
                        .and_then(AttrValue::as_text)
                        .and_then(ProtocolType::from_raw)
                        .map(|protocol| protocol.description().to_string());
                    summary.authentication_type = bag
                        .get(keys::ATTR_AUTHENTICATION_TYPE)
                        .and_then(AttrValue::as_text)
                        .and_then(AuthenticationType::from_raw)
                        .map(|authentication_type| {
                            authentication_type.description().to_string()
                        });
                }
                ItemClass::Certificate | ItemClass::Key | ItemClass::Identity => {}
            }

            summary.key = text(&bag, keys::ATTR_ACCOUNT);

            summary.value = bag.get(keys::VALUE_DATA).and_then(|value| match value {
                AttrValue::Bytes(bytes) => match std::str::from_utf8(bytes) {
                    Ok(text) => Some(SummaryValue::Text(text.to_string())),
                    Err(_) => Some(SummaryValue::Bytes(bytes.clone())),
                },
                AttrValue::Text(text) => Some(SummaryValue::Text(text.clone())),
                _ => None,
            });

            summary.accessibility = bag
                .get(keys::ATTR_ACCESSIBLE)
                .and_then(AttrValue::as_text)
                .and_then(Accessibility::from_raw)
                .map(|accessibility| accessibility.to_string());

            summary.synchronizable = bag
                .get(keys::ATTR_SYNCHRONIZABLE)
                .and_then(AttrValue::as_bool)
                .map(|synchronizable| {
                    if synchronizable { "true" } else { "false" }.to_string()
                });

            summary
        })
        .collect()
}
