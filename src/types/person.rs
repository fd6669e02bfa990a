//! Person types

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Contact channel enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactChannel {
    Telegram,
    Email,
    Phone,
    Whatsapp,
    Linkedin,
    Twitter,
    Github,
    Discord,
}

impl ContactChannel {
    pub const ALL: [ContactChannel; 8] = [
        ContactChannel::Telegram,
        ContactChannel::Email,
        ContactChannel::Phone,
        ContactChannel::Whatsapp,
        ContactChannel::Linkedin,
        ContactChannel::Twitter,
        ContactChannel::Github,
        ContactChannel::Discord,
    ];

    /// Channels compared verbatim when looking for duplicate people
    pub const IDENTIFYING: [ContactChannel; 3] = [
        ContactChannel::Phone,
        ContactChannel::Email,
        ContactChannel::Telegram,
    ];

    /// Column name used in import files and in the stored JSON
    pub fn as_str(self) -> &'static str {
        match self {
            ContactChannel::Telegram => "telegram",
            ContactChannel::Email => "email",
            ContactChannel::Phone => "phone",
            ContactChannel::Whatsapp => "whatsapp",
            ContactChannel::Linkedin => "linkedin",
            ContactChannel::Twitter => "twitter",
            ContactChannel::Github => "github",
            ContactChannel::Discord => "discord",
        }
    }

    /// Channel for a stored key, if it is one of the known ones
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|channel| channel.as_str() == key)
    }
}

impl fmt::Display for ContactChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel → value mapping. Only non-blank channels have a key.
///
/// Stored contacts are written by other parts of the application, so reading
/// them keeps known channels with non-blank string values and drops the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContactRecord(BTreeMap<ContactChannel, String>);

impl ContactRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the trimmed value; blank values leave the channel absent.
    pub fn set(&mut self, channel: ContactChannel, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.0.remove(&channel);
        } else {
            self.0.insert(channel, value.to_string());
        }
    }

    pub fn get(&self, channel: ContactChannel) -> Option<&str> {
        self.0.get(&channel).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for ContactRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut record = ContactRecord::new();
        if let Value::Object(entries) = Value::deserialize(deserializer)? {
            for (key, value) in entries {
                if let (Some(channel), Value::String(value)) = (ContactChannel::from_key(&key), value) {
                    record.set(channel, &value);
                }
            }
        }
        Ok(record)
    }
}

impl<const N: usize> From<[(ContactChannel, &str); N]> for ContactRecord {
    fn from(entries: [(ContactChannel, &str); N]) -> Self {
        let mut record = ContactRecord::new();
        for (channel, value) in entries {
            record.set(channel, value);
        }
        record
    }
}

/// Person entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub profession: Option<String>,
    pub role: Option<String>,
    pub skills: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub contacts: Option<Json<ContactRecord>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalized person ready to be checked for duplicates and inserted.
///
/// `None` means the attribute is omitted from the stored record, never an
/// empty string or empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonCandidate {
    pub name: String,
    pub profession: Option<String>,
    pub role: Option<String>,
    pub skills: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub contacts: Option<ContactRecord>,
    pub notes: Option<String>,
}

impl PersonCandidate {
    pub fn contact(&self, channel: ContactChannel) -> Option<&str> {
        self.contacts.as_ref().and_then(|c| c.get(channel))
    }
}

/// Name and contacts of an already stored person, as used by duplicate detection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingPerson {
    pub name: String,
    pub contacts: ContactRecord,
}

impl From<&Person> for ExistingPerson {
    fn from(person: &Person) -> Self {
        Self {
            name: person.name.clone(),
            contacts: person
                .contacts
                .as_ref()
                .map(|c| c.0.clone())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_record_skips_blank_values() {
        let mut record = ContactRecord::new();
        record.set(ContactChannel::Email, "  ");
        record.set(ContactChannel::Phone, " +1 555 0100 ");

        assert_eq!(record, ContactRecord::from([(ContactChannel::Phone, "+1 555 0100")]));
    }

    #[test]
    fn test_contact_record_serializes_lowercase_keys() {
        let record = ContactRecord::from([
            (ContactChannel::Telegram, "@jane"),
            (ContactChannel::Email, "jane@example.com"),
        ]);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "telegram": "@jane", "email": "jane@example.com" })
        );
    }

    #[test]
    fn test_contact_record_deserializes_stored_json() {
        let record: ContactRecord =
            serde_json::from_str(r#"{"phone":"5550100","github":"jdoe"}"#).unwrap();
        assert_eq!(record.get(ContactChannel::Phone), Some("5550100"));
        assert_eq!(record.get(ContactChannel::Github), Some("jdoe"));
    }

    #[test]
    fn test_stored_json_unknown_channels_are_dropped() {
        let record: ContactRecord =
            serde_json::from_str(r#"{"email":"a@b.co","instagram":"x"}"#).unwrap();
        assert_eq!(record, ContactRecord::from([(ContactChannel::Email, "a@b.co")]));

        let record: ContactRecord = serde_json::from_str(r#"{"instagram":"x"}"#).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn test_stored_json_null_and_blank_values_are_dropped() {
        let record: ContactRecord = serde_json::from_str(r#"{"email":null}"#).unwrap();
        assert!(record.is_empty());

        let record: ContactRecord =
            serde_json::from_str(r#"{"phone":"  ","telegram":" @jane ","github":42}"#).unwrap();
        assert_eq!(record, ContactRecord::from([(ContactChannel::Telegram, "@jane")]));
    }

    #[test]
    fn test_stored_json_that_is_not_an_object_reads_as_empty() {
        let record: ContactRecord = serde_json::from_str(r#"["email"]"#).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn test_channel_from_key() {
        assert_eq!(ContactChannel::from_key("whatsapp"), Some(ContactChannel::Whatsapp));
        assert_eq!(ContactChannel::from_key("Email"), None);
        assert_eq!(ContactChannel::from_key("instagram"), None);
    }

    #[test]
    fn test_channel_names_match_serde() {
        for channel in ContactChannel::ALL {
            let json = serde_json::to_string(&channel).unwrap();
            assert_eq!(json, format!("\"{}\"", channel.as_str()));
        }
    }
}
