pub mod community;
pub mod event;

/// Community (guild) identifier, kept in its decimal string form because it keys the JSON documents.
pub type CommunityId = String;
pub type RoleId = u64;
pub type ChannelId = u64;
pub type ParticipantId = u64;
/// Identifier the emitter assigns to a posted message; keys the RSVP ledger.
pub type MessageId = u64;

/// Serde adapters for Discord snowflakes that older documents stored either as
/// numbers or as decimal strings.
pub mod snowflake {
    use serde::de::{self, Deserializer};
    use serde::{Deserialize, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    impl RawId {
        fn into_id<E: de::Error>(self) -> Result<Option<u64>, E> {
            match self {
                RawId::Number(id) => Ok(Some(id)),
                RawId::Text(text) if text.trim().is_empty() => Ok(None),
                RawId::Text(text) => text
                    .trim()
                    .parse::<u64>()
                    .map(Some)
                    .map_err(|_| E::custom(format!("invalid snowflake '{text}'"))),
            }
        }
    }

    /// Required id written as a JSON number.
    pub mod number {
        use super::*;

        pub fn serialize<S: Serializer>(id: &u64, serializer: S) -> Result<S::Ok, S::Error> {
            id.serialize(serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
            RawId::deserialize(deserializer)?
                .into_id()?
                .ok_or_else(|| de::Error::custom("empty snowflake"))
        }
    }

    /// Optional id written as a decimal string.
    pub mod optional {
        use super::*;

        pub fn serialize<S: Serializer>(id: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
            match id {
                Some(id) => serializer.serialize_str(&id.to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<u64>, D::Error> {
            match Option::<RawId>::deserialize(deserializer)? {
                Some(raw) => raw.into_id(),
                None => Ok(None),
            }
        }
    }

    /// List of ids written as decimal strings.
    pub mod string_list {
        use super::*;

        pub fn serialize<S: Serializer>(ids: &[u64], serializer: S) -> Result<S::Ok, S::Error> {
            let as_text: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
            as_text.serialize(serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u64>, D::Error> {
            let raw = Vec::<RawId>::deserialize(deserializer)?;
            let mut ids = Vec::with_capacity(raw.len());
            for entry in raw {
                if let Some(id) = entry.into_id()? {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
            }
            Ok(ids)
        }
    }
}
