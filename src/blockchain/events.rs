//! Event extraction from committed transactions.
//!
//! Matching is substring containment on the event type, since the module
//! address part of the type differs between deployments.

use serde_json::Value;

use crate::blockchain::types::{Event, TransactionResult};

/// First event whose type contains `type_substring`.
pub fn find_event<'a>(result: &'a TransactionResult, type_substring: &str) -> Option<&'a Event> {
    result
        .events
        .iter()
        .find(|event| event.type_tag.contains(type_substring))
}

impl Event {
    /// A data field as a string. Numbers are rendered in decimal; other JSON
    /// shapes count as absent.
    pub fn field_str(&self, name: &str) -> Option<String> {
        match self.data.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Events the scripts know how to read an id from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    SeriesCreated,
    SetCreated,
    NftMinted,
}

impl EventKind {
    /// Substring identifying the event type.
    pub fn type_marker(self) -> &'static str {
        match self {
            EventKind::SeriesCreated => "SeriesCreatedEvent",
            EventKind::SetCreated => "SetCreatedEvent",
            EventKind::NftMinted => "NFTMintedEvent",
        }
    }

    /// Data field holding the created id.
    pub fn id_field(self) -> &'static str {
        match self {
            EventKind::SeriesCreated => "series_id",
            EventKind::SetCreated => "set_id",
            EventKind::NftMinted => "nft_id",
        }
    }

    /// Locate this event in `result` and read its id.
    pub fn extract(self, result: &TransactionResult) -> EventLookup {
        let Some(event) = find_event(result, self.type_marker()) else {
            return EventLookup::EventNotFound;
        };

        match event.field_str(self.id_field()) {
            Some(id) => EventLookup::Found(match self {
                EventKind::SeriesCreated => KnownEvent::SeriesCreated { series_id: id },
                EventKind::SetCreated => KnownEvent::SetCreated { set_id: id },
                EventKind::NftMinted => KnownEvent::NftMinted { nft_id: id },
            }),
            None => EventLookup::FieldAbsent(self.id_field()),
        }
    }
}

/// A parsed event of a known kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnownEvent {
    SeriesCreated { series_id: String },
    SetCreated { set_id: String },
    NftMinted { nft_id: String },
}

impl KnownEvent {
    pub fn id(&self) -> &str {
        match self {
            KnownEvent::SeriesCreated { series_id } => series_id,
            KnownEvent::SetCreated { set_id } => set_id,
            KnownEvent::NftMinted { nft_id } => nft_id,
        }
    }
}

/// Outcome of looking for a known event. Absence is not an error here;
/// callers decide whether it is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventLookup {
    Found(KnownEvent),
    EventNotFound,
    FieldAbsent(&'static str),
}

impl EventLookup {
    pub fn id(&self) -> Option<&str> {
        match self {
            EventLookup::Found(event) => Some(event.id()),
            _ => None,
        }
    }
}
