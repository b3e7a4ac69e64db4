use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named collection of flashcards. The store owns its lifetime.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deck {
    /// Builds a fresh deck with a store-assigned id and both timestamps set to now.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            cards: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// `{ "deck": .. }` response envelope.
#[derive(Serialize, Debug)]
pub struct DeckBody<D> {
    pub deck: D,
}

/// `{ "decks": [..] }` response envelope.
#[derive(Serialize, Debug)]
pub struct DecksBody {
    pub decks: Vec<Deck>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_wire_field_names() {
        let deck = Deck::new("Spanish Verbs");
        let value = serde_json::to_value(&deck).unwrap();

        assert_eq!(value["_id"], json!(deck.id.to_string()));
        assert_eq!(value["title"], json!("Spanish Verbs"));
        assert_eq!(value["cards"], json!([]));
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("id").is_none());
    }

    #[test]
    fn missing_cards_deserialize_as_empty() {
        let deck: Deck = serde_json::from_value(json!({
            "_id": "4f1c8f57-8d1e-4d0b-9a53-0c8f3f0f9f11",
            "title": "Kanji",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert!(deck.cards.is_empty());
    }

    #[test]
    fn new_decks_get_distinct_ids() {
        assert_ne!(Deck::new("a").id, Deck::new("a").id);
    }

    #[test]
    fn absent_deck_serializes_as_null() {
        let body = DeckBody::<Option<Deck>> { deck: None };
        assert_eq!(serde_json::to_value(body).unwrap(), json!({ "deck": null }));
    }
}
