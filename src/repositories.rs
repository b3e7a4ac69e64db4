use crate::{
    domain::DeckRepository,
    errors::RepoError,
    models::Deck,
};
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_dynamodb::{
    types::{AttributeValue, ReturnValue},
    Client as DynamoDbClient,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{self, info};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct DynamoDbDeckRepository {
    client: DynamoDbClient,
    table_name: String, // Store the table name
}

impl DynamoDbDeckRepository {
    /// Creates a new repository instance configured for a specific table.
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        info!(%table_name, "Initializing DynamoDbDeckRepository");
        Self { client, table_name }
    }

    async fn get_item(&self, id: Uuid) -> Result<Option<Deck>, RepoError> {
        let id_str = id.to_string();
        let resp = self.client
            .get_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id_str.clone()))
            .send()
            .await
            .context(format!("DynamoDB (table: {}): Failed to get deck (id: {})", self.table_name, id_str))
            .map_err(RepoError::BackendError)?;

        match resp.item {
            Some(item) => self.parse_item(&item).map(Some),
            None => Ok(None), // Item not found is not an error
        }
    }

    fn parse_item(&self, item: &HashMap<String, AttributeValue>) -> Result<Deck, RepoError> {
        item_to_deck(item).ok_or_else(|| {
            let item_id = item.get("id").and_then(|v| v.as_s().ok());
            tracing::error!(item.id = ?item_id, table_name = %self.table_name, "DynamoDB: Failed to parse item into Deck");
            RepoError::DataCorruption(format!(
                "DynamoDB: Failed to parse item {:?} from table '{}'",
                item_id, self.table_name
            ))
        })
    }
}

#[async_trait]
impl DeckRepository for DynamoDbDeckRepository {
    /// Stores a new `Deck` using a conditional PutItem so an id is never overwritten.
    async fn create(&self, title: &str) -> Result<Deck, RepoError> {
        let deck = Deck::new(title);
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(deck_to_item(&deck)))
            .condition_expression("attribute_not_exists(id)")
            .send()
            .await
            .context(format!("DynamoDB (table: {}): Failed to put deck (id: {})", self.table_name, deck.id))
            .map_err(RepoError::BackendError)?;

        tracing::debug!(deck_id = %deck.id, table_name = %self.table_name, "DynamoDB: Deck stored");
        Ok(deck)
    }

    /// Lists all decks using DynamoDB Scan. Handles pagination.
    async fn find_many(&self) -> Result<Vec<Deck>, RepoError> {
        tracing::debug!("DynamoDB: Scanning table '{}' for all decks", self.table_name);
        let mut decks: Vec<Deck> = Vec::new();
        let mut last_evaluated_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let mut request_builder = self.client.scan().table_name(&self.table_name);

            // Apply ExclusiveStartKey if paginating from previous response
            if let Some(lek) = last_evaluated_key {
                request_builder = request_builder.set_exclusive_start_key(Some(lek));
            }

            let resp = request_builder
                .send()
                .await
                .context(format!("DynamoDB: Failed to scan table '{}'", self.table_name))
                .map_err(RepoError::BackendError)?;

            for item in resp.items.unwrap_or_default() {
                // Fail fast if data in the table is corrupt
                decks.push(self.parse_item(&item)?);
            }

            last_evaluated_key = resp.last_evaluated_key;
            if last_evaluated_key.is_none() {
                break;
            }
            tracing::debug!("DynamoDB Scan (table: {}): Continuing with LastEvaluatedKey...", self.table_name);
        }

        tracing::info!("DynamoDB (table: {}): Successfully listed {} decks", self.table_name, decks.len());
        Ok(decks)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Deck>, RepoError> {
        self.get_item(id).await
    }

    async fn find_one(&self, title: &str, id: Uuid) -> Result<Option<Deck>, RepoError> {
        Ok(self.get_item(id).await?.filter(|deck| deck.title == title))
    }

    /// Deletes an item using DeleteItem, asking DynamoDB for the old attributes.
    async fn delete_one(&self, id: Uuid) -> Result<Option<Deck>, RepoError> {
        let id_str = id.to_string();
        tracing::debug!(deck_id = %id_str, table_name = %self.table_name, "DynamoDB: Deleting item");

        let resp = self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id_str.clone()))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .context(format!("DynamoDB (table: {}): Failed to delete deck (id: {})", self.table_name, id_str))
            .map_err(RepoError::BackendError)?;

        // DeleteItem succeeds even if the item was absent; no old attributes then
        match resp.attributes {
            Some(old) if !old.is_empty() => self.parse_item(&old).map(Some),
            _ => Ok(None),
        }
    }
}

fn deck_to_item(deck: &Deck) -> HashMap<String, AttributeValue> {
    HashMap::from([
        ("id".to_string(), AttributeValue::S(deck.id.to_string())),
        ("title".to_string(), AttributeValue::S(deck.title.clone())),
        (
            "cards".to_string(),
            AttributeValue::L(deck.cards.iter().cloned().map(AttributeValue::S).collect()),
        ),
        ("createdAt".to_string(), AttributeValue::S(deck.created_at.to_rfc3339())),
        ("updatedAt".to_string(), AttributeValue::S(deck.updated_at.to_rfc3339())),
    ])
}

// Helper function to convert DynamoDB item map to Deck struct
fn item_to_deck(item: &HashMap<String, AttributeValue>) -> Option<Deck> {
    let id = item
        .get("id")?
        .as_s()
        .ok()
        .and_then(|s| Uuid::parse_str(s).ok())?;
    let title = item.get("title")?.as_s().ok()?.to_string();
    let cards = match item.get("cards") {
        Some(value) => value
            .as_l()
            .ok()?
            .iter()
            .map(|card| card.as_s().ok().cloned())
            .collect::<Option<Vec<String>>>()?,
        None => Vec::new(),
    };
    let created_at = parse_timestamp(item.get("createdAt")?)?;
    let updated_at = parse_timestamp(item.get("updatedAt")?)?;

    Some(Deck {
        id,
        title,
        cards,
        created_at,
        updated_at,
    })
}

fn parse_timestamp(value: &AttributeValue) -> Option<DateTime<Utc>> {
    let raw = value.as_s().ok()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Process-local store, kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryDeckRepository {
    decks: RwLock<Vec<Deck>>,
}

impl InMemoryDeckRepository {
    pub fn new() -> Self {
        info!("Initializing InMemoryDeckRepository");
        Self::default()
    }
}

#[async_trait]
impl DeckRepository for InMemoryDeckRepository {
    async fn create(&self, title: &str) -> Result<Deck, RepoError> {
        let deck = Deck::new(title);
        self.decks.write().await.push(deck.clone());
        tracing::debug!(deck_id = %deck.id, "Memory: Deck stored");
        Ok(deck)
    }

    async fn find_many(&self) -> Result<Vec<Deck>, RepoError> {
        Ok(self.decks.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Deck>, RepoError> {
        Ok(self.decks.read().await.iter().find(|d| d.id == id).cloned())
    }

    async fn find_one(&self, title: &str, id: Uuid) -> Result<Option<Deck>, RepoError> {
        Ok(self
            .decks
            .read()
            .await
            .iter()
            .find(|d| d.id == id && d.title == title)
            .cloned())
    }

    async fn delete_one(&self, id: Uuid) -> Result<Option<Deck>, RepoError> {
        let mut decks = self.decks.write().await;
        let removed = decks
            .iter()
            .position(|d| d.id == id)
            .map(|index| decks.remove(index));
        tracing::debug!(deck_id = %id, removed = removed.is_some(), "Memory: Delete processed");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_create_then_list_keeps_insertion_order() {
        let repo = InMemoryDeckRepository::new();
        let first = repo.create("Spanish Verbs").await.unwrap();
        let second = repo.create("Kanji").await.unwrap();

        let decks = repo.find_many().await.unwrap();
        assert_eq!(decks, vec![first, second]);
    }

    #[tokio::test]
    async fn memory_lookups_return_none_on_miss() {
        let repo = InMemoryDeckRepository::new();
        let deck = repo.create("Kanji").await.unwrap();

        assert_eq!(repo.find_by_id(deck.id).await.unwrap(), Some(deck.clone()));
        assert_eq!(repo.find_one("Kanji", deck.id).await.unwrap(), Some(deck.clone()));
        assert_eq!(repo.find_one("Hiragana", deck.id).await.unwrap(), None);
        assert_eq!(repo.find_by_id(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_delete_returns_prior_state_once() {
        let repo = InMemoryDeckRepository::new();
        let deck = repo.create("Spanish Verbs").await.unwrap();

        assert_eq!(repo.delete_one(deck.id).await.unwrap(), Some(deck.clone()));
        assert_eq!(repo.delete_one(deck.id).await.unwrap(), None);
        assert!(repo.find_many().await.unwrap().is_empty());
    }

    #[test]
    fn item_conversion_preserves_every_field() {
        let mut deck = Deck::new("Capitals");
        deck.cards = vec!["Paris".into(), "Lima".into()];

        let parsed = item_to_deck(&deck_to_item(&deck)).unwrap();
        assert_eq!(parsed.id, deck.id);
        assert_eq!(parsed.cards, deck.cards);
        assert_eq!(parsed.created_at, deck.created_at);
    }

    #[test]
    fn item_without_cards_parses_as_empty_deck() {
        let mut item = deck_to_item(&Deck::new("Capitals"));
        item.remove("cards");

        assert!(item_to_deck(&item).unwrap().cards.is_empty());
    }

    #[test]
    fn item_with_bad_id_is_rejected() {
        let mut item = deck_to_item(&Deck::new("Capitals"));
        item.insert("id".into(), AttributeValue::S("not-a-uuid".into()));

        assert!(item_to_deck(&item).is_none());
    }
}
