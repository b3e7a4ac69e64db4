use crate::errors::RepoError;
use crate::models::Deck;
use async_trait::async_trait;
use uuid::Uuid;

/// Trait defining the operations the entity store offers for decks.
#[async_trait]
pub trait DeckRepository: Send + Sync + 'static { // Send+Sync+'static required for Arc<dyn>
    /// Inserts a new deck with the given title. The store assigns the id and timestamps.
    async fn create(&self, title: &str) -> Result<Deck, RepoError>;

    /// Lists every deck, unfiltered and unpaginated, in store-native order.
    async fn find_many(&self) -> Result<Vec<Deck>, RepoError>;

    /// Retrieves a deck by its id.
    /// Returns Ok(None) if the deck is not found.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Deck>, RepoError>;

    /// Retrieves a deck matching both title and id.
    /// Returns Ok(None) if no deck matches.
    async fn find_one(&self, title: &str, id: Uuid) -> Result<Option<Deck>, RepoError>;

    /// Deletes a deck permanently and returns its prior state.
    /// Returns Ok(None) if nothing was stored under `id`.
    async fn delete_one(&self, id: Uuid) -> Result<Option<Deck>, RepoError>;
}
