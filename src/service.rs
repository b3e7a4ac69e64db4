//! Deck business logic. Handlers talk to this layer, never to the store.

use crate::{domain::DeckRepository, errors::RepoError, models::Deck};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Unable to create deck: {0}")]
    Create(#[source] RepoError),
    #[error("Unable to find decks: {0}")]
    FindMany(#[source] RepoError),
    #[error("Unable to find deck: {0}")]
    Find(#[source] RepoError),
    #[error("Unable to delete deck: {0}")]
    Delete(#[source] RepoError),
}

/// One store operation per call; holds no copies of stored decks.
#[derive(Clone)]
pub struct DeckService {
    repo: Arc<dyn DeckRepository>,
}

impl DeckService {
    pub fn new(repo: Arc<dyn DeckRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, title: &str) -> Result<Deck, ServiceError> {
        let deck = self.repo.create(title).await.map_err(ServiceError::Create)?;
        tracing::info!(deck_id = %deck.id, "Deck created");
        Ok(deck)
    }

    pub async fn find_many(&self) -> Result<Vec<Deck>, ServiceError> {
        self.repo.find_many().await.map_err(ServiceError::FindMany)
    }

    pub async fn find_one(&self, title: &str, id: Uuid) -> Result<Option<Deck>, ServiceError> {
        self.repo.find_one(title, id).await.map_err(ServiceError::Find)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Deck>, ServiceError> {
        self.repo.find_by_id(id).await.map_err(ServiceError::Find)
    }

    pub async fn delete_one(&self, id: Uuid) -> Result<Option<Deck>, ServiceError> {
        let deleted = self.repo.delete_one(id).await.map_err(ServiceError::Delete)?;
        match &deleted {
            Some(deck) => tracing::info!(deck_id = %deck.id, "Deck deleted"),
            None => tracing::debug!(deck_id = %id, "Delete matched no deck"),
        }
        Ok(deleted)
    }
}
