use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, RecordId, UserId};

/// Seller identifier (scoped to the owning user in queries).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SellerId(pub RecordId);

impl SellerId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(RecordId::new())
    }
}

impl core::fmt::Display for SellerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Input for creating a seller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSeller {
    pub name: String,
}

/// A supplier products are bought from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    #[serde(rename = "_id")]
    pub id: SellerId,
    pub user_id: UserId,
    pub name: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Seller {
    pub fn create(user_id: UserId, new: NewSeller, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("seller name must not be empty"));
        }
        Ok(Self {
            id: SellerId::generate(),
            user_id,
            name: name.to_string(),
            created_at: now,
        })
    }
}

impl Entity for Seller {
    type Id = SellerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn owner(&self) -> UserId {
        self.user_id
    }
}
