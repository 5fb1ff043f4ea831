//! # Party Repository
//!
//! Database operations for the client/supplier directory.
//!
//! Read-mostly: the checkout engine validates party references inside its
//! own transaction and never modifies the directory.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use partsdesk_core::Party;

const PARTY_COLUMNS: &str = "id, name, role, gst_no, phone, address, created_at";

/// Repository for party directory operations.
#[derive(Debug, Clone)]
pub struct PartyRepository {
    pool: SqlitePool,
}

impl PartyRepository {
    /// Creates a new PartyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PartyRepository { pool }
    }

    /// Gets a party by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Party>> {
        let sql = format!("SELECT {PARTY_COLUMNS} FROM parties WHERE id = ?1");

        let party: Option<Party> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(party)
    }

    /// Inserts a new party.
    pub async fn insert(&self, party: &Party) -> DbResult<()> {
        debug!(name = %party.name, role = ?party.role, "Inserting party");

        sqlx::query(
            "INSERT INTO parties (id, name, role, gst_no, phone, address, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&party.id)
        .bind(&party.name)
        .bind(party.role)
        .bind(&party.gst_no)
        .bind(&party.phone)
        .bind(&party.address)
        .bind(party.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a party's contact details.
    pub async fn update(&self, party: &Party) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE parties SET name = ?2, role = ?3, gst_no = ?4, phone = ?5, address = ?6 \
             WHERE id = ?1",
        )
        .bind(&party.id)
        .bind(&party.name)
        .bind(party.role)
        .bind(&party.gst_no)
        .bind(&party.phone)
        .bind(&party.address)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Party", &party.id));
        }

        Ok(())
    }

    /// Lists parties sorted by name.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Party>> {
        let sql = format!("SELECT {PARTY_COLUMNS} FROM parties ORDER BY name LIMIT ?1");

        let parties: Vec<Party> = sqlx::query_as(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(parties)
    }
}

/// Helper to generate a new party ID.
pub fn generate_party_id() -> String {
    Uuid::new_v4().to_string()
}
