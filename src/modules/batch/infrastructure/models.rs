use crate::schema::{batch_bovines, batches};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

// ============= BATCH MODELS =============

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = batches)]
pub struct BatchModel {
    pub id: Uuid,
    pub batch_name: String,
    pub establishment_cuig: String,
    pub description: Option<String>,
    pub creation_date: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = batches)]
pub struct NewBatchModel {
    pub id: Uuid,
    pub batch_name: String,
    pub establishment_cuig: String,
    pub description: Option<String>,
    pub creation_date: DateTime<Utc>,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = batches)]
#[diesel(treat_none_as_null = true)]
pub struct BatchChangeset {
    pub description: Option<String>,
}

// ============= BATCH-BOVINE ASSOCIATION =============

// For inserting membership rows; added_at is filled by the database
#[derive(Insertable, Debug, Clone, PartialEq, Eq, Hash)]
#[diesel(table_name = batch_bovines)]
pub struct NewBatchBovine {
    pub batch_id: Uuid,
    pub bovine_id: Uuid,
}
