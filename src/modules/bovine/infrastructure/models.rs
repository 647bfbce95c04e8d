use crate::modules::bovine::domain::value_objects::{BovineStatus, Category, Sex};
use crate::schema::bovines;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

// For reading from database
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = bovines)]
pub struct BovineModel {
    pub id: Uuid,
    pub tag: String,
    pub establishment_cuig: String,
    pub description: Option<String>,
    pub sex: Sex,
    pub category: Option<Category>,
    pub status: BovineStatus,
    pub tagging_date: Option<NaiveDate>,
    pub birth_date: Option<NaiveDate>,
    pub operation_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// For inserting new bovines
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = bovines)]
pub struct NewBovineModel {
    pub id: Uuid,
    pub tag: String,
    pub establishment_cuig: String,
    pub description: Option<String>,
    pub sex: Sex,
    pub category: Option<Category>,
    pub status: BovineStatus,
    pub tagging_date: Option<NaiveDate>,
    pub birth_date: Option<NaiveDate>,
    pub operation_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// For updating existing bovines (identity columns never change)
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = bovines)]
#[diesel(treat_none_as_null = true)]
pub struct BovineChangeset {
    pub description: Option<String>,
    pub sex: Sex,
    pub category: Option<Category>,
    pub status: BovineStatus,
    pub tagging_date: Option<NaiveDate>,
    pub birth_date: Option<NaiveDate>,
    pub operation_id: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}
