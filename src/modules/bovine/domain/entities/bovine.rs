use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

use crate::modules::bovine::domain::value_objects::{BovineStatus, Category, Sex};
use crate::shared::domain::value_objects::{BatchKey, BovineKey};
use crate::shared::utils::is_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bovine {
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
    /// Batches this bovine belongs to. Only the membership primitives mutate it.
    pub(crate) batches: BTreeSet<BatchKey>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration payload for a bovine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBovine {
    pub tag: String,
    pub establishment_cuig: String,
    pub description: Option<String>,
    pub sex: Sex,
    pub category: Option<Category>,
    pub status: BovineStatus,
    pub tagging_date: Option<NaiveDate>,
    pub birth_date: Option<NaiveDate>,
    pub operation_id: Option<Uuid>,
}

/// Partial update of a bovine. Absent (or blank) fields keep the persisted value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BovineUpdate {
    pub description: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub sex: Option<Sex>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<BovineStatus>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub tagging_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub birth_date: Option<NaiveDate>,
    pub operation_id: Option<Uuid>,
}

/// Reads an optional string field, treating empty or whitespace-only text as absent.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Example-match search filter. Unset fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BovineSearchCriteria {
    /// Exact establishment match (case-insensitive).
    pub establishment_cuig: Option<String>,
    /// Case-insensitive substring of the tag.
    pub tag: Option<String>,
    pub sex: Option<Sex>,
    /// Case-insensitive substring of the description.
    pub description: Option<String>,
}

impl Bovine {
    pub fn new(new_bovine: NewBovine) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tag: new_bovine.tag,
            establishment_cuig: new_bovine.establishment_cuig,
            description: new_bovine.description.filter(|d| !d.trim().is_empty()),
            sex: new_bovine.sex,
            category: new_bovine.category,
            status: new_bovine.status,
            tagging_date: new_bovine.tagging_date,
            birth_date: new_bovine.birth_date,
            operation_id: new_bovine.operation_id,
            batches: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn key(&self) -> BovineKey {
        BovineKey::new(self.tag.clone(), self.establishment_cuig.clone())
    }

    pub fn batches(&self) -> &BTreeSet<BatchKey> {
        &self.batches
    }

    pub fn belongs_to(&self, batch: &BatchKey) -> bool {
        self.batches.contains(batch)
    }

    pub fn batch_names(&self) -> Vec<String> {
        self.batches.iter().map(|b| b.batch_name.clone()).collect()
    }

    /// Replaces the membership set wholesale. Used by stores when rehydrating an aggregate.
    pub fn with_batches(mut self, batches: impl IntoIterator<Item = BatchKey>) -> Self {
        self.batches = batches.into_iter().collect();
        self
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl BovineUpdate {
    pub fn effective_sex(&self, current: &Bovine) -> Sex {
        self.sex.unwrap_or(current.sex)
    }

    pub fn effective_category(&self, current: &Bovine) -> Option<Category> {
        self.category.or(current.category)
    }

    pub fn effective_status(&self, current: &Bovine) -> BovineStatus {
        self.status.unwrap_or(current.status)
    }

    /// False when the update carries none of the lifecycle fields.
    pub fn touches_lifecycle(&self) -> bool {
        self.sex.is_some() || self.category.is_some() || self.status.is_some()
    }

    /// Merge into the persisted bovine. Identity (tag, establishment) and memberships never change.
    pub fn apply_to(self, bovine: &mut Bovine) {
        if !is_blank(self.description.as_deref()) {
            bovine.description = self.description;
        }
        if let Some(sex) = self.sex {
            bovine.sex = sex;
        }
        if let Some(category) = self.category {
            bovine.category = Some(category);
        }
        if let Some(status) = self.status {
            bovine.status = status;
        }
        if let Some(date) = self.tagging_date {
            bovine.tagging_date = Some(date);
        }
        if let Some(date) = self.birth_date {
            bovine.birth_date = Some(date);
        }
        if let Some(operation_id) = self.operation_id {
            bovine.operation_id = Some(operation_id);
        }
        bovine.touch();
    }
}

impl BovineSearchCriteria {
    pub fn for_establishment(cuig: impl Into<String>) -> Self {
        Self {
            establishment_cuig: Some(cuig.into()),
            ..Default::default()
        }
    }

    /// Blank text filters are treated as absent.
    pub fn normalized(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }
        Self {
            establishment_cuig: keep(self.establishment_cuig),
            tag: keep(self.tag),
            sex: self.sex,
            description: keep(self.description),
        }
    }

    pub fn matches(&self, bovine: &Bovine) -> bool {
        fn contains(haystack: Option<&str>, needle: &Option<String>) -> bool {
            match needle {
                None => true,
                Some(n) => haystack
                    .map(|h| h.to_lowercase().contains(&n.to_lowercase()))
                    .unwrap_or(false),
            }
        }

        let establishment_ok = self
            .establishment_cuig
            .as_ref()
            .map_or(true, |c| c.to_lowercase() == bovine.establishment_cuig.to_lowercase());
        let sex_ok = self.sex.map_or(true, |s| s == bovine.sex);

        establishment_ok
            && sex_ok
            && contains(Some(&bovine.tag), &self.tag)
            && contains(bovine.description.as_deref(), &self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cow() -> Bovine {
        Bovine::new(NewBovine {
            tag: "AR-001".to_string(),
            establishment_cuig: "312".to_string(),
            description: Some("Black angus".to_string()),
            sex: Sex::Female,
            category: Some(Category::Cow),
            status: BovineStatus::Prenada,
            tagging_date: None,
            birth_date: None,
            operation_id: None,
        })
    }

    #[test]
    fn blank_fields_keep_persisted_values() {
        let mut bovine = cow();
        BovineUpdate {
            description: Some("   ".to_string()),
            ..Default::default()
        }
        .apply_to(&mut bovine);

        assert_eq!(bovine.description.as_deref(), Some("Black angus"));
        assert_eq!(bovine.status, BovineStatus::Prenada);
    }

    #[test]
    fn blank_json_fields_deserialize_as_absent() {
        let update: BovineUpdate = serde_json::from_str(
            r#"{"description":"moved","sex":"","category":"  ","status":"","taggingDate":"","birthDate":""}"#,
        )
        .unwrap();
        assert!(update.sex.is_none());
        assert!(update.category.is_none());
        assert!(update.status.is_none());
        assert!(update.birth_date.is_none());
        assert!(!update.touches_lifecycle());

        let mut bovine = cow();
        update.apply_to(&mut bovine);
        assert_eq!(bovine.description.as_deref(), Some("moved"));
        assert_eq!(bovine.sex, Sex::Female);
        assert_eq!(bovine.category, Some(Category::Cow));
        assert_eq!(bovine.status, BovineStatus::Prenada);
    }

    #[test]
    fn filled_json_fields_still_parse() {
        let update: BovineUpdate = serde_json::from_str(
            r#"{"status":"sin preñez","birthDate":"2021-03-04"}"#,
        )
        .unwrap();
        assert_eq!(update.status, Some(BovineStatus::SinPrenez));
        assert_eq!(update.birth_date, NaiveDate::from_ymd_opt(2021, 3, 4));

        let unknown = serde_json::from_str::<BovineUpdate>(r#"{"sex":"unknown"}"#);
        assert!(unknown.is_err());
    }

    #[test]
    fn supplied_fields_overwrite() {
        let mut bovine = cow();
        let birth = NaiveDate::from_ymd_opt(2021, 3, 4).unwrap();
        BovineUpdate {
            status: Some(BovineStatus::SinPrenez),
            birth_date: Some(birth),
            ..Default::default()
        }
        .apply_to(&mut bovine);

        assert_eq!(bovine.status, BovineStatus::SinPrenez);
        assert_eq!(bovine.birth_date, Some(birth));
        assert_eq!(bovine.establishment_cuig, "312");
    }

    #[test]
    fn effective_values_fall_back_to_current() {
        let bovine = cow();
        let update = BovineUpdate::default();
        assert!(!update.touches_lifecycle());
        assert_eq!(update.effective_sex(&bovine), Sex::Female);
        assert_eq!(update.effective_category(&bovine), Some(Category::Cow));
        assert_eq!(update.effective_status(&bovine), BovineStatus::Prenada);
    }

    #[test]
    fn search_criteria_match_substrings_ignoring_case() {
        let bovine = cow();
        let criteria = BovineSearchCriteria {
            tag: Some("ar-0".to_string()),
            description: Some("ANGUS".to_string()),
            ..BovineSearchCriteria::for_establishment("312")
        };
        assert!(criteria.matches(&bovine));

        let other_establishment = BovineSearchCriteria::for_establishment("31");
        assert!(!other_establishment.matches(&bovine));

        let wrong_sex = BovineSearchCriteria {
            sex: Some(Sex::Male),
            ..Default::default()
        };
        assert!(!wrong_sex.matches(&bovine));
    }

    #[test]
    fn normalized_drops_blank_filters() {
        let criteria = BovineSearchCriteria {
            tag: Some("  ".to_string()),
            ..Default::default()
        }
        .normalized();
        assert!(criteria.tag.is_none());
    }
}
