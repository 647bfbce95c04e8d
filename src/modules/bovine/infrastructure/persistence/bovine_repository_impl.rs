use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use tokio::task;
use uuid::Uuid;

use crate::modules::batch::infrastructure::models::NewBatchBovine;
use crate::modules::bovine::domain::{
    entities::bovine::{Bovine, BovineSearchCriteria},
    repositories::bovine_repository::BovineRepository,
};
use crate::modules::bovine::infrastructure::models::{BovineChangeset, BovineModel, NewBovineModel};
use crate::schema::{batch_bovines, batches, bovines};
use crate::shared::application::{PaginatedResult, PaginationParams};
use crate::shared::domain::value_objects::BatchKey;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::infrastructure::database::lower;
use crate::shared::infrastructure::Database;
use crate::shared::utils::logger::LogContext;
use crate::{log_debug, log_warn};

pub struct BovineRepositoryImpl {
    db: Arc<Database>,
}

impl BovineRepositoryImpl {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn model_to_entity(model: BovineModel, batches: Vec<BatchKey>) -> Bovine {
        Bovine {
            id: model.id,
            tag: model.tag,
            establishment_cuig: model.establishment_cuig,
            description: model.description,
            sex: model.sex,
            category: model.category,
            status: model.status,
            tagging_date: model.tagging_date,
            birth_date: model.birth_date,
            operation_id: model.operation_id,
            batches: BTreeSet::new(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
        .with_batches(batches)
    }

    fn entity_to_new_model(entity: &Bovine) -> NewBovineModel {
        NewBovineModel {
            id: entity.id,
            tag: entity.tag.clone(),
            establishment_cuig: entity.establishment_cuig.clone(),
            description: entity.description.clone(),
            sex: entity.sex,
            category: entity.category,
            status: entity.status,
            tagging_date: entity.tagging_date,
            birth_date: entity.birth_date,
            operation_id: entity.operation_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    fn entity_to_changeset(entity: &Bovine) -> BovineChangeset {
        BovineChangeset {
            description: entity.description.clone(),
            sex: entity.sex,
            category: entity.category,
            status: entity.status,
            tagging_date: entity.tagging_date,
            birth_date: entity.birth_date,
            operation_id: entity.operation_id,
            updated_at: Utc::now(),
        }
    }

    /// Batch keys of every given bovine, keyed by bovine id.
    fn load_memberships(
        conn: &mut PgConnection,
        bovine_ids: &[Uuid],
    ) -> QueryResult<HashMap<Uuid, Vec<BatchKey>>> {
        let rows = batch_bovines::table
            .inner_join(batches::table)
            .filter(batch_bovines::bovine_id.eq_any(bovine_ids))
            .select((
                batch_bovines::bovine_id,
                batches::batch_name,
                batches::establishment_cuig,
            ))
            .load::<(Uuid, String, String)>(conn)?;

        let mut memberships: HashMap<Uuid, Vec<BatchKey>> = HashMap::new();
        for (bovine_id, name, cuig) in rows {
            memberships
                .entry(bovine_id)
                .or_default()
                .push(BatchKey::new(name, cuig));
        }
        Ok(memberships)
    }

    fn hydrate(conn: &mut PgConnection, models: Vec<BovineModel>) -> QueryResult<Vec<Bovine>> {
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut memberships = Self::load_memberships(conn, &ids)?;

        Ok(models
            .into_iter()
            .map(|model| {
                let batches = memberships.remove(&model.id).unwrap_or_default();
                Self::model_to_entity(model, batches)
            })
            .collect())
    }

    /// Make the join rows of this bovine match its batch set.
    fn replace_memberships(conn: &mut PgConnection, bovine: &Bovine) -> AppResult<()> {
        diesel::delete(batch_bovines::table.filter(batch_bovines::bovine_id.eq(bovine.id)))
            .execute(conn)?;

        if bovine.batches().is_empty() {
            return Ok(());
        }

        let names: Vec<String> = bovine
            .batches()
            .iter()
            .map(|key| key.batch_name.to_lowercase())
            .collect();
        let candidates = batches::table
            .filter(lower(batches::batch_name).eq_any(&names))
            .select((batches::id, batches::batch_name, batches::establishment_cuig))
            .load::<(Uuid, String, String)>(conn)?;

        let rows: Vec<NewBatchBovine> = candidates
            .into_iter()
            .filter(|(_, name, cuig)| bovine.belongs_to(&BatchKey::new(name.as_str(), cuig.as_str())))
            .map(|(batch_id, _, _)| NewBatchBovine {
                batch_id,
                bovine_id: bovine.id,
            })
            .collect();

        if rows.len() < bovine.batches().len() {
            log_warn!(
                "Bovine {} references {} batches that do not exist, skipping them",
                bovine.key(),
                bovine.batches().len() - rows.len()
            );
        }

        diesel::insert_into(batch_bovines::table)
            .values(&rows)
            .on_conflict_do_nothing()
            .execute(conn)?;
        Ok(())
    }

    fn upsert_blocking(conn: &mut PgConnection, bovine: &Bovine) -> AppResult<BovineModel> {
        let saved = diesel::insert_into(bovines::table)
            .values(Self::entity_to_new_model(bovine))
            .on_conflict(bovines::id)
            .do_update()
            .set(Self::entity_to_changeset(bovine))
            .get_result::<BovineModel>(conn)?;

        Self::replace_memberships(conn, bovine)?;
        Ok(saved)
    }

    fn filtered(criteria: &BovineSearchCriteria) -> bovines::BoxedQuery<'static, Pg> {
        let mut query = bovines::table.into_boxed();

        if let Some(cuig) = &criteria.establishment_cuig {
            query = query.filter(lower(bovines::establishment_cuig).eq(cuig.to_lowercase()));
        }
        if let Some(tag) = &criteria.tag {
            query = query.filter(bovines::tag.ilike(like_pattern(tag)));
        }
        if let Some(sex) = criteria.sex {
            query = query.filter(bovines::sex.eq(sex));
        }
        if let Some(description) = &criteria.description {
            query = query.filter(bovines::description.ilike(like_pattern(description)));
        }

        query
    }
}

/// `%value%` with LIKE wildcards in the value escaped.
fn like_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl BovineRepository for BovineRepositoryImpl {
    async fn find_by_tag_and_cuig(&self, tag: &str, cuig: &str) -> AppResult<Option<Bovine>> {
        let db = Arc::clone(&self.db);
        let tag = tag.to_lowercase();
        let cuig = cuig.to_lowercase();

        task::spawn_blocking(move || -> AppResult<Option<Bovine>> {
            let mut conn = db.get_connection()?;
            let model = bovines::table
                .filter(lower(bovines::tag).eq(&tag))
                .filter(lower(bovines::establishment_cuig).eq(&cuig))
                .select(BovineModel::as_select())
                .first::<BovineModel>(&mut conn)
                .optional()?;

            match model {
                Some(model) => Ok(Self::hydrate(&mut conn, vec![model])?.pop()),
                None => Ok(None),
            }
        })
        .await?
    }

    async fn find_by_tags(&self, tags: &[String]) -> AppResult<Vec<Bovine>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let db = Arc::clone(&self.db);
        let tags: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();

        task::spawn_blocking(move || -> AppResult<Vec<Bovine>> {
            let mut conn = db.get_connection()?;
            let models = bovines::table
                .filter(lower(bovines::tag).eq_any(&tags))
                .order(bovines::tag.asc())
                .select(BovineModel::as_select())
                .load::<BovineModel>(&mut conn)?;

            Ok(Self::hydrate(&mut conn, models)?)
        })
        .await?
    }

    async fn insert(&self, bovine: &Bovine) -> AppResult<Bovine> {
        log_debug!("Repository inserting bovine {}", bovine.key());
        let db = Arc::clone(&self.db);
        let bovine = bovine.clone();
        let start = std::time::Instant::now();

        let result = task::spawn_blocking(move || -> AppResult<Bovine> {
            let mut conn = db.get_connection()?;
            let model = conn.transaction::<BovineModel, AppError, _>(|conn| {
                let model = diesel::insert_into(bovines::table)
                    .values(Self::entity_to_new_model(&bovine))
                    .get_result::<BovineModel>(conn)?;
                Self::replace_memberships(conn, &bovine)?;
                Ok(model)
            });

            match model {
                Ok(model) => Ok(Self::model_to_entity(model, bovine.batches().iter().cloned().collect())),
                Err(AppError::AlreadyExists(_)) => Err(AppError::AlreadyExists(format!(
                    "The bovine with tag {} already exists",
                    bovine.tag
                ))),
                Err(e) => Err(e),
            }
        })
        .await?;

        LogContext::db_operation("insert", "bovines", Some(start.elapsed().as_millis() as u64));
        result
    }

    async fn save(&self, bovine: &Bovine) -> AppResult<Bovine> {
        log_debug!("Repository saving bovine {}", bovine.key());
        let db = Arc::clone(&self.db);
        let bovine = bovine.clone();

        task::spawn_blocking(move || -> AppResult<Bovine> {
            let mut conn = db.get_connection()?;
            let model = conn.transaction::<BovineModel, AppError, _>(|conn| {
                Self::upsert_blocking(conn, &bovine)
            })?;
            Ok(Self::model_to_entity(model, bovine.batches().iter().cloned().collect()))
        })
        .await?
    }

    async fn save_all(&self, bovines: &[Bovine]) -> AppResult<Vec<Bovine>> {
        if bovines.is_empty() {
            return Ok(Vec::new());
        }

        log_debug!("Repository saving {} bovines", bovines.len());
        let db = Arc::clone(&self.db);
        let to_save = bovines.to_vec();
        let start = std::time::Instant::now();

        let saved = task::spawn_blocking(move || -> AppResult<Vec<Bovine>> {
            let mut conn = db.get_connection()?;
            conn.transaction::<Vec<Bovine>, AppError, _>(|conn| {
                to_save
                    .iter()
                    .map(|bovine| {
                        let model = Self::upsert_blocking(conn, bovine)?;
                        Ok(Self::model_to_entity(model, bovine.batches().iter().cloned().collect()))
                    })
                    .collect()
            })
        })
        .await??;

        LogContext::db_operation("save_all", "bovines", Some(start.elapsed().as_millis() as u64));
        Ok(saved)
    }

    async fn delete(&self, bovine: &Bovine) -> AppResult<()> {
        let db = Arc::clone(&self.db);
        let id = bovine.id;

        task::spawn_blocking(move || -> AppResult<()> {
            let mut conn = db.get_connection()?;
            // Membership rows go with the bovine (ON DELETE CASCADE)
            diesel::delete(bovines::table.filter(bovines::id.eq(id))).execute(&mut conn)?;
            Ok(())
        })
        .await?
    }

    async fn search(
        &self,
        criteria: &BovineSearchCriteria,
        pagination: &PaginationParams,
    ) -> AppResult<PaginatedResult<Bovine>> {
        let db = Arc::clone(&self.db);
        let criteria = criteria.clone();
        let pagination = *pagination;

        task::spawn_blocking(move || -> AppResult<PaginatedResult<Bovine>> {
            let mut conn = db.get_connection()?;

            let total = Self::filtered(&criteria)
                .count()
                .get_result::<i64>(&mut conn)?;

            let models = Self::filtered(&criteria)
                .order(bovines::tag.asc())
                .offset(pagination.offset())
                .limit(pagination.limit())
                .load::<BovineModel>(&mut conn)?;

            let items = Self::hydrate(&mut conn, models)?;
            Ok(PaginatedResult::new(items, total as u64, &pagination))
        })
        .await?
    }
}
