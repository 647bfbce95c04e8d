use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use tokio::task;
use uuid::Uuid;

use crate::modules::batch::domain::{
    entities::batch::Batch, repositories::batch_repository::BatchRepository,
};
use crate::modules::batch::infrastructure::models::{
    BatchChangeset, BatchModel, NewBatchBovine, NewBatchModel,
};
use crate::schema::{batch_bovines, batches, bovines};
use crate::shared::domain::value_objects::BovineKey;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::infrastructure::database::lower;
use crate::shared::infrastructure::Database;
use crate::shared::utils::logger::LogContext;
use crate::{log_debug, log_warn};

pub struct BatchRepositoryImpl {
    db: Arc<Database>,
}

impl BatchRepositoryImpl {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn model_to_entity(model: BatchModel, members: Vec<BovineKey>) -> Batch {
        Batch {
            id: model.id,
            batch_name: model.batch_name,
            establishment_cuig: model.establishment_cuig,
            description: model.description,
            creation_date: model.creation_date,
            members: BTreeSet::new(),
        }
        .with_members(members)
    }

    fn entity_to_new_model(entity: &Batch) -> NewBatchModel {
        NewBatchModel {
            id: entity.id,
            batch_name: entity.batch_name.clone(),
            establishment_cuig: entity.establishment_cuig.clone(),
            description: entity.description.clone(),
            creation_date: entity.creation_date,
        }
    }

    /// Member keys of every given batch, keyed by batch id.
    fn load_members(
        conn: &mut PgConnection,
        batch_ids: &[Uuid],
    ) -> QueryResult<HashMap<Uuid, Vec<BovineKey>>> {
        let rows = batch_bovines::table
            .inner_join(bovines::table)
            .filter(batch_bovines::batch_id.eq_any(batch_ids))
            .select((
                batch_bovines::batch_id,
                bovines::tag,
                bovines::establishment_cuig,
            ))
            .load::<(Uuid, String, String)>(conn)?;

        let mut members: HashMap<Uuid, Vec<BovineKey>> = HashMap::new();
        for (batch_id, tag, cuig) in rows {
            members
                .entry(batch_id)
                .or_default()
                .push(BovineKey::new(tag, cuig));
        }
        Ok(members)
    }

    fn hydrate(conn: &mut PgConnection, models: Vec<BatchModel>) -> QueryResult<Vec<Batch>> {
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut members = Self::load_members(conn, &ids)?;

        Ok(models
            .into_iter()
            .map(|model| {
                let keys = members.remove(&model.id).unwrap_or_default();
                Self::model_to_entity(model, keys)
            })
            .collect())
    }

    /// Make the join rows of this batch match its member set.
    fn replace_members(conn: &mut PgConnection, batch: &Batch) -> AppResult<()> {
        diesel::delete(batch_bovines::table.filter(batch_bovines::batch_id.eq(batch.id)))
            .execute(conn)?;

        if batch.members().is_empty() {
            return Ok(());
        }

        let tags: Vec<String> = batch
            .members()
            .iter()
            .map(|key| key.tag.to_lowercase())
            .collect();
        let candidates = bovines::table
            .filter(lower(bovines::tag).eq_any(&tags))
            .select((bovines::id, bovines::tag, bovines::establishment_cuig))
            .load::<(Uuid, String, String)>(conn)?;

        let rows: Vec<NewBatchBovine> = candidates
            .into_iter()
            .filter(|(_, tag, cuig)| batch.has_member(&BovineKey::new(tag.as_str(), cuig.as_str())))
            .map(|(bovine_id, _, _)| NewBatchBovine {
                batch_id: batch.id,
                bovine_id,
            })
            .collect();

        if rows.len() < batch.members().len() {
            log_warn!(
                "Batch {} lists {} bovines that do not exist, skipping them",
                batch.key(),
                batch.members().len() - rows.len()
            );
        }

        diesel::insert_into(batch_bovines::table)
            .values(&rows)
            .on_conflict_do_nothing()
            .execute(conn)?;
        Ok(())
    }

    async fn load_where_cuig(&self, cuig: Option<String>) -> AppResult<Vec<Batch>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> AppResult<Vec<Batch>> {
            let mut conn = db.get_connection()?;
            let mut query = batches::table.into_boxed();
            if let Some(cuig) = cuig {
                query = query.filter(lower(batches::establishment_cuig).eq(cuig.to_lowercase()));
            }

            let models = query
                .order(batches::creation_date.asc())
                .load::<BatchModel>(&mut conn)?;
            Ok(Self::hydrate(&mut conn, models)?)
        })
        .await?
    }
}

#[async_trait]
impl BatchRepository for BatchRepositoryImpl {
    async fn find_by_name_and_cuig(&self, name: &str, cuig: &str) -> AppResult<Option<Batch>> {
        let db = Arc::clone(&self.db);
        let name = name.to_lowercase();
        let cuig = cuig.to_lowercase();

        task::spawn_blocking(move || -> AppResult<Option<Batch>> {
            let mut conn = db.get_connection()?;
            let model = batches::table
                .filter(lower(batches::batch_name).eq(&name))
                .filter(lower(batches::establishment_cuig).eq(&cuig))
                .select(BatchModel::as_select())
                .first::<BatchModel>(&mut conn)
                .optional()?;

            match model {
                Some(model) => Ok(Self::hydrate(&mut conn, vec![model])?.pop()),
                None => Ok(None),
            }
        })
        .await?
    }

    async fn find_all(&self) -> AppResult<Vec<Batch>> {
        self.load_where_cuig(None).await
    }

    async fn find_all_by_cuig(&self, cuig: &str) -> AppResult<Vec<Batch>> {
        self.load_where_cuig(Some(cuig.to_string())).await
    }

    async fn insert(&self, batch: &Batch) -> AppResult<Batch> {
        log_debug!("Repository inserting batch {}", batch.key());
        let db = Arc::clone(&self.db);
        let batch = batch.clone();
        let start = std::time::Instant::now();

        let result = task::spawn_blocking(move || -> AppResult<Batch> {
            let mut conn = db.get_connection()?;
            let model = conn.transaction::<BatchModel, AppError, _>(|conn| {
                let model = diesel::insert_into(batches::table)
                    .values(Self::entity_to_new_model(&batch))
                    .get_result::<BatchModel>(conn)?;
                Self::replace_members(conn, &batch)?;
                Ok(model)
            });

            match model {
                Ok(model) => Ok(Self::model_to_entity(model, batch.members().iter().cloned().collect())),
                Err(AppError::AlreadyExists(_)) => Err(AppError::AlreadyExists(format!(
                    "The batch with name {} already exists",
                    batch.batch_name
                ))),
                Err(e) => Err(e),
            }
        })
        .await?;

        LogContext::db_operation("insert", "batches", Some(start.elapsed().as_millis() as u64));
        result
    }

    async fn save(&self, batch: &Batch) -> AppResult<Batch> {
        log_debug!("Repository saving batch {} ({} members)", batch.key(), batch.members().len());
        let db = Arc::clone(&self.db);
        let batch = batch.clone();

        task::spawn_blocking(move || -> AppResult<Batch> {
            let mut conn = db.get_connection()?;
            let model = conn.transaction::<BatchModel, AppError, _>(|conn| {
                let model = diesel::insert_into(batches::table)
                    .values(Self::entity_to_new_model(&batch))
                    .on_conflict(batches::id)
                    .do_update()
                    .set(BatchChangeset {
                        description: batch.description.clone(),
                    })
                    .get_result::<BatchModel>(conn)?;
                Self::replace_members(conn, &batch)?;
                Ok(model)
            })?;

            Ok(Self::model_to_entity(model, batch.members().iter().cloned().collect()))
        })
        .await?
    }

    async fn delete(&self, batch: &Batch) -> AppResult<()> {
        let db = Arc::clone(&self.db);
        let id = batch.id;

        task::spawn_blocking(move || -> AppResult<()> {
            let mut conn = db.get_connection()?;
            diesel::delete(batches::table.filter(batches::id.eq(id))).execute(&mut conn)?;
            Ok(())
        })
        .await?
    }
}
