//! Entity-agnostic persistence operations.
//!
//! [`BaseRepository`] turns filter and update requests expressed with an
//! entity's typed columns into SQL, and runs each request in its own
//! transaction: commit on success, roll back and log on failure.

use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;

use log::{error, info, warn};
use sea_orm::sea_query::{Expr, Table};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait,
    IdenStatic, IntoActiveModel, ModelTrait, Order, QueryFilter, QueryOrder, QueryResult, Schema, Statement,
    StatementBuilder, TransactionTrait, Value,
};
use serde::Serialize;

use super::error::{RepositoryError, RepositoryResult};
use crate::entities::links::{Association, Cardinality};
use crate::storage::Session;

/// Per-entity descriptor the generic repository needs on top of [`EntityTrait`].
pub trait Record: EntityTrait {
    /// Name used in log lines and error messages.
    const NAME: &'static str;
    /// Integer primary key column; also the insertion order.
    const ID: Self::Column;

    type Active: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + Send;

    fn id_of(model: &Self::Model) -> i32;
}

/// Column assignments applied by [`BaseRepository::update_fields`].
pub struct Changes<E: EntityTrait> {
    values: Vec<(E::Column, Value)>,
}

impl<E: Record> Changes<E> {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn set(mut self, column: E::Column, value: impl Into<Value>) -> Self {
        self.values.push((column, value.into()));
        self
    }

    /// Build assignments from field names, rejecting names that are not columns.
    pub fn from_named<I, K, V>(pairs: I) -> RepositoryResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
        E::Column: FromStr,
    {
        let mut changes = Self::new();
        for (name, value) in pairs {
            let name = name.as_ref();
            let column = E::Column::from_str(name).map_err(|_| RepositoryError::UnknownField {
                entity: E::NAME,
                field: name.to_string(),
            })?;
            changes = changes.set(column, value);
        }
        Ok(changes)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &E::Column> {
        self.values.iter().map(|(column, _)| column)
    }
}

impl<E: Record> Default for Changes<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of resolving an [`Association`].
#[derive(Clone, Debug, PartialEq)]
pub enum Relationship<M> {
    One(M),
    Many(Vec<M>),
    /// A to-one association whose foreign key is empty.
    Absent,
}

impl<M> Relationship<M> {
    pub fn into_one(self) -> Option<M> {
        match self {
            Relationship::One(model) => Some(model),
            Relationship::Many(models) => models.into_iter().next(),
            Relationship::Absent => None,
        }
    }

    pub fn into_many(self) -> Vec<M> {
        match self {
            Relationship::One(model) => vec![model],
            Relationship::Many(models) => models,
            Relationship::Absent => Vec::new(),
        }
    }
}

/// Generic CRUD engine for one entity type over a borrowed [`Session`].
pub struct BaseRepository<'s, E> {
    session: &'s Session,
    entity: PhantomData<E>,
}

impl<'s, E> BaseRepository<'s, E>
where
    E: Record,
    E::Model: Serialize + IntoActiveModel<E::Active>,
{
    pub fn new(session: &'s Session) -> Self {
        Self {
            session,
            entity: PhantomData,
        }
    }

    pub fn session(&self) -> &'s Session {
        self.session
    }

    /// Create the entity's table and indexes if they do not exist yet.
    pub async fn create_table(&self) -> RepositoryResult<String> {
        let action = "create the table";
        let txn = self.begin(action).await?;
        let outcome = async {
            let backend = txn.get_database_backend();
            let schema = Schema::new(backend);

            let mut table = schema.create_table_from_entity(E::default());
            table.if_not_exists();
            txn.execute(backend.build(&table)).await.map_err(store::<E>(action))?;

            for mut index in schema.create_index_from_entity(E::default()) {
                index.if_not_exists();
                txn.execute(backend.build(&index)).await.map_err(store::<E>(action))?;
            }

            Ok(format!("Table for {} model created successfully", E::NAME))
        }
        .await;
        self.settle(txn, action, outcome).await.inspect(|message| info!("{}", message))
    }

    /// Drop the entity's table if it exists.
    pub async fn drop_table(&self) -> RepositoryResult<String> {
        let action = "drop the table";
        let txn = self.begin(action).await?;
        let outcome = async {
            let backend = txn.get_database_backend();
            let statement = Table::drop().table(E::default()).if_exists().to_owned();
            txn.execute(backend.build(&statement)).await.map_err(store::<E>(action))?;
            Ok(format!("Table for {} model dropped successfully", E::NAME))
        }
        .await;
        self.settle(txn, action, outcome).await.inspect(|message| info!("{}", message))
    }

    /// Insert one row and return it as persisted.
    pub async fn create(&self, data: E::Active) -> RepositoryResult<E::Model> {
        let action = "create a new instance";
        let txn = self.begin(action).await?;
        let outcome = data.insert(&txn).await.map_err(store::<E>(action));
        let model = self.settle(txn, action, outcome).await?;
        info!("Created a new instance of {} model with id={}", E::NAME, E::id_of(&model));
        Ok(model)
    }

    /// Every row in insertion order, or `None` when the table is empty.
    pub async fn get_all(&self) -> RepositoryResult<Option<Vec<E::Model>>> {
        let action = "retrieve instances";
        let txn = self.begin(action).await?;
        let outcome = E::find().order_by_asc(E::ID).all(&txn).await.map_err(store::<E>(action));
        let models = self.settle(txn, action, outcome).await?;

        if models.is_empty() {
            info!("No instances found for {} model", E::NAME);
            Ok(None)
        } else {
            info!("Retrieved all {} instances of {} model", models.len(), E::NAME);
            Ok(Some(models))
        }
    }

    /// Every row whose `column` equals `value`, or `None` when nothing matches.
    pub async fn get_all_by_filter<V>(&self, column: E::Column, value: V) -> RepositoryResult<Option<Vec<E::Model>>>
    where
        V: Into<Value> + Display,
    {
        let action = "retrieve instances";
        let shown = value.to_string();
        let txn = self.begin(action).await?;
        let outcome = E::find()
            .filter(column.eq(value))
            .order_by_asc(E::ID)
            .all(&txn)
            .await
            .map_err(store::<E>(action));
        let models = self.settle(txn, action, outcome).await?;

        if models.is_empty() {
            info!("No instances found for {} model with {}={}", E::NAME, column.as_str(), shown);
            Ok(None)
        } else {
            info!("Retrieved instances of {} model with {}={}", E::NAME, column.as_str(), shown);
            Ok(Some(models))
        }
    }

    /// The first row whose `column` equals `value`.
    pub async fn filter_by<V>(&self, column: E::Column, value: V) -> RepositoryResult<Option<E::Model>>
    where
        V: Into<Value> + Display,
    {
        let action = "retrieve an instance";
        let shown = value.to_string();
        let txn = self.begin(action).await?;
        let outcome = find_first::<E, _>(&txn, column, value.into(), action).await;
        let model = self.settle(txn, action, outcome).await?;

        match &model {
            Some(_) => info!("Retrieved an instance of {} model with {}={}", E::NAME, column.as_str(), shown),
            None => info!("No instance found for {} model with {}={}", E::NAME, column.as_str(), shown),
        }
        Ok(model)
    }

    /// A uniformly random row, or `None` when the table is empty.
    pub async fn get_random(&self) -> RepositoryResult<Option<E::Model>> {
        let action = "retrieve a random instance";
        let txn = self.begin(action).await?;
        let outcome = E::find()
            .order_by(Expr::cust("RANDOM()"), Order::Asc)
            .one(&txn)
            .await
            .map_err(store::<E>(action));
        let model = self.settle(txn, action, outcome).await?;

        match &model {
            Some(found) => info!("Retrieved a random instance of {} model (id={})", E::NAME, E::id_of(found)),
            None => info!("No instance found for {} model", E::NAME),
        }
        Ok(model)
    }

    /// Value of `field` on the row whose `column` equals `value`.
    ///
    /// A missing row is [`RepositoryError::NotFound`]; a row whose field is
    /// null yields `Ok(None)`.
    pub async fn get_field_value<V>(
        &self,
        column: E::Column,
        value: V,
        field: E::Column,
    ) -> RepositoryResult<Option<serde_json::Value>>
    where
        V: Into<Value> + Display,
    {
        let action = "retrieve the value of the instance field";
        let shown = value.to_string();
        let txn = self.begin(action).await?;
        let outcome = async {
            let model = require_one::<E, _>(&txn, column, value.into(), &shown, action).await?;
            let fields = serde_json::to_value(&model).map_err(|err| RepositoryError::Store {
                entity: E::NAME,
                action: action.to_string(),
                source: DbErr::Json(err.to_string()),
            })?;
            Ok(fields.get(field.as_str()).filter(|value| !value.is_null()).cloned())
        }
        .await;
        let field_value = self.settle(txn, action, outcome).await?;

        match &field_value {
            Some(_) => info!(
                "Retrieved the value of the instance field '{}' for {} model with {}={}",
                field.as_str(),
                E::NAME,
                column.as_str(),
                shown
            ),
            None => warn!(
                "The field '{}' of {} model with {}={} has no value",
                field.as_str(),
                E::NAME,
                column.as_str(),
                shown
            ),
        }
        Ok(field_value)
    }

    /// Set one field on the row whose `column` equals `value`.
    pub async fn update_field<V>(
        &self,
        column: E::Column,
        value: V,
        field: E::Column,
        new_value: impl Into<Value>,
    ) -> RepositoryResult<E::Model>
    where
        V: Into<Value> + Display,
    {
        self.update_fields(column, value, Changes::new().set(field, new_value)).await
    }

    /// Apply `changes` to the row whose `column` equals `value` and return it refreshed.
    pub async fn update_fields<V>(&self, column: E::Column, value: V, changes: Changes<E>) -> RepositoryResult<E::Model>
    where
        V: Into<Value> + Display,
    {
        let action = "update fields";
        let shown = value.to_string();
        let updated = changes.columns().map(|target| target.as_str()).collect::<Vec<_>>().join(", ");
        let txn = self.begin(action).await?;
        let outcome = async {
            let model = require_one::<E, _>(&txn, column, value.into(), &shown, action).await?;
            let id = E::id_of(&model);

            if !changes.is_empty() {
                let mut update = E::update_many().filter(E::ID.eq(id));
                for (target, new_value) in changes.values {
                    update = update.col_expr(target, Expr::value(new_value));
                }
                update.exec(&txn).await.map_err(store::<E>(action))?;
            }

            require_one::<E, _>(&txn, E::ID, id.into(), &id.to_string(), action).await
        }
        .await;
        let model = self.settle(txn, action, outcome).await?;

        info!(
            "Updated [{}] for {} model with {}={}",
            updated,
            E::NAME,
            column.as_str(),
            shown
        );
        Ok(model)
    }

    /// Remove the first row whose `column` equals `value`.
    pub async fn delete<V>(&self, column: E::Column, value: V) -> RepositoryResult<()>
    where
        V: Into<Value> + Display,
    {
        let action = "delete the instance";
        let shown = value.to_string();
        let txn = self.begin(action).await?;
        let outcome = async {
            let model = require_one::<E, _>(&txn, column, value.into(), &shown, action).await?;
            E::delete_many()
                .filter(E::ID.eq(E::id_of(&model)))
                .exec(&txn)
                .await
                .map_err(store::<E>(action))?;
            Ok(())
        }
        .await;
        self.settle(txn, action, outcome).await?;

        info!("Deleted the instance of {} model with {}={}", E::NAME, column.as_str(), shown);
        Ok(())
    }

    /// Remove every row, returning how many were removed.
    pub async fn delete_all(&self) -> RepositoryResult<u64> {
        let action = "delete all records";
        let txn = self.begin(action).await?;
        let outcome = E::delete_many().exec(&txn).await.map_err(store::<E>(action));
        let result = self.settle(txn, action, outcome).await?;

        info!("Deleted all {} instances of {} model", result.rows_affected, E::NAME);
        Ok(result.rows_affected)
    }

    /// Resolve a named association of the row whose `column` equals `value`.
    pub async fn get_relationship<V, L>(
        &self,
        column: E::Column,
        value: V,
        link: L,
    ) -> RepositoryResult<Relationship<<L::ToEntity as EntityTrait>::Model>>
    where
        V: Into<Value> + Display,
        L: Association<FromEntity = E>,
        L::ToEntity: Record,
    {
        let action = format!("retrieve relationship {}", L::NAME);
        let shown = value.to_string();
        let txn = self.begin(&action).await?;
        let outcome = async {
            let model = require_one::<E, _>(&txn, column, value.into(), &shown, &action).await?;
            model
                .find_linked(link)
                .order_by_asc(<L::ToEntity as Record>::ID)
                .all(&txn)
                .await
                .map_err(store::<E>(&action))
        }
        .await;
        let related = self.settle(txn, &action, outcome).await?;

        let relationship = match L::CARDINALITY {
            Cardinality::Many => Relationship::Many(related),
            Cardinality::One => related.into_iter().next().map_or(Relationship::Absent, Relationship::One),
        };
        match &relationship {
            Relationship::Absent => info!("No {} found for {} instance with {}={}", L::NAME, E::NAME, column.as_str(), shown),
            _ => info!("Retrieved {} for {} instance with {}={}", L::NAME, E::NAME, column.as_str(), shown),
        }
        Ok(relationship)
    }

    /// Run an arbitrary query against the session and return its rows.
    pub async fn execute_query<S>(&self, query: &S) -> RepositoryResult<Vec<QueryResult>>
    where
        S: StatementBuilder,
    {
        let action = "execute SQL query";
        let txn = self.begin(action).await?;
        let statement = txn.get_database_backend().build(query);
        let outcome = txn.query_all(statement).await.map_err(store::<E>(action));
        let rows = self.settle(txn, action, outcome).await?;
        info!("Executed SQL query successfully");
        Ok(rows)
    }

    /// Run a raw SQL string against the session and return its rows.
    pub async fn execute_sql(&self, sql: &str) -> RepositoryResult<Vec<QueryResult>> {
        let action = "execute SQL query";
        let txn = self.begin(action).await?;
        let statement = Statement::from_string(txn.get_database_backend(), sql.to_owned());
        let outcome = txn.query_all(statement).await.map_err(store::<E>(action));
        let rows = self.settle(txn, action, outcome).await?;
        info!("Executed SQL query successfully");
        Ok(rows)
    }

    async fn begin(&self, action: &str) -> RepositoryResult<DatabaseTransaction> {
        let conn = self.session.connection().inspect_err(|err| error!("{}", err))?;
        conn.begin().await.map_err(|err| {
            let err = RepositoryError::from_db(E::NAME, action, err);
            error!("{}", err);
            err
        })
    }

    /// Commit on success; otherwise roll back, log, and hand the error back.
    async fn settle<T>(&self, txn: DatabaseTransaction, action: &str, outcome: RepositoryResult<T>) -> RepositoryResult<T> {
        match outcome {
            Ok(value) => match txn.commit().await {
                Ok(()) => Ok(value),
                Err(err) => {
                    let err = RepositoryError::from_db(E::NAME, action, err);
                    error!("{}", err);
                    Err(err)
                }
            },
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!("Rollback failed for {} model: {}", E::NAME, rollback_err);
                }
                error!("{}", err);
                Err(err)
            }
        }
    }
}

fn store<E: Record>(action: &str) -> impl FnOnce(DbErr) -> RepositoryError + '_ {
    move |err| RepositoryError::from_db(E::NAME, action, err)
}

async fn find_first<E, C>(conn: &C, column: E::Column, value: Value, action: &str) -> RepositoryResult<Option<E::Model>>
where
    E: Record,
    C: ConnectionTrait,
{
    E::find()
        .filter(column.eq(value))
        .order_by_asc(E::ID)
        .one(conn)
        .await
        .map_err(store::<E>(action))
}

async fn require_one<E, C>(
    conn: &C,
    column: E::Column,
    value: Value,
    shown: &str,
    action: &str,
) -> RepositoryResult<E::Model>
where
    E: Record,
    C: ConnectionTrait,
{
    find_first::<E, C>(conn, column, value, action)
        .await?
        .ok_or_else(|| RepositoryError::not_found(E::NAME, column.as_str(), shown))
}
