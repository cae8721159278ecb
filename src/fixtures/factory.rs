//! Fixture factory producing persisted rows with random, valid content.

use std::sync::{Arc, Mutex, PoisonError};

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sea_orm::{ActiveModelTrait, ActiveValue, IntoActiveModel, Value};
use serde::Serialize;

use super::{fake, FixtureError, FixtureResult};
use crate::constants::{FIXTURE_PASSWORD_LEN, TASK_DESCRIPTION_MAX_LEN, TASK_TITLE_MAX_LEN};
use crate::entities::enums::{PriorityName, RoleName, StatusName};
use crate::entities::{priority, role, status, task, user};
use crate::repositories::{
    BaseRepository, PriorityRepository, Record, RoleRepository, StatusRepository, TaskRepository, UserRepository,
};
use crate::storage::Session;

/// Creates fixture rows through the repositories of a borrowed [`Session`].
///
/// Every `create_*` method takes a partial active model. Fields that are
/// already set are persisted as given; everything left `NotSet` is generated,
/// and foreign keys are filled by sampling an existing parent row. Start
/// overrides from `ActiveModelTrait::default()` rather than
/// `ActiveModel::default()`, which applies the entity's own defaults.
pub struct FixtureFactory<'s> {
    session: &'s Session,
    rng: Arc<Mutex<StdRng>>,
}

impl<'s> FixtureFactory<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self {
            session,
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    /// Factory whose generated values are reproducible for a given seed.
    pub fn with_seed(session: &'s Session, seed: u64) -> Self {
        Self {
            session,
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    /// Factory drawing from an RNG shared with other factories, so successive
    /// factories continue one value stream instead of restarting it.
    pub fn with_shared_rng(session: &'s Session, rng: Arc<Mutex<StdRng>>) -> Self {
        Self { session, rng }
    }

    pub fn session(&self) -> &'s Session {
        self.session
    }

    pub async fn create_role(&self, mut role: role::ActiveModel) -> FixtureResult<role::Model> {
        if role.creator_id.is_not_set() {
            role.creator_id = ActiveValue::Set(self.random_id::<user::Entity>().await?);
        }
        self.with_rng(|rng| {
            fill(&mut role.role_name, || fake::choose(rng, RoleName::ALL).to_string());
        });
        fill(&mut role.permissions, || fake::role_permissions().to_json());
        fill(&mut role.created_at, fake::now);

        let role = RoleRepository::new(self.session).create_role(role).await?;
        info!("Created Role: {:?}", role);
        Ok(role)
    }

    pub async fn create_roles(&self, count: usize) -> FixtureResult<Vec<role::Model>> {
        let mut roles = Vec::with_capacity(count);
        for _ in 0..count {
            roles.push(self.create_role(ActiveModelTrait::default()).await?);
        }
        info!("Created {} roles using FixtureFactory", count);
        Ok(roles)
    }

    pub async fn create_user(&self, mut user: user::ActiveModel) -> FixtureResult<user::Model> {
        if user.role_id.is_not_set() {
            user.role_id = ActiveValue::Set(Some(self.random_id::<role::Entity>().await?));
        }
        if user.hashed_password.is_not_set() {
            let password = self.with_rng(|rng| fake::password(rng, FIXTURE_PASSWORD_LEN));
            user.hashed_password = ActiveValue::Set(fake::hash_password(&password)?);
        }
        self.with_rng(|rng| {
            let username = match &user.username {
                ActiveValue::Set(name) | ActiveValue::Unchanged(name) => name.clone(),
                ActiveValue::NotSet => fake::username(rng),
            };
            fill(&mut user.username, || username.clone());
            fill(&mut user.email, || fake::email(rng, &username));
            fill(&mut user.full_name, || fake::full_name(rng));
            fill(&mut user.is_active, || rng.gen_bool(0.5));
            fill(&mut user.is_superuser, || rng.gen_bool(0.5));
            fill(&mut user.ipaddress, || Some(fake::ip_address(rng)));
        });
        fill(&mut user.last_login_at, || Some(fake::near_future()));
        fill(&mut user.updated_at, || Some(fake::later_future()));
        fill(&mut user.registered_at, fake::now);

        let user = UserRepository::new(self.session).create_user(user).await?;
        info!("Created User: {:?}", user);
        Ok(user)
    }

    pub async fn create_users(&self, count: usize) -> FixtureResult<Vec<user::Model>> {
        let mut users = Vec::with_capacity(count);
        for _ in 0..count {
            users.push(self.create_user(ActiveModelTrait::default()).await?);
        }
        info!("Created {} users using FixtureFactory", count);
        Ok(users)
    }

    /// An active superuser holding no role; the usual first row of a fixture set.
    pub async fn create_superuser(&self) -> FixtureResult<user::Model> {
        self.create_user(user::ActiveModel {
            role_id: ActiveValue::Set(None),
            is_active: ActiveValue::Set(true),
            is_superuser: ActiveValue::Set(true),
            ..ActiveModelTrait::default()
        })
        .await
    }

    pub async fn create_priority(&self, mut priority: priority::ActiveModel) -> FixtureResult<priority::Model> {
        if priority.creator_id.is_not_set() {
            priority.creator_id = ActiveValue::Set(self.random_id::<user::Entity>().await?);
        }
        self.with_rng(|rng| {
            fill(&mut priority.priority_name, || fake::choose(rng, PriorityName::ALL).to_string());
        });
        fill(&mut priority.created_at, fake::now);

        let priority = PriorityRepository::new(self.session).create_priority(priority).await?;
        info!("Created Priority: {:?}", priority);
        Ok(priority)
    }

    pub async fn create_priorities(&self, count: usize) -> FixtureResult<Vec<priority::Model>> {
        let mut priorities = Vec::with_capacity(count);
        for _ in 0..count {
            priorities.push(self.create_priority(ActiveModelTrait::default()).await?);
        }
        info!("Created {} priorities using FixtureFactory", count);
        Ok(priorities)
    }

    pub async fn create_status(&self, mut status: status::ActiveModel) -> FixtureResult<status::Model> {
        if status.creator_id.is_not_set() {
            status.creator_id = ActiveValue::Set(self.random_id::<user::Entity>().await?);
        }
        self.with_rng(|rng| {
            fill(&mut status.status_name, || fake::choose(rng, StatusName::ALL).to_string());
        });
        fill(&mut status.permissions, || fake::status_permissions().to_json());
        fill(&mut status.created_at, fake::now);

        let status = StatusRepository::new(self.session).create_status(status).await?;
        info!("Created Status: {:?}", status);
        Ok(status)
    }

    pub async fn create_statuses(&self, count: usize) -> FixtureResult<Vec<status::Model>> {
        let mut statuses = Vec::with_capacity(count);
        for _ in 0..count {
            statuses.push(self.create_status(ActiveModelTrait::default()).await?);
        }
        info!("Created {} statuses using FixtureFactory", count);
        Ok(statuses)
    }

    pub async fn create_task(&self, mut task: task::ActiveModel) -> FixtureResult<task::Model> {
        if task.priority_id.is_not_set() {
            task.priority_id = ActiveValue::Set(Some(self.random_id::<priority::Entity>().await?));
        }
        if task.status_id.is_not_set() {
            task.status_id = ActiveValue::Set(self.random_id::<status::Entity>().await?);
        }
        if task.creator_id.is_not_set() {
            task.creator_id = ActiveValue::Set(self.random_id::<user::Entity>().await?);
        }
        if task.assignee_id.is_not_set() {
            task.assignee_id = ActiveValue::Set(Some(self.random_id::<user::Entity>().await?));
        }
        self.with_rng(|rng| {
            fill(&mut task.title, || fake::text(rng, TASK_TITLE_MAX_LEN));
            fill(&mut task.description, || Some(fake::text(rng, TASK_DESCRIPTION_MAX_LEN)));
        });
        fill(&mut task.deadline, || Some(fake::near_future()));
        fill(&mut task.created_at, fake::now);

        let task = TaskRepository::new(self.session).create_task(task).await?;
        info!("Created Task: {:?}", task);
        Ok(task)
    }

    pub async fn create_tasks(&self, count: usize) -> FixtureResult<Vec<task::Model>> {
        let mut tasks = Vec::with_capacity(count);
        for _ in 0..count {
            tasks.push(self.create_task(ActiveModelTrait::default()).await?);
        }
        info!("Created {} tasks using FixtureFactory", count);
        Ok(tasks)
    }

    /// Id of a uniformly sampled existing row of `E`.
    async fn random_id<E>(&self) -> FixtureResult<i32>
    where
        E: Record,
        E::Model: Serialize + IntoActiveModel<E::Active>,
    {
        BaseRepository::<E>::new(self.session)
            .get_random()
            .await?
            .map(|model| E::id_of(&model))
            .ok_or(FixtureError::MissingParent { entity: E::NAME })
    }

    /// Run `f` with the factory RNG. The lock never spans an await point.
    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}

fn fill<V>(slot: &mut ActiveValue<V>, generate: impl FnOnce() -> V)
where
    V: Into<Value>,
{
    if slot.is_not_set() {
        *slot = ActiveValue::Set(generate());
    }
}
