//! `PostgreSQL` adapter for directory persistence.

mod schema;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use uuid::Uuid;

use crate::directory::domain::{
    Agent, AgentGroup, DirectoryStatus, PermissionSet, PersistedAgentData, PersistedAgentGroupData,
    PersistedSessionTypeData, PersistedUserData, SessionType, User,
};
use crate::directory::ports::{
    AgentGroupRepository, AgentRepository, DirectoryError, DirectoryResult, SessionTypeRepository,
    UserRepository,
};
use crate::ids::{AgentGroupId, AgentId, SessionTypeId, UserId};

/// `PostgreSQL` connection pool type, shared with other adapters that point
/// at the same database.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;
type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed directory repository implementing every directory port.
#[derive(Clone)]
pub struct PostgresDirectory {
    pool: PgPool,
}

impl PostgresDirectory {
    /// Creates a directory adapter backed by the given connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn get_conn(pool: &PgPool) -> DirectoryResult<PooledConn> {
    pool.get().map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))
}

async fn run_blocking<F, T>(f: F) -> DirectoryResult<T>
where
    F: FnOnce() -> DirectoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?
}

#[async_trait]
impl UserRepository for PostgresDirectory {
    async fn store(&self, user: &User) -> DirectoryResult<()> {
        use schema::directory_users::dsl;
        let pool = self.pool.clone();
        let (id, display_name, created_at) =
            (user.id().into_inner(), user.display_name().map(str::to_owned), user.created_at());
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            diesel::insert_into(dsl::directory_users)
                .values((
                    dsl::id.eq(id),
                    dsl::display_name.eq(display_name),
                    dsl::created_at.eq(created_at),
                    dsl::deleted_at.eq(Option::<chrono::DateTime<chrono::Utc>>::None),
                ))
                .execute(&mut conn)
                .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, user: &User) -> DirectoryResult<()> {
        use schema::directory_users::dsl;
        let pool = self.pool.clone();
        let id = user.id().into_inner();
        let display_name = user.display_name().map(str::to_owned);
        let deleted_at = user.deleted_at();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let updated = diesel::update(dsl::directory_users.filter(dsl::id.eq(id)))
                .set((dsl::display_name.eq(display_name), dsl::deleted_at.eq(deleted_at)))
                .execute(&mut conn)
                .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
            if updated == 0 {
                return Err(DirectoryError::NotFound);
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> DirectoryResult<Option<User>> {
        use schema::directory_users::dsl;
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let row: Option<(Uuid, Option<String>, chrono::DateTime<chrono::Utc>, Option<chrono::DateTime<chrono::Utc>>)> =
                dsl::directory_users
                    .filter(dsl::id.eq(id.into_inner()))
                    .select((dsl::id, dsl::display_name, dsl::created_at, dsl::deleted_at))
                    .first(&mut conn)
                    .optional()
                    .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
            Ok(row.map(|(_, display_name, created_at, deleted_at)| {
                User::from_persisted(PersistedUserData { id, display_name, created_at, deleted_at })
            }))
        })
        .await
    }

    async fn list_all(&self) -> DirectoryResult<Vec<User>> {
        use schema::directory_users::dsl;
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let rows: Vec<(Uuid, Option<String>, chrono::DateTime<chrono::Utc>, Option<chrono::DateTime<chrono::Utc>>)> =
                dsl::directory_users
                    .filter(dsl::deleted_at.is_null())
                    .select((dsl::id, dsl::display_name, dsl::created_at, dsl::deleted_at))
                    .load(&mut conn)
                    .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
            Ok(rows
                .into_iter()
                .map(|(id, display_name, created_at, deleted_at)| {
                    User::from_persisted(PersistedUserData {
                        id: UserId::from_uuid(id),
                        display_name,
                        created_at,
                        deleted_at,
                    })
                })
                .collect())
        })
        .await
    }
}

#[async_trait]
impl AgentRepository for PostgresDirectory {
    async fn store(&self, agent: &Agent) -> DirectoryResult<()> {
        use schema::directory_agents::dsl;
        let pool = self.pool.clone();
        let values = agent_row_values(agent);
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            diesel::insert_into(dsl::directory_agents)
                .values(values)
                .execute(&mut conn)
                .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, agent: &Agent) -> DirectoryResult<()> {
        use schema::directory_agents::dsl;
        let pool = self.pool.clone();
        let id = agent.id().into_inner();
        let name = agent.name().to_owned();
        let permissions = agent.permissions().as_str().to_owned();
        let status = agent.status().as_str().to_owned();
        let group_id = agent.group_id().map(AgentGroupId::into_inner);
        let updated_at = agent.updated_at();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let updated = diesel::update(dsl::directory_agents.filter(dsl::id.eq(id)))
                .set((
                    dsl::name.eq(name),
                    dsl::permissions.eq(permissions),
                    dsl::status.eq(status),
                    dsl::group_id.eq(group_id),
                    dsl::updated_at.eq(updated_at),
                ))
                .execute(&mut conn)
                .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
            if updated == 0 {
                return Err(DirectoryError::NotFound);
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: AgentId) -> DirectoryResult<Option<Agent>> {
        use schema::directory_agents::dsl;
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let row: Option<AgentRowTuple> = dsl::directory_agents
                .filter(dsl::id.eq(id.into_inner()))
                .select((
                    dsl::id,
                    dsl::name,
                    dsl::permissions,
                    dsl::status,
                    dsl::is_guest,
                    dsl::group_id,
                    dsl::created_at,
                    dsl::updated_at,
                ))
                .first(&mut conn)
                .optional()
                .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
            row.map(decode_agent_row).transpose()
        })
        .await
    }

    async fn list_all(&self) -> DirectoryResult<Vec<Agent>> {
        use schema::directory_agents::dsl;
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let rows: Vec<AgentRowTuple> = dsl::directory_agents
                .select((
                    dsl::id,
                    dsl::name,
                    dsl::permissions,
                    dsl::status,
                    dsl::is_guest,
                    dsl::group_id,
                    dsl::created_at,
                    dsl::updated_at,
                ))
                .load(&mut conn)
                .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
            rows.into_iter().map(decode_agent_row).collect()
        })
        .await
    }
}

type AgentRowTuple = (
    Uuid,
    String,
    String,
    String,
    bool,
    Option<Uuid>,
    chrono::DateTime<chrono::Utc>,
    chrono::DateTime<chrono::Utc>,
);

#[expect(clippy::type_complexity, reason = "mirrors the row tuple this values-list feeds")]
fn agent_row_values(
    agent: &Agent,
) -> (
    diesel::dsl::Eq<schema::directory_agents::id, Uuid>,
    diesel::dsl::Eq<schema::directory_agents::name, String>,
    diesel::dsl::Eq<schema::directory_agents::permissions, String>,
    diesel::dsl::Eq<schema::directory_agents::status, String>,
    diesel::dsl::Eq<schema::directory_agents::is_guest, bool>,
    diesel::dsl::Eq<schema::directory_agents::group_id, Option<Uuid>>,
    diesel::dsl::Eq<schema::directory_agents::created_at, chrono::DateTime<chrono::Utc>>,
    diesel::dsl::Eq<schema::directory_agents::updated_at, chrono::DateTime<chrono::Utc>>,
) {
    use schema::directory_agents::dsl;
    (
        dsl::id.eq(agent.id().into_inner()),
        dsl::name.eq(agent.name().to_owned()),
        dsl::permissions.eq(agent.permissions().as_str()),
        dsl::status.eq(agent.status().as_str().to_owned()),
        dsl::is_guest.eq(agent.is_guest()),
        dsl::group_id.eq(agent.group_id().map(AgentGroupId::into_inner)),
        dsl::created_at.eq(agent.created_at()),
        dsl::updated_at.eq(agent.updated_at()),
    )
}

fn decode_agent_row(row: AgentRowTuple) -> DirectoryResult<Agent> {
    let (id, name, permissions, status, is_guest, group_id, created_at, updated_at) = row;
    let permissions = PermissionSet::try_from(permissions.as_str())
        .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
    let status = DirectoryStatus::try_from(status.as_str())
        .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
    Ok(Agent::from_persisted(PersistedAgentData {
        id: AgentId::from_uuid(id),
        name,
        permissions,
        status,
        is_guest,
        group_id: group_id.map(AgentGroupId::from_uuid),
        created_at,
        updated_at,
    }))
}

#[async_trait]
impl AgentGroupRepository for PostgresDirectory {
    async fn store(&self, group: &AgentGroup) -> DirectoryResult<()> {
        use schema::agent_groups::dsl;
        let pool = self.pool.clone();
        let (id, name) = (group.id().into_inner(), group.name().to_owned());
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            diesel::insert_into(dsl::agent_groups)
                .values((dsl::id.eq(id), dsl::name.eq(name)))
                .execute(&mut conn)
                .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, group: &AgentGroup) -> DirectoryResult<()> {
        use schema::agent_groups::dsl;
        let pool = self.pool.clone();
        let (id, name) = (group.id().into_inner(), group.name().to_owned());
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let updated = diesel::update(dsl::agent_groups.filter(dsl::id.eq(id)))
                .set(dsl::name.eq(name))
                .execute(&mut conn)
                .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
            if updated == 0 {
                return Err(DirectoryError::NotFound);
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: AgentGroupId) -> DirectoryResult<Option<AgentGroup>> {
        use schema::agent_groups::dsl;
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let name: Option<String> = dsl::agent_groups
                .filter(dsl::id.eq(id.into_inner()))
                .select(dsl::name)
                .first(&mut conn)
                .optional()
                .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
            Ok(name.map(|name| AgentGroup::from_persisted(PersistedAgentGroupData { id, name })))
        })
        .await
    }

    async fn list_all(&self) -> DirectoryResult<Vec<AgentGroup>> {
        use schema::agent_groups::dsl;
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let rows: Vec<(Uuid, String)> = dsl::agent_groups
                .select((dsl::id, dsl::name))
                .load(&mut conn)
                .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
            Ok(rows
                .into_iter()
                .map(|(id, name)| {
                    AgentGroup::from_persisted(PersistedAgentGroupData {
                        id: AgentGroupId::from_uuid(id),
                        name,
                    })
                })
                .collect())
        })
        .await
    }

    async fn delete(&self, id: AgentGroupId) -> DirectoryResult<()> {
        use schema::agent_groups::dsl;
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let affected = diesel::delete(dsl::agent_groups.filter(dsl::id.eq(id.into_inner())))
                .execute(&mut conn)
                .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
            if affected == 0 {
                return Err(DirectoryError::NotFound);
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl SessionTypeRepository for PostgresDirectory {
    async fn store(&self, session_type: &SessionType) -> DirectoryResult<()> {
        use schema::session_types::dsl;
        let pool = self.pool.clone();
        let id = session_type.id().into_inner();
        let name = session_type.name().to_owned();
        let allowed_group_ids = serde_json::to_value(
            session_type.allowed_group_ids().iter().map(|id| id.into_inner()).collect::<Vec<_>>(),
        )
        .unwrap_or_else(|_| serde_json::json!([]));
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            diesel::insert_into(dsl::session_types)
                .values((
                    dsl::id.eq(id),
                    dsl::name.eq(name),
                    dsl::allowed_group_ids.eq(allowed_group_ids),
                ))
                .execute(&mut conn)
                .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, session_type: &SessionType) -> DirectoryResult<()> {
        use schema::session_types::dsl;
        let pool = self.pool.clone();
        let id = session_type.id().into_inner();
        let name = session_type.name().to_owned();
        let allowed_group_ids = serde_json::to_value(
            session_type.allowed_group_ids().iter().map(|id| id.into_inner()).collect::<Vec<_>>(),
        )
        .unwrap_or_else(|_| serde_json::json!([]));
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let updated = diesel::update(dsl::session_types.filter(dsl::id.eq(id)))
                .set((dsl::name.eq(name), dsl::allowed_group_ids.eq(allowed_group_ids)))
                .execute(&mut conn)
                .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
            if updated == 0 {
                return Err(DirectoryError::NotFound);
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: SessionTypeId) -> DirectoryResult<Option<SessionType>> {
        use schema::session_types::dsl;
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let row: Option<(String, serde_json::Value)> = dsl::session_types
                .filter(dsl::id.eq(id.into_inner()))
                .select((dsl::name, dsl::allowed_group_ids))
                .first(&mut conn)
                .optional()
                .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
            Ok(row.map(|(name, allowed_group_ids)| decode_session_type(id, name, allowed_group_ids)))
        })
        .await
    }

    async fn list_all(&self) -> DirectoryResult<Vec<SessionType>> {
        use schema::session_types::dsl;
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let rows: Vec<(Uuid, String, serde_json::Value)> = dsl::session_types
                .select((dsl::id, dsl::name, dsl::allowed_group_ids))
                .load(&mut conn)
                .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
            Ok(rows
                .into_iter()
                .map(|(id, name, allowed_group_ids)| {
                    decode_session_type(SessionTypeId::from_uuid(id), name, allowed_group_ids)
                })
                .collect())
        })
        .await
    }

    async fn delete(&self, id: SessionTypeId) -> DirectoryResult<()> {
        use schema::session_types::dsl;
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let affected = diesel::delete(dsl::session_types.filter(dsl::id.eq(id.into_inner())))
                .execute(&mut conn)
                .map_err(|e| DirectoryError::persistence(std::io::Error::other(e.to_string())))?;
            if affected == 0 {
                return Err(DirectoryError::NotFound);
            }
            Ok(())
        })
        .await
    }
}

fn decode_session_type(
    id: SessionTypeId,
    name: String,
    allowed_group_ids: serde_json::Value,
) -> SessionType {
    let allowed: Vec<Uuid> = serde_json::from_value(allowed_group_ids).unwrap_or_default();
    SessionType::from_persisted(PersistedSessionTypeData {
        id,
        name,
        allowed_group_ids: allowed.into_iter().map(AgentGroupId::from_uuid).collect(),
    })
}
