use async_trait::async_trait;
use igce_core::{
    models::{Database, UserContext},
    AppError, SecurityManager,
};
use sqlx::{PgPool, Postgres};

/// Grants that give access to every database
const BLANKET_PERMISSIONS: [&str; 2] = ["all_database_access", "all_datasource_access"];

/// Permission model backed by `user_permissions` and `user_schema_access`.
///
/// Users holding the admin role have blanket access without any stored grant.
#[derive(Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SecurityManager for PermissionRepository {
    #[tracing::instrument(
        skip(self, user, database),
        fields(db.table = "user_permissions", db.operation = "select", user_id = %user.user_id, database_id = database.id)
    )]
    async fn can_access_database(
        &self,
        user: &UserContext,
        database: &Database,
    ) -> Result<bool, AppError> {
        if user.is_admin() {
            return Ok(true);
        }

        let granted = sqlx::query_scalar::<Postgres, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM user_permissions
                WHERE user_id = $1
                  AND (permission = ANY($2) OR (permission = 'database_access' AND database_id = $3))
            )
            "#,
        )
        .bind(user.user_id)
        .bind(&BLANKET_PERMISSIONS[..])
        .bind(database.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(granted)
    }

    #[tracing::instrument(
        skip(self, user, database, schemas),
        fields(db.table = "user_schema_access", db.operation = "select", user_id = %user.user_id, database_id = database.id)
    )]
    async fn schemas_accessible_by_user(
        &self,
        user: &UserContext,
        database: &Database,
        schemas: &[String],
    ) -> Result<Vec<String>, AppError> {
        if schemas.is_empty() {
            return Ok(Vec::new());
        }
        if self.can_access_database(user, database).await? {
            return Ok(schemas.to_vec());
        }

        let granted = sqlx::query_scalar::<Postgres, String>(
            r#"
            SELECT schema_name FROM user_schema_access
            WHERE user_id = $1 AND database_id = $2 AND schema_name = ANY($3)
            "#,
        )
        .bind(user.user_id)
        .bind(database.id)
        .bind(schemas)
        .fetch_all(&self.pool)
        .await?;

        // Keep the caller's order
        Ok(schemas
            .iter()
            .filter(|s| granted.contains(s))
            .cloned()
            .collect())
    }
}
