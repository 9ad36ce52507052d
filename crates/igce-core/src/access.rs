//! Upload permission checks
//!
//! The security manager owns the actual permission model; this module only asks it two
//! questions (blanket database access, reachable schemas) and combines the answers with the
//! database's own allow-list.

use async_trait::async_trait;

use crate::catalog::DatabaseCatalog;
use crate::error::AppError;
use crate::models::{Database, UserContext};

/// Capability interface to the security manager
#[async_trait]
pub trait SecurityManager: Send + Sync {
    /// Whether the user may access every schema of `database`
    async fn can_access_database(
        &self,
        user: &UserContext,
        database: &Database,
    ) -> Result<bool, AppError>;

    /// Subset of `schemas` the user may reach in `database`
    async fn schemas_accessible_by_user(
        &self,
        user: &UserContext,
        database: &Database,
        schemas: &[String],
    ) -> Result<Vec<String>, AppError>;
}

/// IGCE upload permission.
///
/// * blanket access to the database: allowed
/// * otherwise, the database lists schemas for CSV upload and the user reaches at least
///   one of them: allowed
/// * otherwise: denied
pub async fn igce_schema_upload_allowed(
    security: &dyn SecurityManager,
    user: &UserContext,
    database: &Database,
) -> Result<bool, AppError> {
    if security.can_access_database(user, database).await? {
        return Ok(true);
    }
    let schemas = database.schema_access_for_csv_upload();
    if !schemas.is_empty()
        && !security
            .schemas_accessible_by_user(user, database, schemas)
            .await?
            .is_empty()
    {
        return Ok(true);
    }
    Ok(false)
}

/// Pricing-history upload permission.
///
/// Same checks as [`igce_schema_upload_allowed`], but the fall-through branch allows the
/// upload. The pricing-history form has always behaved this way; it is almost certainly a
/// copy-paste slip, so it stays a separate predicate until product owners confirm which
/// behaviour they want.
// TODO: switch the fall-through to `false` once the pricing-history permission rule is confirmed.
pub async fn pricing_history_schema_upload_allowed(
    security: &dyn SecurityManager,
    user: &UserContext,
    database: &Database,
) -> Result<bool, AppError> {
    if security.can_access_database(user, database).await? {
        return Ok(true);
    }
    let schemas = database.schema_access_for_csv_upload();
    if !schemas.is_empty()
        && !security
            .schemas_accessible_by_user(user, database, schemas)
            .await?
            .is_empty()
    {
        return Ok(true);
    }
    Ok(true)
}

/// Which schema predicate a form uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaPolicy {
    Igce,
    PricingHistory,
}

impl SchemaPolicy {
    pub async fn upload_allowed(
        &self,
        security: &dyn SecurityManager,
        user: &UserContext,
        database: &Database,
    ) -> Result<bool, AppError> {
        match self {
            SchemaPolicy::Igce => igce_schema_upload_allowed(security, user, database).await,
            SchemaPolicy::PricingHistory => {
                pricing_history_schema_upload_allowed(security, user, database).await
            }
        }
    }
}

/// Databases accepting CSV uploads that `user` may upload into under `policy`
pub async fn csv_allowed_dbs(
    catalog: &dyn DatabaseCatalog,
    security: &dyn SecurityManager,
    user: &UserContext,
    policy: SchemaPolicy,
) -> Result<Vec<Database>, AppError> {
    let mut allowed = Vec::new();
    for database in catalog.csv_enabled_databases().await? {
        if policy.upload_allowed(security, user, &database).await? {
            allowed.push(database);
        }
    }
    Ok(allowed)
}

/// Whether `schema` may receive an upload from `user`.
///
/// No schema, or a database without a schema allow-list, defers entirely to the database
/// level check.
pub async fn is_schema_allowed(
    security: &dyn SecurityManager,
    user: &UserContext,
    database: &Database,
    schema: Option<&str>,
) -> Result<bool, AppError> {
    let Some(schema) = schema else {
        return Ok(true);
    };
    let allowed = database.schema_access_for_csv_upload();
    if allowed.is_empty() {
        return Ok(true);
    }
    if !allowed.iter().any(|s| s == schema) {
        return Ok(false);
    }
    let reachable = security
        .schemas_accessible_by_user(user, database, &[schema.to_string()])
        .await?;
    Ok(reachable.iter().any(|s| s == schema))
}
