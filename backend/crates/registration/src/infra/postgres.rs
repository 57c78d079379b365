//! PostgreSQL Repository Implementation

use crate::domain::entities::TenantRegistration;
use crate::domain::repository::TenantRegistrationRepository;
use crate::error::RegistrationResult;
use sqlx::PgPool;

/// PostgreSQL-backed registration store (`authorized_tenants` table)
#[derive(Clone)]
pub struct PgTenantRepository {
    pool: PgPool,
}

impl PgTenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TenantRegistrationRepository for PgTenantRepository {
    async fn upsert(
        &self,
        did: &str,
        terms_of_service_hash: Option<&str>,
        pow_time_ms: Option<i64>,
    ) -> RegistrationResult<()> {
        sqlx::query(
            r#"
            INSERT INTO authorized_tenants (did, terms_of_service_hash, pow_time)
            VALUES ($1, $2, $3)
            ON CONFLICT (did) DO UPDATE SET
                terms_of_service_hash = COALESCE(EXCLUDED.terms_of_service_hash, authorized_tenants.terms_of_service_hash),
                pow_time = COALESCE(EXCLUDED.pow_time, authorized_tenants.pow_time)
            "#,
        )
        .bind(did)
        .bind(terms_of_service_hash)
        .bind(pow_time_ms)
        .execute(&self.pool)
        .await?;

        tracing::debug!(did = %did, "Tenant registration upserted");

        Ok(())
    }

    async fn get(&self, did: &str) -> RegistrationResult<Option<TenantRegistration>> {
        let row = sqlx::query_as::<_, TenantRow>(
            r#"
            SELECT did, terms_of_service_hash, pow_time
            FROM authorized_tenants
            WHERE did = $1
            "#,
        )
        .bind(did)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TenantRow::into_registration))
    }
}

// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct TenantRow {
    did: String,
    terms_of_service_hash: Option<String>,
    pow_time: Option<i64>,
}

impl TenantRow {
    fn into_registration(self) -> TenantRegistration {
        TenantRegistration {
            did: self.did,
            terms_of_service_hash: self.terms_of_service_hash,
            pow_time_ms: self.pow_time,
        }
    }
}
