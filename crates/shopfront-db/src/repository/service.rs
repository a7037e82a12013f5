//! # Service Repository
//!
//! Database operations for services. Services have no stock, so the
//! coordinator never touches this table.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{category_filter, like_pattern};
use shopfront_core::{Service, ServiceFields};

const SELECT_SERVICE: &str = "SELECT id, name, category, price, description, created_at FROM services";

/// Repository for service database operations.
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    pool: SqlitePool,
}

impl ServiceRepository {
    /// Creates a new ServiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ServiceRepository { pool }
    }

    /// Lists every service, sorted by name.
    pub async fn list_all(&self) -> DbResult<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(&format!("{} ORDER BY name, id", SELECT_SERVICE))
            .fetch_all(&self.pool)
            .await?;

        Ok(services)
    }

    /// Gets a service by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Service> {
        sqlx::query_as::<_, Service>(&format!("{} WHERE id = ?1", SELECT_SERVICE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Service", id))
    }

    /// Inserts a new service and returns its id.
    pub async fn add(&self, fields: &ServiceFields) -> DbResult<i64> {
        debug!(name = %fields.name, "Adding service");

        let result = sqlx::query(
            r#"
            INSERT INTO services (name, category, price, description)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(fields.name.trim())
        .bind(fields.category.as_deref())
        .bind(fields.price)
        .bind(fields.description.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Overwrites every editable field of a service.
    pub async fn update(&self, id: i64, fields: &ServiceFields) -> DbResult<()> {
        debug!(id, "Updating service");

        let result = sqlx::query(
            r#"
            UPDATE services SET
                name = ?2,
                category = ?3,
                price = ?4,
                description = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(fields.name.trim())
        .bind(fields.category.as_deref())
        .bind(fields.price)
        .bind(fields.description.as_deref())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", id));
        }

        Ok(())
    }

    /// Deletes a service.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting service");

        let result = sqlx::query("DELETE FROM services WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", id));
        }

        Ok(())
    }

    /// Searches by name substring; `None` or `"All"` means any category.
    pub async fn search(&self, term: &str, category: Option<&str>) -> DbResult<Vec<Service>> {
        let category = category_filter(category);
        debug!(term = %term.trim(), category = ?category, "Searching services");

        let services = sqlx::query_as::<_, Service>(&format!(
            "{} WHERE name LIKE ?1 ESCAPE '\\' AND (?2 IS NULL OR category = ?2) ORDER BY name, id",
            SELECT_SERVICE
        ))
        .bind(like_pattern(term))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    /// Distinct non-empty categories, sorted.
    pub async fn list_categories(&self) -> DbResult<Vec<String>> {
        let categories: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT category FROM services
            WHERE category IS NOT NULL AND TRIM(category) <> ''
            ORDER BY category
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Counts services (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM services")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use shopfront_core::Money;

    fn fields(name: &str, category: Option<&str>, pesos: i64) -> ServiceFields {
        ServiceFields {
            name: name.to_string(),
            category: category.map(str::to_string),
            price: Money::from_major_minor(pesos, 0),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_service_crud() {
        let repo = Database::new(DbConfig::in_memory()).await.unwrap().services();

        let id = repo
            .add(&ServiceFields {
                description: Some("Windows reinstall, drivers included".to_string()),
                ..fields("Reformat", Some("Software"), 350)
            })
            .await
            .unwrap();
        let service = repo.get_by_id(id).await.unwrap();
        assert_eq!(service.price, Money::from_cents(35000));
        assert!(service.description.is_some());

        repo.update(id, &fields("Reformat + Backup", Some("Software"), 500))
            .await
            .unwrap();
        assert_eq!(repo.get_by_id(id).await.unwrap().name, "Reformat + Backup");

        repo.delete(id).await.unwrap();
        assert!(matches!(repo.get_by_id(id).await, Err(DbError::NotFound { .. })));
        assert!(matches!(repo.delete(id).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_service_search_and_categories() {
        let repo = Database::new(DbConfig::in_memory()).await.unwrap().services();
        repo.add(&fields("Reformat", Some("Software"), 350)).await.unwrap();
        repo.add(&fields("Virus Removal", Some("Software"), 300)).await.unwrap();
        repo.add(&fields("Screen Repair", Some("Hardware"), 1500)).await.unwrap();

        assert_eq!(repo.search("re", None).await.unwrap().len(), 3);
        assert_eq!(repo.search("REMOV", None).await.unwrap().len(), 1);
        assert_eq!(repo.search("", Some("Software")).await.unwrap().len(), 2);
        assert_eq!(repo.search("repair", Some("All")).await.unwrap().len(), 1);
        assert_eq!(repo.list_categories().await.unwrap(), vec!["Hardware", "Software"]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }
}
