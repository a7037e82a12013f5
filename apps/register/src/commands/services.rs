//! # Service Commands
//!
//! Catalog management for repair and software services. Services have no
//! stock, so there is nothing to restock or report as low.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::inventory::non_blank;
use crate::error::ApiError;
use shopfront_core::validation::{
    parse_price, validate_search_query, validate_service_fields, ValidationResult,
};
use shopfront_core::{Service, ServiceFields};
use shopfront_db::Database;

/// Service fields as typed by the operator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceForm {
    pub name: String,
    pub category: Option<String>,
    pub price: String,
    pub description: Option<String>,
}

impl ServiceForm {
    pub fn into_fields(self) -> ValidationResult<ServiceFields> {
        let fields = ServiceFields {
            name: self.name.trim().to_string(),
            category: non_blank(self.category),
            price: parse_price(&self.price)?,
            description: non_blank(self.description),
        };
        validate_service_fields(&fields)?;
        Ok(fields)
    }
}

pub async fn list_services(db: &Database) -> Result<Vec<Service>, ApiError> {
    debug!("list_services command");
    Ok(db.services().list_all().await?)
}

pub async fn get_service(db: &Database, id: i64) -> Result<Service, ApiError> {
    Ok(db.services().get_by_id(id).await?)
}

pub async fn search_services(
    db: &Database,
    query: &str,
    category: Option<&str>,
) -> Result<Vec<Service>, ApiError> {
    let query = validate_search_query(query)?;
    debug!(query = %query, category = ?category, "search_services command");
    Ok(db.services().search(&query, category).await?)
}

pub async fn list_service_categories(db: &Database) -> Result<Vec<String>, ApiError> {
    Ok(db.services().list_categories().await?)
}

pub async fn add_service(db: &Database, form: ServiceForm) -> Result<Service, ApiError> {
    let fields = form.into_fields()?;
    let id = db.services().add(&fields).await?;
    info!(id = %id, name = %fields.name, "Service added");
    Ok(db.services().get_by_id(id).await?)
}

pub async fn update_service(db: &Database, id: i64, form: ServiceForm) -> Result<Service, ApiError> {
    let fields = form.into_fields()?;
    db.services().update(id, &fields).await?;
    info!(id = %id, "Service updated");
    Ok(db.services().get_by_id(id).await?)
}

pub async fn delete_service(db: &Database, id: i64) -> Result<(), ApiError> {
    db.services().delete(id).await?;
    info!(id = %id, "Service deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use shopfront_core::Money;
    use shopfront_db::DbConfig;

    fn reformat() -> ServiceForm {
        ServiceForm {
            name: "Reformat".into(),
            category: Some("Software".into()),
            price: "350".into(),
            description: Some("".into()),
        }
    }

    #[tokio::test]
    async fn test_add_update_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let service = add_service(&db, reformat()).await.unwrap();
        assert_eq!(service.price, Money::from_major_minor(350, 0));
        assert_eq!(service.description, None);

        let mut form = reformat();
        form.price = "400.50".into();
        let updated = update_service(&db, service.id, form).await.unwrap();
        assert_eq!(updated.price, Money::from_major_minor(400, 50));

        assert_eq!(search_services(&db, "refor", None).await.unwrap().len(), 1);
        assert_eq!(list_service_categories(&db).await.unwrap(), vec!["Software"]);

        delete_service(&db, service.id).await.unwrap();
        let err = get_service(&db, service.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_rejects_blank_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut form = reformat();
        form.name = "   ".into();

        let err = add_service(&db, form).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(list_services(&db).await.unwrap().is_empty());
    }
}
