mod common;

use playpicker::{
    domain::{CreatePackageRequest, UpdatePackageRequest},
    error::AppError,
    repository::{PackageRepository, SqlitePackageRepository},
    service::package_service::PackageService,
};
use std::sync::Arc;

fn package(name: &str, price: f64) -> CreatePackageRequest {
    CreatePackageRequest {
        name: name.to_string(),
        description: "Access to every highlight reel".to_string(),
        price,
        currency: None,
        duration_days: 30,
        features: vec!["HD video".to_string(), "Recruiter contacts".to_string()],
        is_active: None,
    }
}

async fn service() -> anyhow::Result<PackageService> {
    let pool = common::setup_pool().await?;
    Ok(PackageService::new(Arc::new(SqlitePackageRepository::new(pool))))
}

#[tokio::test]
async fn test_package_lifecycle() -> anyhow::Result<()> {
    let service = service().await?;

    let created = service.create(package("  Pro  ", 49.99)).await?;
    assert_eq!(created.name, "Pro");
    assert_eq!(created.features.len(), 2);
    assert!(created.is_active);

    let fetched = service.get(created.id).await?;
    assert_eq!(fetched.price, 49.99);

    let updated = service
        .update(
            created.id,
            UpdatePackageRequest {
                price: Some(59.0),
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.price, 59.0);
    assert!(!updated.is_active);
    assert_eq!(updated.name, "Pro");

    service.delete(created.id).await?;
    assert!(matches!(service.get(created.id).await, Err(AppError::NotFound(_))));
    assert!(matches!(service.delete(created.id).await, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_package_names_are_unique() -> anyhow::Result<()> {
    let service = service().await?;

    let basic = service.create(package("Basic", 9.0)).await?;
    let pro = service.create(package("Pro", 29.0)).await?;

    assert!(matches!(
        service.create(package("Basic", 12.0)).await,
        Err(AppError::Conflict(_))
    ));

    let rename = UpdatePackageRequest {
        name: Some("Basic".to_string()),
        ..Default::default()
    };
    assert!(matches!(service.update(pro.id, rename.clone()).await, Err(AppError::Conflict(_))));

    // Keeping its own name is not a conflict
    service.update(basic.id, rename).await?;

    Ok(())
}

#[tokio::test]
async fn test_package_list_filters_inactive() -> anyhow::Result<()> {
    let service = service().await?;

    service.create(package("Elite", 99.0)).await?;
    let mut hidden = package("Legacy", 5.0);
    hidden.is_active = Some(false);
    service.create(hidden).await?;

    let all = service.list(false).await?;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name, "Legacy");

    let active = service.list(true).await?;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Elite");

    Ok(())
}

#[tokio::test]
async fn test_package_validation() -> anyhow::Result<()> {
    let service = service().await?;

    assert!(matches!(
        service.create(package("Negative", -1.0)).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        service.create(package("   ", 1.0)).await,
        Err(AppError::Validation(_))
    ));

    let mut bad_currency = package("Euro", 1.0);
    bad_currency.currency = Some("EURO".to_string());
    assert!(matches!(service.create(bad_currency).await, Err(AppError::Validation(_))));

    Ok(())
}

#[tokio::test]
async fn test_duplicate_name_insert_is_conflict() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let repo = SqlitePackageRepository::new(pool);

    repo.create(package("Team", 15.0)).await?;
    assert!(matches!(
        repo.create(package("Team", 20.0)).await,
        Err(AppError::Conflict(_))
    ));

    Ok(())
}
