//! Approval-store construction from the environment and `repository.toml`.

mod support;

use std::fs;
use std::str::FromStr;

use social_ops::db::{
    RepositoryBuilder, RepositoryConfig, RepositoryError, RepositoryFactory, RepositoryType,
};
use social_ops::models::{ApprovalDecision, ApprovalStatus};
use tempfile::tempdir;

#[test]
fn test_repository_type_from_str() {
    assert_eq!(RepositoryType::from_str("POSTGRES").unwrap(), RepositoryType::Postgres);
    assert_eq!(RepositoryType::from_str("LOCAL").unwrap(), RepositoryType::Local);
    let err = RepositoryType::from_str("sqlite").unwrap_err();
    assert!(err.contains("Unknown repository type"));
}

#[test]
fn test_repository_type_from_env_default() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", None),
            ("PG_DATABASE_URL", None),
        ],
        || assert_eq!(RepositoryType::from_env(), RepositoryType::Local),
    );
}

#[test]
fn test_repository_type_from_env_with_database_url() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", Some("postgres://localhost/social_ops")),
        ],
        || assert_eq!(RepositoryType::from_env(), RepositoryType::Postgres),
    );
}

#[test]
fn test_explicit_repository_type_wins() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("local")),
            ("DATABASE_URL", Some("postgres://localhost/social_ops")),
        ],
        || assert_eq!(RepositoryType::from_env(), RepositoryType::Local),
    );
}

#[tokio::test]
async fn test_local_store_from_env() {
    let builder = support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("local")),
            ("DATABASE_URL", None),
            ("PG_DATABASE_URL", None),
        ],
        || RepositoryBuilder::new().from_env(),
    )
    .unwrap();

    let repo = builder.build().await.unwrap();
    repo.record_decision(&ApprovalDecision::new("a:facebook:post", ApprovalStatus::Approved))
        .await
        .unwrap();
    assert_eq!(repo.all_decisions().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_local_store_from_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("repository.toml");
    fs::write(&path, "[repository]\ntype = \"local\"\n").unwrap();

    let repo = RepositoryFactory::from_config_file(&path).await.unwrap();
    assert!(repo.health_check().await.unwrap());
}

#[tokio::test]
async fn test_missing_config_file_is_configuration_error() {
    let dir = tempdir().unwrap();
    let result = RepositoryFactory::from_config_file(dir.path().join("absent.toml")).await;
    assert!(matches!(result, Err(RepositoryError::ConfigurationError { .. })));
}

#[cfg(not(feature = "postgres-repo"))]
#[test]
fn test_postgres_config_without_feature_is_rejected() {
    let config = RepositoryConfig::parse(
        "[repository]\ntype = \"postgres\"\n\n[postgres]\ndatabase_url = \"postgres://localhost/x\"\n",
    )
    .unwrap();
    let err = RepositoryBuilder::new()
        .with_repository_config(&config)
        .err()
        .unwrap();
    assert!(err.to_string().contains("feature not enabled"));
}
