//! Postgres repository tests: conditional writes, feedback upsert and
//! strict decoding of stored rows

mod common;

use common::TestApp;
use lingodesk_common::Error;
use lingodesk_projects::{
    Project, ProjectDetails, ProjectRepository, ProjectState, ProjectStore, UserColumn,
};
use lingodesk_users::{User, UserDirectory};
use serial_test::serial;
use uuid::Uuid;

async fn stored_project(app: &TestApp, customer: &User) -> Project {
    let repo = ProjectRepository::new(app.pool.clone());
    let id = Uuid::new_v4();
    repo.create(&Project::new(
        id,
        customer.id,
        ProjectDetails::new("Catalogue", "Spring catalogue", "de").unwrap(),
        format!("projects/{}/original/catalogue.pdf", id),
    ))
    .await
    .unwrap()
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_translators_are_listed_oldest_first() {
    let app = TestApp::new().await.unwrap();
    let first = app.translator("anna", &["de", "fr"]).await.unwrap();
    let second = app.translator("bert", &["de"]).await.unwrap();
    app.translator("carl", &["fr"]).await.unwrap();

    let found = app.directory.get_translators_by_language("de").await.unwrap();
    let ids: Vec<Uuid> = found.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![first.user.id, second.user.id]);
    assert_eq!(found[0].languages, vec!["de", "fr"]);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_duplicate_email_is_conflict() {
    let app = TestApp::new().await.unwrap();
    app.customer("dora").await.unwrap();

    let duplicate = User::new_customer("Dora Two", "dora@lingodesk.test").unwrap();
    let err = app.directory.create_user(&duplicate).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_conditional_writes() {
    let app = TestApp::new().await.unwrap();
    let customer = app.customer("emil").await.unwrap();
    let translator = app.translator("fiona", &["de"]).await.unwrap();
    let repo = ProjectRepository::new(app.pool.clone());
    let project = stored_project(&app, &customer.user).await;

    let assigned = repo
        .assign_translator(project.id, ProjectState::Created, translator.user.id)
        .await
        .unwrap();
    assert_eq!(assigned.state, ProjectState::Assigned);
    assert_eq!(assigned.translator_id, Some(translator.user.id));

    let stale = repo
        .transition_state(project.id, ProjectState::Created, ProjectState::Closed)
        .await
        .unwrap_err();
    assert!(matches!(stale, Error::Conflict(_)));

    let missing = repo
        .transition_state(Uuid::new_v4(), ProjectState::Created, ProjectState::Closed)
        .await
        .unwrap_err();
    assert!(matches!(missing, Error::NotFound(_)));

    let completed = repo
        .save_translated_file(project.id, ProjectState::Assigned, "projects/x/translated/a.pdf")
        .await
        .unwrap();
    assert_eq!(completed.state, ProjectState::Completed);
    assert_eq!(
        completed.translated_file.as_deref(),
        Some("projects/x/translated/a.pdf")
    );

    let by_translator = repo
        .get_by_user(translator.user.id, UserColumn::Translator)
        .await
        .unwrap();
    assert_eq!(by_translator.len(), 1);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_reject_upserts_feedback_atomically() {
    let app = TestApp::new().await.unwrap();
    let customer = app.customer("gina").await.unwrap();
    let translator = app.translator("hugo", &["de"]).await.unwrap();
    let repo = ProjectRepository::new(app.pool.clone());
    let project = stored_project(&app, &customer.user).await;

    repo.assign_translator(project.id, ProjectState::Created, translator.user.id)
        .await
        .unwrap();
    repo.save_translated_file(project.id, ProjectState::Assigned, "t1")
        .await
        .unwrap();
    repo.reject_with_feedback(project.id, ProjectState::Completed, "first")
        .await
        .unwrap();
    repo.save_translated_file(project.id, ProjectState::Rejected, "t2")
        .await
        .unwrap();
    repo.reject_with_feedback(project.id, ProjectState::Completed, "second")
        .await
        .unwrap();

    let feedback = repo.get_feedback(project.id).await.unwrap().unwrap();
    assert_eq!(feedback.text, "second");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feedbacks WHERE project_id = $1")
        .bind(project.id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    // A lost race writes neither the state nor the feedback
    let err = repo
        .reject_with_feedback(project.id, ProjectState::Completed, "third")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    let feedback = repo.get_feedback(project.id).await.unwrap().unwrap();
    assert_eq!(feedback.text, "second");
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_reopened_project_stays_readable() {
    let app = TestApp::new().await.unwrap();
    let customer = app.customer("iris").await.unwrap();
    let first = app.translator("jan", &["de"]).await.unwrap();
    let second = app.translator("kim", &["de"]).await.unwrap();
    let repo = ProjectRepository::new(app.pool.clone());
    let project = stored_project(&app, &customer.user).await;

    repo.assign_translator(project.id, ProjectState::Created, first.user.id)
        .await
        .unwrap();
    repo.save_translated_file(project.id, ProjectState::Assigned, "t1")
        .await
        .unwrap();
    repo.reject_with_feedback(project.id, ProjectState::Completed, "redo")
        .await
        .unwrap();

    let reopened = repo
        .transition_state(project.id, ProjectState::Rejected, ProjectState::Assigned)
        .await
        .unwrap();
    assert!(reopened.translated_file.is_none());

    repo.save_translated_file(project.id, ProjectState::Assigned, "t2")
        .await
        .unwrap();
    repo.reject_with_feedback(project.id, ProjectState::Completed, "redo again")
        .await
        .unwrap();
    let reassigned = repo
        .assign_translator(project.id, ProjectState::Rejected, second.user.id)
        .await
        .unwrap();
    assert!(reassigned.translated_file.is_none());

    assert!(repo.get_by_id(project.id).await.unwrap().is_some());
    assert_eq!(repo.get_all().await.unwrap().len(), 1);
    assert_eq!(
        repo.get_by_user(customer.user.id, UserColumn::Customer)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_unknown_stored_state_is_corrupt_record() {
    let app = TestApp::new().await.unwrap();
    let customer = app.customer("ivan").await.unwrap();
    let repo = ProjectRepository::new(app.pool.clone());
    let project = stored_project(&app, &customer.user).await;

    sqlx::query("ALTER TABLE projects DROP CONSTRAINT projects_state_check")
        .execute(&app.pool)
        .await
        .unwrap();
    sqlx::query("UPDATE projects SET state = 'ARCHIVED' WHERE id = $1")
        .bind(project.id)
        .execute(&app.pool)
        .await
        .unwrap();

    let result = repo.get_by_id(project.id).await;

    app.cleanup().await.unwrap();
    sqlx::query(
        "ALTER TABLE projects ADD CONSTRAINT projects_state_check CHECK (
            state IN ('CREATED', 'ASSIGNED', 'COMPLETED', 'APPROVED', 'REJECTED', 'CLOSED'))",
    )
    .execute(&app.pool)
    .await
    .unwrap();

    assert!(matches!(result, Err(Error::CorruptRecord(_))));
}
