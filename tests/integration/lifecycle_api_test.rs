//! End-to-end lifecycle through the HTTP API against Postgres

mod common;

use axum::body::to_bytes;
use axum::http::{header, StatusCode};
use common::{empty_request, json_request, multipart_request, TestApp, MAX_FILE_BYTES};
use serde_json::json;
use serial_test::serial;

fn create_form() -> [(&'static str, &'static str); 3] {
    [
        ("name", "Product sheet"),
        ("description", "Two pages of specs"),
        ("language", "de"),
    ]
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_full_lifecycle_over_http() {
    let app = TestApp::new().await.unwrap();
    let customer = app.customer("julia").await.unwrap();
    let translator = app.translator("karl", &["de"]).await.unwrap();
    let admin = app.administrator("lena").await.unwrap();

    // Create: auto-assigned to the only German translator
    let (status, project) = app
        .send_json(multipart_request(
            "/v1/projects",
            &customer,
            &create_form(),
            Some(("sheet.txt", b"Product sheet")),
        ))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(project["state"], "ASSIGNED");
    assert_eq!(project["translator_id"], translator.user.id.to_string());
    let id = project["id"].as_str().unwrap().to_string();
    assert!(app
        .email
        .get_latest_email_of_type("karl@lingodesk.test", "translator_assigned")
        .is_some());

    // Upload
    let (status, project) = app
        .send_json(multipart_request(
            &format!("/v1/projects/{}/upload", id),
            &translator,
            &[],
            Some(("sheet-de.txt", b"Produktblatt")),
        ))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["state"], "COMPLETED");
    assert_eq!(project["translated_filename"], "sheet-de.txt");

    // Reject with feedback
    let (status, project) = app
        .send_json(json_request(
            "POST",
            &format!("/v1/projects/{}/reject", id),
            Some(&customer),
            json!({"feedback": "Use the glossary"}),
        ))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["state"], "REJECTED");

    // Listing attaches the feedback
    let (_, list) = app
        .send_json(empty_request("GET", "/v1/projects", Some(&translator)))
        .await
        .unwrap();
    assert_eq!(list[0]["feedback"], "Use the glossary");

    // Resubmit, accept, close
    let (status, _) = app
        .send_json(multipart_request(
            &format!("/v1/projects/{}/upload", id),
            &translator,
            &[],
            Some(("sheet-de.txt", b"Produktblatt v2")),
        ))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);

    let (status, project) = app
        .send_json(empty_request(
            "POST",
            &format!("/v1/projects/{}/accept", id),
            Some(&customer),
        ))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["state"], "APPROVED");

    let (status, project) = app
        .send_json(empty_request(
            "POST",
            &format!("/v1/projects/{}/close", id),
            Some(&admin),
        ))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["state"], "CLOSED");

    let (status, body) = app
        .send_json(empty_request(
            "POST",
            &format!("/v1/projects/{}/close", id),
            Some(&admin),
        ))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "ALREADY_CLOSED");

    let project_id: uuid::Uuid = id.parse().unwrap();
    let trail: Vec<String> = app
        .email
        .get_emails_for_project(project_id)
        .iter()
        .filter_map(|e| e.email_type().map(str::to_string))
        .collect();
    assert_eq!(
        trail,
        vec![
            "translator_assigned",
            "translation_available",
            "translation_rejected",
            "translation_available",
            "translation_accepted",
            "project_closed",
        ]
    );

    // Download the final translation
    let response = app
        .send(empty_request(
            "GET",
            &format!("/v1/projects/{}/download/translation", id),
            Some(&customer),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"sheet-de.txt\""
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Produktblatt v2");
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_no_translator_closes_project() {
    let app = TestApp::new().await.unwrap();
    let customer = app.customer("mona").await.unwrap();

    let (status, project) = app
        .send_json(multipart_request(
            "/v1/projects",
            &customer,
            &create_form(),
            Some(("sheet.txt", b"Product sheet")),
        ))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(project["state"], "CLOSED");
    assert!(project["translator_id"].is_null());
    assert!(app
        .email
        .get_latest_email_of_type("mona@lingodesk.test", "closed_without_translator")
        .is_some());
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_status_endpoint_errors() {
    let app = TestApp::new().await.unwrap();
    let customer = app.customer("nora").await.unwrap();
    let translator = app.translator("otto", &["de"]).await.unwrap();

    let (_, project) = app
        .send_json(multipart_request(
            "/v1/projects",
            &customer,
            &create_form(),
            Some(("sheet.txt", b"Product sheet")),
        ))
        .await
        .unwrap();
    let uri = format!("/v1/projects/{}/status", project["id"].as_str().unwrap());

    let cases = [
        (&customer, "PAUSED", StatusCode::BAD_REQUEST, "UNKNOWN_STATE"),
        (&customer, "APPROVED", StatusCode::CONFLICT, "INVALID_TRANSITION"),
        (&customer, "COMPLETED", StatusCode::FORBIDDEN, "FORBIDDEN"),
    ];
    for (user, target, expected_status, expected_code) in cases {
        let (status, body) = app
            .send_json(json_request("PUT", &uri, Some(user), json!({"state": target})))
            .await
            .unwrap();
        assert_eq!(status, expected_status, "{}", target);
        assert_eq!(body["error"]["code"], expected_code);
    }

    let (status, body) = app
        .send_json(json_request(
            "PUT",
            &uri,
            Some(&translator),
            json!({"state": "COMPLETED"}),
        ))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "COMPLETED");
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_create_validation_and_roles() {
    let app = TestApp::new().await.unwrap();
    let customer = app.customer("paul").await.unwrap();
    let translator = app.translator("quinn", &["de"]).await.unwrap();

    let (status, _) = app
        .send_json(multipart_request(
            "/v1/projects",
            &translator,
            &create_form(),
            Some(("sheet.txt", b"x")),
        ))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send_json(multipart_request("/v1/projects", &customer, &create_form(), None))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let oversized = vec![b'x'; MAX_FILE_BYTES + 1];
    let (status, _) = app
        .send_json(multipart_request(
            "/v1/projects",
            &customer,
            &create_form(),
            Some(("big.txt", &oversized)),
        ))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = app
        .send_json(empty_request("GET", "/v1/projects", Some(&customer)))
        .await
        .unwrap();
    assert_eq!(list.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_strangers_cannot_see_projects() {
    let app = TestApp::new().await.unwrap();
    let owner = app.customer("rita").await.unwrap();
    let stranger = app.customer("sven").await.unwrap();
    app.translator("tara", &["de"]).await.unwrap();

    let (_, project) = app
        .send_json(multipart_request(
            "/v1/projects",
            &owner,
            &create_form(),
            Some(("sheet.txt", b"Product sheet")),
        ))
        .await
        .unwrap();
    let id = project["id"].as_str().unwrap();

    for uri in [
        format!("/v1/projects/{}", id),
        format!("/v1/projects/{}/download/original", id),
    ] {
        let response = app
            .send(empty_request("GET", &uri, Some(&stranger)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{}", uri);
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_registration_token_authenticates() {
    let app = TestApp::new().await.unwrap();

    let (status, body) = app
        .send_json(json_request(
            "POST",
            "/v1/users",
            None,
            json!({
                "name": "Uma",
                "email": "uma@lingodesk.test",
                "role": "TRANSLATOR",
                "password": "uma-s3cret",
                "languages": ["DE", "fr"]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    let token = body["access_token"].as_str().unwrap().to_string();

    let response = app
        .send(
            axum::http::Request::get("/v1/users/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let me: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(me["languages"], json!(["de", "fr"]));
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_login_reissues_token() {
    let app = TestApp::new().await.unwrap();

    let (status, _) = app
        .send_json(json_request(
            "POST",
            "/v1/users",
            None,
            json!({
                "name": "Vera",
                "email": "vera@lingodesk.test",
                "role": "CUSTOMER",
                "password": "vera-s3cret"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send_json(json_request(
            "POST",
            "/v1/auth/login",
            None,
            json!({"email": "VERA@lingodesk.test", "password": "vera-s3cret"}),
        ))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "CUSTOMER");
    assert!(body["user"].get("password_hash").is_none());
    let token = body["access_token"].as_str().unwrap().to_string();

    let response = app
        .send(
            axum::http::Request::get("/v1/users/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = app
        .send_json(json_request(
            "POST",
            "/v1/auth/login",
            None,
            json!({"email": "vera@lingodesk.test", "password": "wrong-pass"}),
        ))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTHENTICATION_ERROR");
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_admin_user_directory() {
    let app = TestApp::new().await.unwrap();
    let admin = app.administrator("wanda").await.unwrap();
    let customer = app.customer("xaver").await.unwrap();
    app.translator("yara", &["de"]).await.unwrap();

    let (status, body) = app
        .send_json(empty_request("GET", "/v1/users", Some(&admin)))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = app
        .send_json(empty_request("GET", "/v1/users/yara", Some(&admin)))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "TRANSLATOR");

    let (status, _) = app
        .send_json(empty_request("GET", "/v1/users/nobody", Some(&admin)))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send_json(empty_request("GET", "/v1/users", Some(&customer)))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::FORBIDDEN);
}
