mod support;

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};

use support::{TestApp, body_bytes, body_json, multipart_body};

const BOUNDARY: &str = "branford-test-boundary";
const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR fake image payload";

async fn post_upload(app: &TestApp, body: Vec<u8>, with_session: bool) -> Response<Body> {
    let mut builder = Request::post("/api/upload").header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if with_session {
        builder = builder.header(header::COOKIE, app.session_cookie());
    }
    app.send(builder.body(Body::from(body)).expect("request"))
        .await
}

fn stored_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir).expect("readable dir") {
            let path = entry.expect("dir entry").path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files
}

#[tokio::test]
async fn uploaded_images_are_served_back_from_their_url() {
    let app = TestApp::new();
    let body = multipart_body(BOUNDARY, "file", "Squat Day.PNG", "image/png", PNG_BYTES);

    let response = post_upload(&app, body, true).await;
    assert_eq!(response.status(), StatusCode::OK);
    let uploaded = body_json(response).await;
    let url = uploaded["url"].as_str().expect("url").to_string();
    assert!(url.starts_with("/uploads/"), "{url}");
    assert!(url.ends_with(".png"), "{url}");
    assert_eq!(uploaded["sizeBytes"], PNG_BYTES.len());

    let files = stored_files(app.uploads_dir.path());
    assert_eq!(files.len(), 1);
    assert!(files[0].to_string_lossy().ends_with(".png"));

    let response = app.get(&url).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert!(
        response.headers()[header::CACHE_CONTROL]
            .to_str()
            .expect("ascii")
            .contains("immutable")
    );
    assert_eq!(body_bytes(response).await, PNG_BYTES);
}

#[tokio::test]
async fn markup_extensions_are_not_served_as_markup() {
    let app = TestApp::new();

    for name in ["landing.html", "logo.svg"] {
        let body = multipart_body(BOUNDARY, "file", name, "image/png", PNG_BYTES);
        let response = post_upload(&app, body, true).await;
        assert_eq!(response.status(), StatusCode::OK);

        let url = body_json(response).await["url"]
            .as_str()
            .expect("url")
            .to_string();
        assert!(url.ends_with(".jpg"), "{name} stored as {url}");

        let response = app.get(&url).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    }
}

#[tokio::test]
async fn two_uploads_of_the_same_name_get_distinct_urls() {
    let app = TestApp::new();
    let mut urls = Vec::new();
    for _ in 0..2 {
        let body = multipart_body(BOUNDARY, "file", "photo.jpg", "image/jpeg", PNG_BYTES);
        let response = post_upload(&app, body, true).await;
        assert_eq!(response.status(), StatusCode::OK);
        urls.push(body_json(response).await["url"].as_str().expect("url").to_string());
    }
    assert_ne!(urls[0], urls[1]);
    assert_eq!(stored_files(app.uploads_dir.path()).len(), 2);
}

#[tokio::test]
async fn oversized_uploads_are_rejected_and_leave_nothing_behind() {
    let app = TestApp::new();
    let payload = vec![0u8; 20 * 1024 * 1024];
    let body = multipart_body(BOUNDARY, "file", "huge.jpg", "image/jpeg", &payload);

    let response = post_upload(&app, body, true).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "File exceeds the upload limit");
    assert_eq!(body["details"]["limitBytes"], support::UPLOAD_LIMIT);

    assert!(stored_files(app.uploads_dir.path()).is_empty());
}

#[tokio::test]
async fn a_request_without_a_file_field_is_rejected() {
    let app = TestApp::new();
    let body = multipart_body(BOUNDARY, "attachment", "photo.jpg", "image/jpeg", PNG_BYTES);

    let response = post_upload(&app, body, true).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No file uploaded");
    assert!(stored_files(app.uploads_dir.path()).is_empty());
}

#[tokio::test]
async fn non_image_uploads_are_rejected() {
    let app = TestApp::new();
    let body = multipart_body(BOUNDARY, "file", "notes.pdf", "application/pdf", b"%PDF-1.7");

    let response = post_upload(&app, body, true).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Only image uploads are accepted"
    );
}

#[tokio::test]
async fn empty_files_are_rejected() {
    let app = TestApp::new();
    let body = multipart_body(BOUNDARY, "file", "blank.png", "image/png", b"");

    let response = post_upload(&app, body, true).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Uploaded file is empty");
    assert!(stored_files(app.uploads_dir.path()).is_empty());
}

#[tokio::test]
async fn uploads_require_an_admin_session() {
    let app = TestApp::new();
    let body = multipart_body(BOUNDARY, "file", "photo.png", "image/png", PNG_BYTES);

    let response = post_upload(&app, body, false).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(stored_files(app.uploads_dir.path()).is_empty());
}

#[tokio::test]
async fn missing_and_escaping_upload_paths_are_not_found() {
    let app = TestApp::new();
    std::fs::write(app.uploads_dir.path().join("secret.part"), b"partial").expect("write");

    for path in [
        "/uploads/2024-01/missing.png",
        "/uploads/secret.part",
        "/uploads/../Cargo.toml",
        "/uploads/%2E%2E/Cargo.toml",
    ] {
        let response = app.get(path).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
    }
}
