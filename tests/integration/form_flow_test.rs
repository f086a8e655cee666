use super::common;

use common::test_server::TestServer;
use serde_json::Value;

#[tokio::test]
async fn test_list_forms() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client.get(server.url("/api/forms")).send().await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    let forms = body["forms"].as_array().unwrap();
    let names: Vec<_> = forms.iter().map(|f| f["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["contact", "create-post", "register"]);

    for form in forms {
        assert_eq!(form["method"], "POST");
        assert_eq!(form["pending"], 0);
        assert_eq!(form["button_props"]["type"], "submit");
    }
}

#[tokio::test]
async fn test_valid_submission_passes_through() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/forms/create-post"))
        .form(&[
            ("title", "My Blog Post"),
            ("content", "This is the content of my blog post."),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["post"]["title"], "My Blog Post");
    assert_eq!(body["post"]["slug"], "my-blog-post");
}

#[tokio::test]
async fn test_invalid_submission_returns_the_error_report() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/forms/create-post"))
        .form(&[("title", "Hi"), ("content", "Short")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 422);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(
        body["errors"]["title"][0],
        "Title must be at least 3 characters"
    );
    assert_eq!(
        body["errors"]["content"][0],
        "Content must be at least 10 characters"
    );
    // The raw submission comes back for re-display.
    assert_eq!(body["data"]["title"], "Hi");
    assert_eq!(body["data"]["content"], "Short");
}

#[tokio::test]
async fn test_contact_form_round_trip() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/forms/contact"))
        .form(&[
            ("name", "John Doe"),
            ("email", "john@example.com"),
            ("message", "This is a test message with enough content."),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_unknown_form_returns_404() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/forms/nonexistent"))
        .form(&[("a", "b")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_empty_body_reports_required_fields() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/forms/register"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["errors"]["username"].is_array());
}
