use formgate::adapters::api_handler::{demo_registry, parse_urlencoded};
use formgate::domain::SubmitOutcome;
use serde_json::json;

// End-to-end scenarios driven through the demo registry, exercising the
// validated adapter, both schema families, and the HTTP form host.

#[tokio::test]
async fn blog_post_creation_succeeds_with_valid_data() {
    let forms = demo_registry();
    let form = forms.get("create-post").unwrap();

    let data = parse_urlencoded(
        "title=My+Great+Blog+Post&content=This+is+the+content+of+my+blog+post+with+enough+characters.",
    );
    let outcome = form.submit(data).await.unwrap();

    let value = outcome.complete().expect("expected handler result");
    assert_eq!(value["success"], json!(true));
    assert_eq!(value["post"]["slug"], json!("my-great-blog-post"));
    assert_eq!(value["post"]["title"], json!("My Great Blog Post"));
    assert_eq!(
        value["message"],
        json!("Post \"My Great Blog Post\" created successfully!")
    );
}

#[tokio::test]
async fn blog_post_creation_reports_both_short_fields() {
    let forms = demo_registry();
    let form = forms.get("create-post").unwrap();

    let data = parse_urlencoded("title=Hi&content=Short");
    let outcome = form.submit(data).await.unwrap();

    let error = outcome.invalid().expect("expected a validation error");
    assert_eq!(
        serde_json::to_value(&error).unwrap(),
        json!({
            "success": false,
            "errors": {
                "title": ["Title must be at least 3 characters"],
                "content": ["Content must be at least 10 characters"]
            },
            "data": { "title": "Hi", "content": "Short" }
        })
    );
}

#[tokio::test]
async fn blog_post_category_must_be_in_the_declared_set() {
    let forms = demo_registry();
    let form = forms.get("create-post").unwrap();

    let data = parse_urlencoded(
        "title=My+Blog+Post&content=This+is+the+content+of+my+blog+post.&category=sports",
    );
    let outcome = form.submit(data).await.unwrap();

    let error = outcome.invalid().expect("expected a validation error");
    assert_eq!(
        error.errors.get("category"),
        Some(&vec!["Please select a valid category".to_string()])
    );
    // Untouched fields still come back in `data`.
    assert_eq!(error.data["title"], json!("My Blog Post"));
}

#[tokio::test]
async fn contact_form_submission_succeeds() {
    let forms = demo_registry();
    let form = forms.get("contact").unwrap();

    let data = parse_urlencoded(
        "name=John+Doe&email=john%40example.com&message=This+is+a+test+message+with+enough+content+to+pass+validation.",
    );
    let outcome = form.submit(data).await.unwrap();

    assert_eq!(
        outcome.complete().unwrap(),
        json!({
            "success": true,
            "message": "Thank you for your message! We'll get back to you soon.",
        })
    );
}

#[tokio::test]
async fn contact_form_rejects_short_name_and_bad_email() {
    let forms = demo_registry();
    let form = forms.get("contact").unwrap();

    let data = parse_urlencoded("name=J&email=not-email&message=too+short");
    let outcome = form.submit(data).await.unwrap();

    let error = outcome.invalid().expect("expected a validation error");
    assert_eq!(
        error.errors.get("name"),
        Some(&vec!["Name must be at least 2 characters".to_string()])
    );
    assert_eq!(
        error.errors.get("email"),
        Some(&vec!["Invalid email address".to_string()])
    );
    assert_eq!(
        error.errors.get("message"),
        Some(&vec!["Message must be at least 20 characters".to_string()])
    );
}

#[tokio::test]
async fn registration_coerces_age_through_the_pipeline() {
    let forms = demo_registry();
    let form = forms.get("register").unwrap();

    let data = parse_urlencoded(
        "username=newuser&password=password123&email=new%40example.com&age=30",
    );
    let outcome = form.submit(data).await.unwrap();

    let value = outcome.complete().unwrap();
    assert_eq!(value["user"]["username"], json!("newuser"));
    assert_eq!(value["user"]["age"], json!(30));
    assert_eq!(value["message"], json!("Account created successfully!"));
}

#[tokio::test]
async fn empty_submission_fails_every_required_field() {
    let forms = demo_registry();
    let form = forms.get("register").unwrap();

    let outcome = form.submit(parse_urlencoded("")).await.unwrap();

    let error = outcome.invalid().expect("expected a validation error");
    for key in ["username", "password", "email", "age"] {
        assert!(!error.errors.get(key).unwrap().is_empty(), "missing {key}");
    }
    assert_eq!(error.data, json!({}));
}

#[tokio::test]
async fn submissions_update_the_form_result_holder() {
    let forms = demo_registry();
    let form = forms.get("contact").unwrap();

    assert!(form.result.read().await.is_none());

    let data = parse_urlencoded(
        "name=John+Doe&email=john%40example.com&message=This+is+a+test+message+with+enough+content.",
    );
    form.submit(data).await.unwrap();

    let stored = form.result.read().await;
    assert!(matches!(&*stored, Some(SubmitOutcome::Complete(_))));
    assert_eq!(form.pending_count(), 0);
}
