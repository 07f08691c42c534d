/// Integration tests for the GiveHub API
///
/// Two groups:
///
/// - Router-level tests that exercise authentication rejections and
///   pre-write validation. These run without any infrastructure.
/// - End-to-end tests against a real PostgreSQL database, marked `#[ignore]`.
///   Run them with a database available:
///   `DATABASE_URL=postgresql://... cargo test -p givehub-api -- --ignored`

mod common;

use axum::http::StatusCode;
use common::{read_json, send_empty, send_json, send_multipart, TestContext};
use givehub_shared::auth::jwt::{create_token, Claims};
use givehub_shared::models::user::UserRole;
use serde_json::json;
use uuid::Uuid;

fn donor_token(secret: &str) -> String {
    let claims = Claims::new(Uuid::new_v4(), "donor@example.com", UserRole::Donor, false);
    create_token(&claims, secret).expect("token")
}

// ---------------------------------------------------------------------------
// No-database tests: rejections that happen before any persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = common::router_without_db();

    for (method, uri) in [
        ("GET", "/users/profile"),
        ("GET", "/campaigns/my-campaigns"),
        ("POST", "/donations/create"),
        ("GET", "/donations/campaign/00000000-0000-0000-0000-000000000000"),
        ("GET", "/analytics/donations"),
        ("GET", "/analytics/donors"),
        ("GET", "/analytics/top-donors"),
    ] {
        let response = send_empty(&app, method, uri, None).await;
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} without a token",
            method,
            uri
        );
    }
}

#[tokio::test]
async fn test_garbage_token_is_forbidden() {
    let app = common::router_without_db();

    let response = send_empty(&app, "GET", "/users/profile", Some("not.a.token")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_token_signed_with_wrong_secret_is_forbidden() {
    let app = common::router_without_db();

    let token = donor_token("a-completely-different-secret-key-here");
    let response = send_empty(&app, "GET", "/users/profile", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_register_missing_fields_is_bad_request() {
    let app = common::router_without_db();

    let response = send_json(
        &app,
        "POST",
        "/users/register",
        None,
        json!({ "email": "jane@example.org" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_missing_fields_is_bad_request() {
    let app = common::router_without_db();

    let response = send_json(
        &app,
        "POST",
        "/users/login",
        None,
        json!({ "email": "jane@example.org" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_campaign_create_requires_fundraiser_role() {
    let app = common::router_without_db();

    // Valid token, but the donor role: rejected before the body is read
    let token = donor_token(common::TEST_JWT_SECRET);
    let response = send_multipart(
        &app,
        "/campaigns/create",
        Some(&token),
        &[("title", "x"), ("description", "y"), ("goalAmount", "100")],
        &[],
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_donation_create_missing_fields_is_bad_request() {
    let app = common::router_without_db();
    let token = donor_token(common::TEST_JWT_SECRET);

    let response = send_json(&app, "POST", "/donations/create", Some(&token), json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send_json(
        &app,
        "POST",
        "/donations/create",
        Some(&token),
        json!({ "campaignId": Uuid::new_v4(), "amount": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send_json(
        &app,
        "POST",
        "/donations/create",
        Some(&token),
        json!({ "campaignId": Uuid::new_v4(), "amount": -5 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// End-to-end tests: require a running PostgreSQL database
// ---------------------------------------------------------------------------

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_register_login_flow() {
    let ctx = TestContext::new().await;

    let (token, _user_id) = ctx.register_user("jane@example.org", "donor").await;
    assert!(!token.is_empty());

    // Login with the right password succeeds
    let response = ctx
        .post_json(
            "/users/login",
            None,
            json!({ "email": "jane@example.org", "password": "test-password-123" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(body["token"].is_string());
    assert_eq!(body["data"]["email"], "jane@example.org");

    // Wrong password and unknown email fail identically
    let wrong_password = ctx
        .post_json(
            "/users/login",
            None,
            json!({ "email": "jane@example.org", "password": "wrong-password-123" }),
        )
        .await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password_body = read_json(wrong_password).await;

    let unknown_email = ctx
        .post_json(
            "/users/login",
            None,
            json!({ "email": "nobody@example.org", "password": "test-password-123" }),
        )
        .await;
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    let unknown_email_body = read_json(unknown_email).await;

    // Non-distinguishable by response shape
    assert_eq!(wrong_password_body, unknown_email_body);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_duplicate_email_is_conflict() {
    let ctx = TestContext::new().await;

    ctx.register_user("dup@example.org", "donor").await;

    let response = ctx
        .post_json(
            "/users/register",
            None,
            json!({
                "firstName": "Other",
                "lastName": "Person",
                "dob": "1985-06-15",
                "email": "dup@example.org",
                "password": "another-password-1",
                "role": "ngo",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // No duplicate row was created
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind("dup@example.org")
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_profile_read_and_update() {
    let ctx = TestContext::new().await;
    let (token, _) = ctx.register_user("profile@example.org", "donor").await;

    let response = ctx.send("GET", "/users/profile", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["user"]["email"], "profile@example.org");
    // The hash never leaves the server
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password_hash").is_none());

    // Partial update: only lastName changes
    let response = ctx
        .put_json(
            "/users/update",
            Some(&token),
            json!({ "lastName": "Renamed" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["user"]["lastName"], "Renamed");
    assert_eq!(body["user"]["firstName"], "Test");
}

async fn create_campaign(ctx: &TestContext, token: &str) -> Uuid {
    let response = send_multipart(
        &ctx.app,
        "/campaigns/create",
        Some(token),
        &[
            ("title", "Clean water"),
            ("description", "Wells for the village"),
            ("goalAmount", "5000"),
        ],
        &[],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    body["campaign"]["id"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("campaign id")
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_campaign_create_defaults_and_roles() {
    let ctx = TestContext::new().await;
    let (ngo_token, _) = ctx.register_user("ngo@example.org", "ngo").await;
    let (donor_token, _) = ctx.register_user("donor@example.org", "donor").await;

    // Donor role always fails
    let response = send_multipart(
        &ctx.app,
        "/campaigns/create",
        Some(&donor_token),
        &[("title", "x"), ("description", "y"), ("goalAmount", "10")],
        &[],
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // NGO role succeeds; omitted category defaults to "others"
    let response = send_multipart(
        &ctx.app,
        "/campaigns/create",
        Some(&ngo_token),
        &[
            ("title", "Books"),
            ("description", "School library"),
            ("goalAmount", "1200"),
        ],
        &[],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["campaign"]["category"], "others");
    assert_eq!(body["campaign"]["status"], "active");
    assert_eq!(body["campaign"]["raisedAmount"], json!(0.0));

    // Unknown category is rejected, not coerced
    let response = send_multipart(
        &ctx.app,
        "/campaigns/create",
        Some(&ngo_token),
        &[
            ("title", "Bad"),
            ("description", "Bad"),
            ("goalAmount", "10"),
            ("category", "wildlife"),
        ],
        &[],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_campaign_images_are_uploaded() {
    let images = std::sync::Arc::new(givehub_shared::storage::MemoryImageStore::new());
    let ctx = TestContext::with_image_store(images.clone()).await;
    let (ngo_token, _) = ctx.register_user("ngo@example.org", "ngo").await;

    let response = send_multipart(
        &ctx.app,
        "/campaigns/create",
        Some(&ngo_token),
        &[
            ("title", "Shelter"),
            ("description", "Roofs after the storm"),
            ("goalAmount", "800"),
        ],
        &[("a.png", b"fake-png"), ("b.jpg", b"fake-jpg")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;

    let urls: Vec<&str> = body["campaign"]["images"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(urls, vec!["https://images.test/a.png", "https://images.test/b.jpg"]);
    assert_eq!(images.upload_count(), 2);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_campaign_update_delete_authorization() {
    let ctx = TestContext::new().await;
    let (creator_token, _) = ctx.register_user("creator@example.org", "ngo").await;
    let (other_token, _) = ctx.register_user("other@example.org", "ngo").await;

    let campaign_id = create_campaign(&ctx, &creator_token).await;

    // A non-creator, non-admin caller is rejected even with the ngo role
    let response = ctx
        .put_json(
            &format!("/campaigns/update/{}", campaign_id),
            Some(&other_token),
            json!({ "title": "Hijacked" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .send(
            "DELETE",
            &format!("/campaigns/delete/{}", campaign_id),
            Some(&other_token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The creator may patch; omitted fields keep prior values
    let response = ctx
        .put_json(
            &format!("/campaigns/update/{}", campaign_id),
            Some(&creator_token),
            json!({ "status": "closed" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["campaign"]["status"], "closed");
    assert_eq!(body["campaign"]["title"], "Clean water");

    // The creator may delete
    let response = ctx
        .send(
            "DELETE",
            &format!("/campaigns/delete/{}", campaign_id),
            Some(&creator_token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .send("GET", &format!("/campaigns/read/{}", campaign_id), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_admin_may_modify_foreign_campaign() {
    let ctx = TestContext::new().await;
    let (creator_token, _) = ctx.register_user("creator@example.org", "ngo").await;
    let (_, admin_id) = ctx.register_user("admin@example.org", "donor").await;

    // Promote through the store; no exposed operation grants admin
    sqlx::query("UPDATE users SET is_admin = TRUE WHERE id = $1")
        .bind(admin_id)
        .execute(&ctx.db)
        .await
        .unwrap();

    // Log in again so the token carries the admin flag
    let response = ctx
        .post_json(
            "/users/login",
            None,
            json!({ "email": "admin@example.org", "password": "test-password-123" }),
        )
        .await;
    let admin_token = read_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let campaign_id = create_campaign(&ctx, &creator_token).await;

    let response = ctx
        .put_json(
            &format!("/campaigns/update/{}", campaign_id),
            Some(&admin_token),
            json!({ "title": "Moderated title" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_donations_increment_raised_amount() {
    let ctx = TestContext::new().await;
    let (ngo_token, _) = ctx.register_user("ngo@example.org", "ngo").await;
    let (donor_token, _) = ctx.register_user("donor@example.org", "donor").await;

    let campaign_id = create_campaign(&ctx, &ngo_token).await;

    for amount in [10.0, 20.0, 12.5] {
        let response = ctx
            .post_json(
                "/donations/create",
                Some(&donor_token),
                json!({ "campaignId": campaign_id, "amount": amount }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // raisedAmount equals the sum of the recorded donations
    let response = ctx
        .send("GET", &format!("/campaigns/read/{}", campaign_id), None)
        .await;
    let body = read_json(response).await;
    assert_eq!(body["raisedAmount"], json!(42.5));

    // Unknown campaign: nothing is recorded
    let response = ctx
        .post_json(
            "/donations/create",
            Some(&donor_token),
            json!({ "campaignId": Uuid::new_v4(), "amount": 5 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM donations")
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 3);

    // Listing resolves donor and campaign identity
    let response = ctx
        .send(
            "GET",
            &format!("/donations/campaign/{}", campaign_id),
            Some(&donor_token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[0]["campaign"]["title"], "Clean water");
    assert_eq!(body[0]["donor"]["email"], "donor@example.org");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_monthly_donation_aggregation() {
    let ctx = TestContext::new().await;
    let (ngo_token, _) = ctx.register_user("ngo@example.org", "ngo").await;
    let (donor_a_token, donor_a) = ctx.register_user("a@example.org", "donor").await;
    let (_, donor_b) = ctx.register_user("b@example.org", "donor").await;

    let campaign_id = create_campaign(&ctx, &ngo_token).await;

    // Pin donated_at directly: [10, 20] from donor A in January 2024 and 5
    // from donor B in February 2024
    for (donor, amount, at) in [
        (donor_a, 10, "2024-01-05T10:00:00Z"),
        (donor_a, 20, "2024-01-20T10:00:00Z"),
        (donor_b, 5, "2024-02-01T10:00:00Z"),
    ] {
        sqlx::query(
            "INSERT INTO donations (campaign_id, donor_id, amount, donated_at)
             VALUES ($1, $2, $3, $4::timestamptz)",
        )
        .bind(campaign_id)
        .bind(donor)
        .bind(rust_decimal::Decimal::from(amount))
        .bind(at)
        .execute(&ctx.db)
        .await
        .unwrap();
    }

    let response = ctx
        .send("GET", "/analytics/donations", Some(&donor_a_token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;

    assert_eq!(
        body,
        json!([
            { "month": "Jan 2024", "donations": 30.0, "donors": 1 },
            { "month": "Feb 2024", "donations": 5.0, "donors": 1 },
        ])
    );
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_top_donors_ranking_capped_at_ten() {
    let ctx = TestContext::new().await;
    let (ngo_token, _) = ctx.register_user("ngo@example.org", "ngo").await;
    let campaign_id = create_campaign(&ctx, &ngo_token).await;

    // 12 donors with strictly decreasing totals
    let mut tokens = Vec::new();
    for i in 0..12 {
        let (token, _) = ctx
            .register_user(&format!("donor{}@example.org", i), "donor")
            .await;
        tokens.push(token);
    }
    for (i, token) in tokens.iter().enumerate() {
        let amount = 120 - (i as i64) * 10;
        let response = ctx
            .post_json(
                "/donations/create",
                Some(token),
                json!({ "campaignId": campaign_id, "amount": amount }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = ctx
        .send("GET", "/analytics/top-donors", Some(&tokens[0]))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;

    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 10, "capped at 10 even with 12 donors");
    assert_eq!(entries[0]["email"], "donor0@example.org");
    assert_eq!(entries[0]["totalDonated"], json!(120.0));
    assert_eq!(entries[1]["email"], "donor1@example.org");

    // Descending order throughout
    let totals: Vec<f64> = entries
        .iter()
        .map(|e| e["totalDonated"].as_f64().unwrap())
        .collect();
    let mut sorted = totals.clone();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
    assert_eq!(totals, sorted);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_campaign_read_is_idempotent() {
    let ctx = TestContext::new().await;
    let (ngo_token, _) = ctx.register_user("ngo@example.org", "ngo").await;
    let campaign_id = create_campaign(&ctx, &ngo_token).await;

    let first = read_json(
        ctx.send("GET", &format!("/campaigns/read/{}", campaign_id), None)
            .await,
    )
    .await;
    let second = read_json(
        ctx.send("GET", &format!("/campaigns/read/{}", campaign_id), None)
            .await,
    )
    .await;

    assert_eq!(first, second);
}
