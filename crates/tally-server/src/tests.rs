//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use tally_core::auth::issue_token;
use tally_core::models::{NewTransaction, NewUser, PaymentMethod, Role, TransactionKind, User};
use tally_core::suggest::{MockSuggestionBackend, SuggestionClient};

const TEST_SECRET: &str = "test-secret";

fn test_config() -> ServerConfig {
    ServerConfig::new(TEST_SECRET)
}

/// Router over a fresh in-memory database with a quiet mock suggestion client
fn setup_test_app() -> (Database, Router) {
    let db = Database::in_memory().unwrap();
    let app = create_router_with_options(
        db.clone(),
        test_config(),
        Some(SuggestionClient::Mock(MockSuggestionBackend::new())),
    );
    (db, app)
}

/// Router over the given database with an explicit suggestion client
fn setup_app_with_suggestions(db: &Database, suggestions: Option<SuggestionClient>) -> Router {
    create_router_with_options(db.clone(), test_config(), suggestions)
}

/// Create a user directly in the database and mint a token for them
fn seeded_user(db: &Database, email: &str, role: Role) -> (User, String) {
    let user = db
        .create_user(&NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: tally_core::auth::hash_password("password123").unwrap(),
            role,
        })
        .unwrap();
    let token = issue_token(TEST_SECRET.as_bytes(), &user).unwrap();
    (user, token)
}

fn seed_transaction(db: &Database, user_id: i64, kind: TransactionKind, category: &str, amount: f64, date: &str) {
    db.create_transaction(
        user_id,
        &NewTransaction {
            kind,
            category: category.to_string(),
            amount,
            date: Some(chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
            description: String::new(),
            payment_method: Some(PaymentMethod::Cash),
        },
    )
    .unwrap();
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, token: Option<&str>, body: &serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

// ========== Auth API Tests ==========

#[tokio::test]
async fn test_signup_and_login() {
    let (_db, app) = setup_test_app();

    let signup = serde_json::json!({
        "name": "Ada",
        "email": "ada@example.com",
        "password": "correct horse"
    });

    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/auth/signup", None, &signup))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let login = serde_json::json!({
        "email": "ada@example.com",
        "password": "correct horse"
    });
    let response = app
        .oneshot(send_json("POST", "/api/auth/login", None, &login))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert!(json["token"].as_str().unwrap().len() > 20);
    assert_eq!(json["user"]["name"], "Ada");
    assert_eq!(json["user"]["email"], "ada@example.com");
    // The password hash must never appear in a response
    assert!(json["user"].get("password").is_none());
    assert!(json["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_signup_duplicate_email_rejected() {
    let (_db, app) = setup_test_app();

    let signup = serde_json::json!({
        "name": "Ada",
        "email": "dup@example.com",
        "password": "pw"
    });

    let first = app
        .clone()
        .oneshot(send_json("POST", "/api/auth/signup", None, &signup))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(send_json("POST", "/api/auth/signup", None, &signup))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(second).await;
    assert_eq!(json["error"], "User already exists");
}

#[tokio::test]
async fn test_login_wrong_password_rejected() {
    let (db, app) = setup_test_app();
    seeded_user(&db, "bob@example.com", Role::User);

    let login = serde_json::json!({
        "email": "bob@example.com",
        "password": "wrong"
    });
    let response = app
        .oneshot(send_json("POST", "/api/auth/login", None, &login))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
    let (db, app) = setup_test_app();
    seeded_user(&db, "real@example.com", Role::User);

    let wrong_password = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/auth/login",
            None,
            &serde_json::json!({"email": "real@example.com", "password": "nope"}),
        ))
        .await
        .unwrap();
    let unknown_email = app
        .oneshot(send_json(
            "POST",
            "/api/auth/login",
            None,
            &serde_json::json!({"email": "ghost@example.com", "password": "nope"}),
        ))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), unknown_email.status());
    let a = get_body_json(wrong_password).await;
    let b = get_body_json(unknown_email).await;
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let (_db, app) = setup_test_app();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/api/transactions").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(get("/api/transactions", "not-a-real-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_current_user() {
    let (db, app) = setup_test_app();
    let (user, token) = seeded_user(&db, "me@example.com", Role::User);

    let response = app.oneshot(get("/api/auth/me", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["id"], user.id);
    assert_eq!(json["email"], "me@example.com");
    assert_eq!(json["role"], "user");
}

#[tokio::test]
async fn test_signup_seeds_default_categories() {
    let (_db, app) = setup_test_app();

    let signup = serde_json::json!({
        "name": "Cat",
        "email": "cat@example.com",
        "password": "pw"
    });
    app.clone()
        .oneshot(send_json("POST", "/api/auth/signup", None, &signup))
        .await
        .unwrap();

    let login = serde_json::json!({"email": "cat@example.com", "password": "pw"});
    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/auth/login", None, &login))
        .await
        .unwrap();
    let token = get_body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app.oneshot(get("/api/categories", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let categories = json.as_array().unwrap();
    assert_eq!(categories.len(), 6);
    assert!(categories.iter().any(|c| c["name"] == "Salary" && c["type"] == "income"));
    assert!(categories.iter().any(|c| c["name"] == "Food" && c["type"] == "expense"));
}

// ========== Transaction API Tests ==========

#[tokio::test]
async fn test_transaction_crud() {
    let (db, app) = setup_test_app();
    let (_user, token) = seeded_user(&db, "tx@example.com", Role::User);

    // Create
    let body = serde_json::json!({
        "type": "expense",
        "category": "Food",
        "amount": 42.5,
        "date": "2024-01-10",
        "description": "Groceries",
        "paymentMethod": "UPI"
    });
    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/transactions", Some(&token), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = get_body_json(response).await;
    assert_eq!(created["type"], "expense");
    assert_eq!(created["paymentMethod"], "UPI");
    let id = created["id"].as_i64().unwrap();

    // Get
    let response = app
        .clone()
        .oneshot(get(&format!("/api/transactions/{}", id), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Update
    let body = serde_json::json!({
        "type": "expense",
        "category": "Bills",
        "amount": 99.0,
        "date": "2024-01-11",
        "description": "Electricity",
        "paymentMethod": "Credit Card"
    });
    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/api/transactions/{}", id),
            Some(&token),
            &body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = get_body_json(response).await;
    assert_eq!(updated["category"], "Bills");
    assert_eq!(updated["paymentMethod"], "Credit Card");

    // List
    let response = app
        .clone()
        .oneshot(get("/api/transactions", &token))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    // Delete
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/transactions/{}", id))
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get(&format!("/api/transactions/{}", id), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_transaction_requires_payment_method() {
    let (db, app) = setup_test_app();
    let (_user, token) = seeded_user(&db, "pm@example.com", Role::User);

    let body = serde_json::json!({
        "type": "expense",
        "category": "Food",
        "amount": 10.0,
        "date": "2024-01-10"
    });
    let response = app
        .oneshot(send_json("POST", "/api/transactions", Some(&token), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Payment method is required");
}

#[tokio::test]
async fn test_transactions_are_isolated_between_users() {
    let (db, app) = setup_test_app();
    let (alice, alice_token) = seeded_user(&db, "alice@example.com", Role::User);
    let (_bob, bob_token) = seeded_user(&db, "bob@example.com", Role::User);

    seed_transaction(&db, alice.id, TransactionKind::Income, "Salary", 100.0, "2024-01-01");
    let tx_id = db.list_transactions(alice.id).unwrap()[0].id;

    // Bob sees an empty list and cannot fetch Alice's transaction
    let response = app
        .clone()
        .oneshot(get("/api/transactions", &bob_token))
        .await
        .unwrap();
    assert!(get_body_json(response).await.as_array().unwrap().is_empty());

    let response = app
        .clone()
        .oneshot(get(&format!("/api/transactions/{}", tx_id), &bob_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(get(&format!("/api/transactions/{}", tx_id), &alice_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ========== Budget API Tests ==========

#[tokio::test]
async fn test_budget_crud_and_spent_decoration() {
    let (db, app) = setup_test_app();
    let (user, token) = seeded_user(&db, "budget@example.com", Role::User);

    let body = serde_json::json!({
        "category": "Food",
        "amount": 300.0,
        "period": "monthly"
    });
    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/budgets", Some(&token), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Spend in the current month so the decoration picks it up
    let today = chrono::Utc::now().date_naive();
    seed_transaction(
        &db,
        user.id,
        TransactionKind::Expense,
        "Food",
        75.0,
        &today.to_string(),
    );

    let response = app.oneshot(get("/api/budgets", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let budgets = json.as_array().unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0]["category"], "Food");
    assert_eq!(budgets[0]["amount"], 300.0);
    assert_eq!(budgets[0]["spent"], 75.0);
    assert_eq!(budgets[0]["period"], "monthly");
}

// ========== Goal API Tests ==========

#[tokio::test]
async fn test_goal_crud() {
    let (db, app) = setup_test_app();
    let (_user, token) = seeded_user(&db, "goal@example.com", Role::User);

    let body = serde_json::json!({
        "title": "Emergency fund",
        "targetAmount": 5000.0,
        "deadline": "2025-06-01",
        "description": "Six months of expenses"
    });
    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/goals", Some(&token), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let goal = get_body_json(response).await;
    assert_eq!(goal["currentAmount"], 0.0);
    assert_eq!(goal["completed"], false);
    let id = goal["id"].as_i64().unwrap();

    let body = serde_json::json!({
        "title": "Emergency fund",
        "targetAmount": 5000.0,
        "currentAmount": 5000.0,
        "deadline": "2025-06-01",
        "completed": true
    });
    let response = app
        .clone()
        .oneshot(send_json("PUT", &format!("/api/goals/{}", id), Some(&token), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_json(response).await["completed"], true);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/goals/{}", id))
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ========== Analytics API Tests ==========

fn seed_analytics_fixture(db: &Database, user_id: i64) {
    seed_transaction(db, user_id, TransactionKind::Income, "Salary", 1000.0, "2024-01-05");
    seed_transaction(db, user_id, TransactionKind::Expense, "Food", 200.0, "2024-01-10");
    seed_transaction(db, user_id, TransactionKind::Expense, "Food", 50.0, "2024-01-20");
    seed_transaction(db, user_id, TransactionKind::Expense, "Transport", 75.0, "2024-02-01");
}

#[tokio::test]
async fn test_analytics_with_date_range() {
    let db = Database::in_memory().unwrap();
    let (user, token) = seeded_user(&db, "analytics@example.com", Role::User);
    seed_analytics_fixture(&db, user.id);

    let app = setup_app_with_suggestions(
        &db,
        Some(SuggestionClient::Mock(MockSuggestionBackend::with_suggestions(vec![
            "Consider setting a budget for Food".to_string(),
        ]))),
    );

    let response = app
        .oneshot(get(
            "/api/analytics?startDate=2024-01-01&endDate=2024-01-31",
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["totalIncome"], 1000.0);
    assert_eq!(json["totalExpense"], 250.0);
    assert_eq!(json["balance"], 750.0);
    assert_eq!(json["transactionCount"], 3);
    assert_eq!(json["categoryBreakdown"]["Salary"]["income"], 1000.0);
    assert_eq!(json["categoryBreakdown"]["Salary"]["expense"], 0.0);
    assert_eq!(json["categoryBreakdown"]["Food"]["expense"], 250.0);
    // Transport is outside the range and must not appear at all
    assert!(json["categoryBreakdown"].get("Transport").is_none());
    assert_eq!(
        json["suggestions"],
        serde_json::json!(["Consider setting a budget for Food"])
    );
}

#[tokio::test]
async fn test_analytics_without_range_covers_everything() {
    let db = Database::in_memory().unwrap();
    let (user, token) = seeded_user(&db, "all@example.com", Role::User);
    seed_analytics_fixture(&db, user.id);

    let app = setup_app_with_suggestions(&db, None);

    let response = app.oneshot(get("/api/analytics", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["totalExpense"], 325.0);
    assert_eq!(json["transactionCount"], 4);
    assert_eq!(json["categoryBreakdown"]["Transport"]["expense"], 75.0);
    // No suggestion client configured: empty list, not an error
    assert_eq!(json["suggestions"], serde_json::json!([]));
}

#[tokio::test]
async fn test_analytics_single_bound_applies_no_filter() {
    let db = Database::in_memory().unwrap();
    let (user, token) = seeded_user(&db, "single@example.com", Role::User);
    seed_analytics_fixture(&db, user.id);

    let app = setup_app_with_suggestions(&db, None);

    let response = app
        .oneshot(get("/api/analytics?startDate=2024-02-01", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["transactionCount"], 4);
}

#[tokio::test]
async fn test_analytics_invalid_date_rejected() {
    let db = Database::in_memory().unwrap();
    let (_user, token) = seeded_user(&db, "baddate@example.com", Role::User);
    let app = setup_app_with_suggestions(&db, None);

    let response = app
        .oneshot(get(
            "/api/analytics?startDate=01-01-2024&endDate=2024-01-31",
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analytics_survives_suggestion_failure() {
    let db = Database::in_memory().unwrap();
    let (user, token) = seeded_user(&db, "degrade@example.com", Role::User);
    seed_analytics_fixture(&db, user.id);

    let app = setup_app_with_suggestions(
        &db,
        Some(SuggestionClient::Mock(MockSuggestionBackend::failing())),
    );

    let response = app.oneshot(get("/api/analytics", &token)).await.unwrap();
    // The request still succeeds; only the suggestions are missing
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["suggestions"], serde_json::json!([]));
    assert_eq!(json["totalIncome"], 1000.0);
    assert_eq!(json["totalExpense"], 325.0);
    assert_eq!(json["balance"], 675.0);
    assert_eq!(json["transactionCount"], 4);
}

#[tokio::test]
async fn test_analytics_empty_set() {
    let db = Database::in_memory().unwrap();
    let (_user, token) = seeded_user(&db, "empty@example.com", Role::User);
    let app = setup_app_with_suggestions(
        &db,
        Some(SuggestionClient::Mock(MockSuggestionBackend::new())),
    );

    let response = app.oneshot(get("/api/analytics", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["totalIncome"], 0.0);
    assert_eq!(json["totalExpense"], 0.0);
    assert_eq!(json["balance"], 0.0);
    assert_eq!(json["transactionCount"], 0);
    assert_eq!(json["categoryBreakdown"], serde_json::json!({}));
    assert_eq!(json["suggestions"], serde_json::json!([]));
}

// ========== Admin API Tests ==========

#[tokio::test]
async fn test_admin_routes_reject_regular_users() {
    let (db, app) = setup_test_app();
    let (_user, token) = seeded_user(&db, "pleb@example.com", Role::User);

    let response = app
        .clone()
        .oneshot(get("/api/admin/users", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/admin/users/1")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_lists_users_with_monthly_totals() {
    let (db, app) = setup_test_app();
    let (_admin, admin_token) = seeded_user(&db, "admin@example.com", Role::Admin);
    let (member, _token) = seeded_user(&db, "member@example.com", Role::User);

    let today = chrono::Utc::now().date_naive();
    seed_transaction(&db, member.id, TransactionKind::Income, "Salary", 900.0, &today.to_string());
    seed_transaction(&db, member.id, TransactionKind::Expense, "Food", 120.0, &today.to_string());
    // Last year's spending must not count toward this month
    seed_transaction(&db, member.id, TransactionKind::Expense, "Food", 999.0, "2020-01-01");

    let response = app.oneshot(get("/api/admin/users", &admin_token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let users = json.as_array().unwrap();
    assert_eq!(users.len(), 2);

    let member_row = users
        .iter()
        .find(|u| u["email"] == "member@example.com")
        .unwrap();
    assert_eq!(member_row["totalIncome"], 900.0);
    assert_eq!(member_row["totalExpense"], 120.0);
}

#[tokio::test]
async fn test_admin_deletes_user_and_data() {
    let (db, app) = setup_test_app();
    let (_admin, admin_token) = seeded_user(&db, "admin2@example.com", Role::Admin);
    let (victim, victim_token) = seeded_user(&db, "victim@example.com", Role::User);
    seed_transaction(&db, victim.id, TransactionKind::Expense, "Food", 10.0, "2024-01-01");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/admin/users/{}", victim.id))
                .header("authorization", format!("Bearer {}", admin_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(db.get_user(victim.id).unwrap().is_none());
    assert!(db.list_transactions(victim.id).unwrap().is_empty());

    // The deleted user's still-valid token no longer resolves to an account
    let response = app
        .clone()
        .oneshot(get("/api/auth/me", &victim_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Deleting again is a 404
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/admin/users/{}", victim.id))
                .header("authorization", format!("Bearer {}", admin_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
