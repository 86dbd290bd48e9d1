//! Black-box API tests: the real router on an ephemeral port, driven over
//! HTTP against the in-memory backend. The backend models the external
//! database's atomic procedures, which are the authoritative enforcement
//! point for the rental cap and stock; these tests drive them through the
//! whole stack.

use reqwest::StatusCode;
use serde_json::{json, Value};

use videoclub_api::app::services::{in_memory_services, InMemoryHandles};
use videoclub_api::config::{AppEnv, Config};

struct TestServer {
    base_url: String,
    handles: InMemoryHandles,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let config = Config {
            backend_url: None,
            service_key: None,
            frontend_url: None,
            port: 0,
            env: AppEnv::Development,
            force_in_memory: true,
        };
        let (services, handles) = in_memory_services(config.env_name());
        let app = videoclub_api::app::build_app(&config, services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handles, handle }
    }

    fn api(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn register(srv: &TestServer, email: &str, name: &str) -> Value {
    let res = reqwest::Client::new()
        .post(srv.api("/auth/register"))
        .json(&json!({ "email": email, "password": "password1", "nombre": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn login(srv: &TestServer, email: &str) -> String {
    let res = reqwest::Client::new()
        .post(srv.api("/auth/login"))
        .json(&json!({ "email": email, "password": "password1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    body["data"]["token"].as_str().unwrap().to_string()
}

/// Register + out-of-band promotion at the identity provider + login.
async fn admin_token(srv: &TestServer) -> String {
    register(srv, "admin@videoclub.test", "Admin").await;
    assert!(srv.handles.identity.promote_to_admin("admin@videoclub.test"));
    login(srv, "admin@videoclub.test").await
}

fn movie_body(title: &str, genre: &str, stock: u32) -> Value {
    json!({
        "titulo": title,
        "genero": genre,
        "stock_total": stock,
        "stock_disponible": stock,
        "precio_alquiler": 3.5,
    })
}

async fn create_movie(srv: &TestServer, token: &str, title: &str, genre: &str, stock: u32) -> String {
    let res = reqwest::Client::new()
        .post(srv.api("/movies"))
        .bearer_auth(token)
        .json(&movie_body(title, genre, stock))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn rent(srv: &TestServer, token: &str, movie_id: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(srv.api("/rentals"))
        .bearer_auth(token)
        .json(&json!({ "pelicula_id": movie_id }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok_with_environment() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["environment"], "development");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn unmatched_routes_get_the_standard_not_found_body() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/api/v1/nothing/here", srv.base_url))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("no encontrada"));
}

#[tokio::test]
async fn register_login_rent_and_see_it_active() {
    let srv = TestServer::spawn().await;
    let admin = admin_token(&srv).await;
    let matrix = create_movie(&srv, &admin, "Matrix", "Ciencia Ficción", 2).await;

    let registered = register(&srv, "a@x.com", "Ana").await;
    assert_eq!(registered["data"]["user"]["role"], "user");

    let token = login(&srv, "a@x.com").await;

    let res = rent(&srv, &token, &matrix).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["alquiler"]["devuelto"], false);
    assert_eq!(body["data"]["pelicula"]["titulo"], "Matrix");

    let res = reqwest::Client::new()
        .get(srv.api("/rentals/active"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["peliculas"]["titulo"], "Matrix");
    assert_eq!(body["data"][0]["devuelto"], false);
}

#[tokio::test]
async fn me_echoes_the_authenticated_identity() {
    let srv = TestServer::spawn().await;
    register(&srv, "a@x.com", "Ana").await;
    let token = login(&srv, "a@x.com").await;

    let res = reqwest::Client::new()
        .get(srv.api("/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["user"]["email"], "a@x.com");
    assert_eq!(body["data"]["user"]["nombre"], "Ana");
}

#[tokio::test]
async fn logout_invalidates_the_token() {
    let srv = TestServer::spawn().await;
    register(&srv, "a@x.com", "Ana").await;
    let token = login(&srv, "a@x.com").await;

    let client = reqwest::Client::new();
    let res = client
        .post(srv.api("/auth/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(srv.api("/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_and_malformed_credentials_are_unauthorized() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.api("/rentals/active")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(srv.api("/rentals/active"))
        .header("Authorization", "Token abc")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(srv.api("/rentals/active"))
        .bearer_auth("tok-unknown")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_users_and_anonymous_callers() {
    let srv = TestServer::spawn().await;
    register(&srv, "a@x.com", "Ana").await;
    let token = login(&srv, "a@x.com").await;
    let client = reqwest::Client::new();

    // No credential at all: the auth gate answers first.
    let res = client
        .post(srv.api("/movies"))
        .json(&movie_body("Matrix", "Ciencia Ficción", 1))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Authenticated but the wrong role.
    let res = client
        .post(srv.api("/movies"))
        .bearer_auth(&token)
        .json(&movie_body("Matrix", "Ciencia Ficción", 1))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client.get(srv.api("/rentals")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn movie_validation_collects_every_violation() {
    let srv = TestServer::spawn().await;
    let admin = admin_token(&srv).await;

    let res = reqwest::Client::new()
        .post(srv.api("/movies"))
        .bearer_auth(&admin)
        .json(&json!({ "genero": "Drama", "stock_total": -1, "precio_alquiler": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("El título es requerido"));
    assert!(message.contains("El stock total no puede ser negativo"));
    assert!(message.contains("El stock disponible es requerido"));
    assert!(message.contains("El precio debe ser mayor a 0"));
}

#[tokio::test]
async fn undeclared_fields_are_stripped_before_storage() {
    let srv = TestServer::spawn().await;
    let admin = admin_token(&srv).await;

    let mut body = movie_body("Matrix", "Ciencia Ficción", 1);
    body["campo_desconocido"] = json!("se descarta");
    let res = reqwest::Client::new()
        .post(srv.api("/movies"))
        .bearer_auth(&admin)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert!(created["data"].get("campo_desconocido").is_none());
}

#[tokio::test]
async fn listing_paginates_ordered_by_title() {
    let srv = TestServer::spawn().await;
    let admin = admin_token(&srv).await;
    for title in ["Zoolander", "Alien", "Matrix", "Amélie", "Casablanca"] {
        create_movie(&srv, &admin, title, "Variado", 1).await;
    }

    let res = reqwest::get(format!("{}?page=1&limit=2", srv.api("/movies")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let rows = body["data"].as_array().unwrap();
    assert!(rows.len() <= 2);
    assert_eq!(rows[0]["titulo"], "Alien");
    assert_eq!(rows[1]["titulo"], "Amélie");
    assert_eq!(body["pagination"]["total"], 5);
    assert_eq!(body["pagination"]["totalPages"], 3);

    // Last page holds the remainder.
    let res = reqwest::get(format!("{}?page=3&limit=2", srv.api("/movies")))
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["titulo"], "Zoolander");
}

#[tokio::test]
async fn genre_filter_is_case_insensitive_substring() {
    let srv = TestServer::spawn().await;
    let admin = admin_token(&srv).await;
    create_movie(&srv, &admin, "Matrix", "Ciencia Ficción", 1).await;
    create_movie(&srv, &admin, "Casablanca", "Drama", 1).await;

    let res = reqwest::get(format!("{}?genero=cien", srv.api("/movies")))
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["titulo"], "Matrix");
}

#[tokio::test]
async fn unknown_movie_is_not_found() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.api("/movies/00000000-0000-7000-8000-000000000000"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rental_cap_blocks_the_fourth_rental() {
    let srv = TestServer::spawn().await;
    let admin = admin_token(&srv).await;
    register(&srv, "a@x.com", "Ana").await;
    let token = login(&srv, "a@x.com").await;

    for i in 0..3 {
        let id = create_movie(&srv, &admin, &format!("Película {i}"), "Drama", 1).await;
        assert_eq!(rent(&srv, &token, &id).await.status(), StatusCode::CREATED);
    }

    let fourth = create_movie(&srv, &admin, "Una Más", "Drama", 1).await;
    let res = rent(&srv, &token, &fourth).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("límite"));

    // No fourth record was created.
    let res = reqwest::Client::new()
        .get(srv.api("/rentals/active"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["count"], 3);
}

#[tokio::test]
async fn renting_without_stock_fails_and_leaves_stock_untouched() {
    let srv = TestServer::spawn().await;
    let admin = admin_token(&srv).await;
    let movie = create_movie(&srv, &admin, "Agotada", "Drama", 0).await;
    register(&srv, "a@x.com", "Ana").await;
    let token = login(&srv, "a@x.com").await;

    let res = rent(&srv, &token, &movie).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("copias disponibles"));

    let res = reqwest::get(srv.api(&format!("/movies/{movie}"))).await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["stock_disponible"], 0);
}

#[tokio::test]
async fn renting_the_same_movie_twice_is_rejected() {
    let srv = TestServer::spawn().await;
    let admin = admin_token(&srv).await;
    let movie = create_movie(&srv, &admin, "Matrix", "Ciencia Ficción", 3).await;
    register(&srv, "a@x.com", "Ana").await;
    let token = login(&srv, "a@x.com").await;

    assert_eq!(rent(&srv, &token, &movie).await.status(), StatusCode::CREATED);
    let res = rent(&srv, &token, &movie).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("Ya tienes"));
}

#[tokio::test]
async fn renting_an_unknown_movie_is_not_found() {
    let srv = TestServer::spawn().await;
    register(&srv, "a@x.com", "Ana").await;
    let token = login(&srv, "a@x.com").await;

    let res = rent(&srv, &token, "00000000-0000-7000-8000-000000000000").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rental_body_must_carry_a_uuid() {
    let srv = TestServer::spawn().await;
    register(&srv, "a@x.com", "Ana").await;
    let token = login(&srv, "a@x.com").await;

    let res = rent(&srv, &token, "matrix").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("UUID válido"));
}

#[tokio::test]
async fn return_flow_restores_stock_and_is_terminal() {
    let srv = TestServer::spawn().await;
    let admin = admin_token(&srv).await;
    let movie = create_movie(&srv, &admin, "Matrix", "Ciencia Ficción", 1).await;
    register(&srv, "a@x.com", "Ana").await;
    let token = login(&srv, "a@x.com").await;

    let res = rent(&srv, &token, &movie).await;
    let body: Value = res.json().await.unwrap();
    let rental_id = body["data"]["alquiler"]["id"].as_str().unwrap().to_string();

    let client = reqwest::Client::new();
    let res = client
        .post(srv.api(&format!("/rentals/{rental_id}/return")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Stock came back.
    let res = reqwest::get(srv.api(&format!("/movies/{movie}"))).await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["stock_disponible"], 1);

    // A second return is rejected and the rental stays returned.
    let res = client
        .post(srv.api(&format!("/rentals/{rental_id}/return")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(srv.api("/rentals/history"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["devuelto"], true);
}

#[tokio::test]
async fn returning_someone_elses_rental_is_not_found() {
    let srv = TestServer::spawn().await;
    let admin = admin_token(&srv).await;
    let movie = create_movie(&srv, &admin, "Matrix", "Ciencia Ficción", 2).await;

    register(&srv, "a@x.com", "Ana").await;
    let ana = login(&srv, "a@x.com").await;
    register(&srv, "b@x.com", "Bruno").await;
    let bruno = login(&srv, "b@x.com").await;

    let res = rent(&srv, &ana, &movie).await;
    let body: Value = res.json().await.unwrap();
    let rental_id = body["data"]["alquiler"]["id"].as_str().unwrap().to_string();

    let res = reqwest::Client::new()
        .post(srv.api(&format!("/rentals/{rental_id}/return")))
        .bearer_auth(&bruno)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_movie_with_active_rentals_is_blocked() {
    let srv = TestServer::spawn().await;
    let admin = admin_token(&srv).await;
    let movie = create_movie(&srv, &admin, "Matrix", "Ciencia Ficción", 1).await;
    register(&srv, "a@x.com", "Ana").await;
    let token = login(&srv, "a@x.com").await;

    let res = rent(&srv, &token, &movie).await;
    let body: Value = res.json().await.unwrap();
    let rental_id = body["data"]["alquiler"]["id"].as_str().unwrap().to_string();

    let client = reqwest::Client::new();
    let res = client
        .delete(srv.api(&format!("/movies/{movie}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // After the return the delete goes through and the movie is gone.
    client
        .post(srv.api(&format!("/rentals/{rental_id}/return")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let res = client
        .delete(srv.api(&format!("/movies/{movie}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = reqwest::get(srv.api(&format!("/movies/{movie}"))).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_sees_all_rentals_across_renters() {
    let srv = TestServer::spawn().await;
    let admin = admin_token(&srv).await;
    let m1 = create_movie(&srv, &admin, "Matrix", "Ciencia Ficción", 1).await;
    let m2 = create_movie(&srv, &admin, "Alien", "Terror", 1).await;

    register(&srv, "a@x.com", "Ana").await;
    let ana = login(&srv, "a@x.com").await;
    register(&srv, "b@x.com", "Bruno").await;
    let bruno = login(&srv, "b@x.com").await;

    rent(&srv, &ana, &m1).await;
    rent(&srv, &bruno, &m2).await;

    let res = reqwest::Client::new()
        .get(srv.api("/rentals"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["count"], 2);
    // Renter ids are exposed to the admin.
    assert!(body["data"][0].get("perfil_id").is_some());
}

#[tokio::test]
async fn duplicate_registration_is_rejected_with_the_provider_message() {
    let srv = TestServer::spawn().await;
    register(&srv, "a@x.com", "Ana").await;

    let res = reqwest::Client::new()
        .post(srv.api("/auth/register"))
        .json(&json!({ "email": "a@x.com", "password": "password1", "nombre": "Ana" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("already registered"));
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let srv = TestServer::spawn().await;
    register(&srv, "a@x.com", "Ana").await;

    let res = reqwest::Client::new()
        .post(srv.api("/auth/login"))
        .json(&json!({ "email": "a@x.com", "password": "wrong-pass" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
