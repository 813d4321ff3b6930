//! Shared fixtures for the client integration tests.

#![allow(dead_code)]

use std::time::Duration;

use queledoy_client::{ClientConfig, HttpClient, ListsManager, Session};
use queledoy_core::{Email, Price, Product, ProductId, Role, User, UserId};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

/// Address nothing listens on.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

pub fn config(base_url: &str) -> ClientConfig {
    ClientConfig::new(Url::parse(base_url).expect("valid url"))
        .with_timeout(Duration::from_secs(2))
}

pub fn user(id: i64) -> User {
    User {
        id: UserId::new(id),
        display_name: format!("User {id}"),
        email: Email::parse(&format!("user{id}@example.com")).expect("valid email"),
        role: Role::Customer,
    }
}

pub fn admin(id: i64) -> User {
    User {
        role: Role::Admin,
        ..user(id)
    }
}

pub fn signed_in_session() -> Session {
    let session = Session::new();
    session.sign_in(user(1), SecretString::from(TOKEN));
    session
}

pub fn admin_session() -> Session {
    let session = Session::new();
    session.sign_in(admin(1), SecretString::from(TOKEN));
    session
}

pub fn http_client(base_url: &str, session: Session) -> HttpClient {
    HttpClient::new(&config(base_url), session).expect("http client")
}

/// A manager pointed at the mock server, with a signed-in session.
pub fn manager(server: &MockServer) -> (ListsManager, Session) {
    let session = signed_in_session();
    let manager = ListsManager::from_http(http_client(&server.uri(), session.clone()));
    (manager, session)
}

pub fn mug() -> Product {
    Product::new(
        ProductId::new(42),
        "Mug",
        Price::from_amount(Decimal::new(5000, 0)),
    )
}

/// A list as the backend spells it.
pub fn list_json(id: i64, name: &str, products: &[Value]) -> Value {
    json!({
        "id": id,
        "nombre": name,
        "descripcion": "",
        "productos": products,
    })
}

/// A product as the backend spells it.
pub fn product_json(id: i64, name: &str, price: i64) -> Value {
    json!({
        "id": id,
        "nombre": name,
        "precio": price,
        "categoria": { "nombre": "Cocina" },
    })
}
