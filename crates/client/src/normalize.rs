//! Boundary normalization of backend payloads.
//!
//! The backend (and the older product service it replaced) spell the same
//! field several ways: `nombre`, `nombre_producto` and `name` all mean the
//! product name. Every payload is mapped onto the canonical core types here,
//! once, so nothing past the repository layer ever sees the raw shapes.
//!
//! For each canonical field the candidate keys are tried in order and the
//! first present, non-empty value wins.

use std::str::FromStr;

use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::{Map, Value};
use tracing::warn;

use queledoy_core::{
    Category, CategoryId, DEFAULT_CATEGORY, Email, List, ListId, Price, Product, ProductId, Role,
    User, UserId,
};

use crate::error::ApiError;

const PRODUCT_ID_KEYS: &[&str] = &["id", "_id", "productId", "productoId"];
const PRODUCT_NAME_KEYS: &[&str] = &["nombre", "nombre_producto", "name"];
const PRODUCT_PRICE_KEYS: &[&str] = &["precio", "price"];
const PRODUCT_IMAGE_KEYS: &[&str] = &["url_imagen", "url_producto", "imageUrl", "image", "url"];
const PRODUCT_LINK_KEYS: &[&str] = &["link_mercado", "externalLink", "link"];
const PRODUCT_CATEGORY_KEYS: &[&str] = &["categoria", "category"];
const PRODUCT_FEATURED_KEYS: &[&str] = &["destacado", "featured"];
const CATEGORY_ID_KEYS: &[&str] = &["id", "_id", "codigo_categoria"];
const CATEGORY_NAME_KEYS: &[&str] = &["nombre", "nombre_categoria", "name"];

const LIST_ID_KEYS: &[&str] = &["id", "_id"];
const LIST_NAME_KEYS: &[&str] = &["nombre", "name"];
const LIST_DESCRIPTION_KEYS: &[&str] = &["descripción", "descripcion", "description"];
const LIST_PRODUCTS_KEYS: &[&str] = &["productos", "products"];
const LIST_OWNER_KEYS: &[&str] = &["createdBy", "usuarioId", "usuario_id", "userId", "usuario"];

const USER_ID_KEYS: &[&str] = &["id", "_id", "userId"];
const USER_NAME_KEYS: &[&str] = &["nombre", "nombre_usuario", "name", "displayName"];
const USER_EMAIL_KEYS: &[&str] = &["correo", "correo_usuario", "email"];
const USER_ROLE_KEYS: &[&str] = &["rol", "role", "codigo_rol"];
const USER_WRAPPER_KEYS: &[&str] = &["user", "usuario"];
const TOKEN_KEYS: &[&str] = &["token", "accessToken", "access_token"];

// =============================================================================
// Products
// =============================================================================

/// Normalize a single product payload.
///
/// # Errors
///
/// Returns a malformed-payload error if the value is not an object or has
/// no usable ID.
pub fn product(value: &Value) -> Result<Product, ApiError> {
    let obj = as_object(value, "product")?;

    let id = id_field(obj, PRODUCT_ID_KEYS)
        .map(ProductId::new)
        .ok_or_else(|| ApiError::malformed("product is missing an id"))?;

    Ok(Product {
        id,
        name: string_field(obj, PRODUCT_NAME_KEYS).unwrap_or_default(),
        price: Price::from_amount(decimal_field(obj, PRODUCT_PRICE_KEYS)),
        image_url: string_field(obj, PRODUCT_IMAGE_KEYS),
        external_link: string_field(obj, PRODUCT_LINK_KEYS),
        category: category_field(obj).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        featured: bool_field(obj, PRODUCT_FEATURED_KEYS),
    })
}

/// Normalize an array of products.
///
/// # Errors
///
/// Returns a malformed-payload error if the value is not an array or any
/// element is not a valid product.
pub fn products(value: &Value) -> Result<Vec<Product>, ApiError> {
    as_array(value, "product list")?.iter().map(product).collect()
}

/// Normalize a category entity.
///
/// # Errors
///
/// Returns a malformed-payload error if the value is not an object or has
/// no usable ID or name.
pub fn category(value: &Value) -> Result<Category, ApiError> {
    let obj = as_object(value, "category")?;

    let id = id_field(obj, CATEGORY_ID_KEYS)
        .map(CategoryId::new)
        .ok_or_else(|| ApiError::malformed("category is missing an id"))?;
    let name = string_field(obj, CATEGORY_NAME_KEYS)
        .ok_or_else(|| ApiError::malformed(format!("category {id} is missing a name")))?;

    Ok(Category::new(id, name))
}

/// Normalize an array of categories.
///
/// # Errors
///
/// Fails like [`products`].
pub fn categories(value: &Value) -> Result<Vec<Category>, ApiError> {
    as_array(value, "category list")?.iter().map(category).collect()
}

// =============================================================================
// Lists
// =============================================================================

/// Normalize a single list payload.
///
/// Embedded products without a usable ID are skipped (and logged) rather
/// than failing the whole list; duplicate product IDs keep their first
/// occurrence.
///
/// # Errors
///
/// Returns a malformed-payload error if the value is not an object, or has
/// no usable ID or name.
pub fn list(value: &Value) -> Result<List, ApiError> {
    let obj = as_object(value, "list")?;

    let id = id_field(obj, LIST_ID_KEYS)
        .map(ListId::new)
        .ok_or_else(|| ApiError::malformed("list is missing an id"))?;
    let name = string_field(obj, LIST_NAME_KEYS)
        .ok_or_else(|| ApiError::malformed(format!("list {id} is missing a name")))?;

    let mut list = List::new(
        id,
        name,
        string_field(obj, LIST_DESCRIPTION_KEYS).unwrap_or_default(),
    );
    list.created_by = owner_field(obj);

    if let Some(items) = first_present(obj, LIST_PRODUCTS_KEYS).and_then(Value::as_array) {
        for item in items {
            match product(item) {
                Ok(p) => {
                    list.insert_product(p);
                }
                Err(err) => warn!(list_id = %id, error = %err, "Skipping unreadable list product"),
            }
        }
    }

    Ok(list)
}

/// Normalize an array of lists.
///
/// # Errors
///
/// Returns a malformed-payload error if the value is not an array or any
/// element is not a valid list.
pub fn lists(value: &Value) -> Result<Vec<List>, ApiError> {
    as_array(value, "lists")?.iter().map(list).collect()
}

// =============================================================================
// Users
// =============================================================================

/// Normalize a login/registration response into a [`User`].
///
/// Accepts the user fields either at the top level or nested under `user` /
/// `usuario`.
///
/// # Errors
///
/// Returns a malformed-payload error if the ID or email is missing or the
/// email is invalid.
pub fn user(value: &Value) -> Result<User, ApiError> {
    let top = as_object(value, "user")?;
    let obj = first_present(top, USER_WRAPPER_KEYS)
        .and_then(Value::as_object)
        .unwrap_or(top);

    let id = id_field(obj, USER_ID_KEYS)
        .map(UserId::new)
        .ok_or_else(|| ApiError::malformed("user is missing an id"))?;
    let email = string_field(obj, USER_EMAIL_KEYS)
        .ok_or_else(|| ApiError::malformed("user is missing an email"))?;
    let email = Email::parse(&email).map_err(|e| ApiError::malformed(format!("user email: {e}")))?;

    Ok(User {
        id,
        display_name: string_field(obj, USER_NAME_KEYS)
            .unwrap_or_else(|| email.local_part().to_string()),
        email,
        role: string_field(obj, USER_ROLE_KEYS)
            .map(|r| Role::from_wire(&r))
            .unwrap_or_default(),
    })
}

/// Normalize an array of user accounts.
///
/// # Errors
///
/// Returns a malformed-payload error if the value is not an array or any
/// element is not a valid user.
pub fn users(value: &Value) -> Result<Vec<User>, ApiError> {
    as_array(value, "user list")?.iter().map(user).collect()
}

/// Bearer token from a login/registration response, if present.
#[must_use]
pub fn token(value: &Value) -> Option<SecretString> {
    let obj = value.as_object()?;
    string_field(obj, TOKEN_KEYS).map(SecretString::from)
}

// =============================================================================
// Field helpers
// =============================================================================

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>, ApiError> {
    value
        .as_object()
        .ok_or_else(|| ApiError::malformed(format!("expected {what} object, got {}", type_name(value))))
}

fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, ApiError> {
    value
        .as_array()
        .ok_or_else(|| ApiError::malformed(format!("expected {what} array, got {}", type_name(value))))
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// First value under any of `keys` that is not null or a blank string.
fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        })
}

fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

fn id_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(id_value)
}

fn id_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        // Nested references such as `"usuario": {"id": 3}`
        Value::Object(obj) => obj.get("id").and_then(id_value),
        _ => None,
    }
}

/// Decimal amount; anything missing or unreadable counts as zero.
fn decimal_field(obj: &Map<String, Value>, keys: &[&str]) -> Decimal {
    let Some(value) = first_present(obj, keys) else {
        return Decimal::ZERO;
    };

    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Decimal::ZERO,
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .unwrap_or(Decimal::ZERO)
}

fn bool_field(obj: &Map<String, Value>, keys: &[&str]) -> bool {
    first_present(obj, keys).is_some_and(|value| match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "si" | "sí"),
        _ => false,
    })
}

/// Category as a plain string or a nested category object.
fn category_field(obj: &Map<String, Value>) -> Option<String> {
    match first_present(obj, PRODUCT_CATEGORY_KEYS)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Object(category) => string_field(category, CATEGORY_NAME_KEYS),
        _ => None,
    }
}

fn owner_field(obj: &Map<String, Value>) -> Option<UserId> {
    LIST_OWNER_KEYS
        .iter()
        .filter_map(|key| obj.get(*key))
        .find_map(id_value)
        .map(UserId::new)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_spanish_spelling() {
        let p = product(&json!({
            "id": 42,
            "nombre": "Mug",
            "precio": 5000,
            "url_imagen": "https://img.example/mug.png",
            "link_mercado": "articulo.mercadolibre.cl/MLC-1",
            "categoria": "Cocina",
            "destacado": true
        }))
        .unwrap();

        assert_eq!(p.id, ProductId::new(42));
        assert_eq!(p.name, "Mug");
        assert_eq!(p.price.amount, Decimal::new(5000, 0));
        assert_eq!(p.image_url.as_deref(), Some("https://img.example/mug.png"));
        assert_eq!(p.external_link.as_deref(), Some("articulo.mercadolibre.cl/MLC-1"));
        assert_eq!(p.category, "Cocina");
        assert!(p.featured);
    }

    #[test]
    fn test_product_english_spelling() {
        let p = product(&json!({
            "id": "7",
            "name": "Lamp",
            "price": "19990",
            "image": "lamp.png",
            "link": "https://shop.example/lamp",
            "category": "Hogar"
        }))
        .unwrap();

        assert_eq!(p.id, ProductId::new(7));
        assert_eq!(p.name, "Lamp");
        assert_eq!(p.price.amount, Decimal::new(19990, 0));
        assert_eq!(p.image_url.as_deref(), Some("lamp.png"));
        assert_eq!(p.category, "Hogar");
        assert!(!p.featured);
    }

    #[test]
    fn test_product_priority_skips_blank_values() {
        let p = product(&json!({
            "id": 1,
            "nombre": "",
            "nombre_producto": "Taza",
            "name": "Cup",
            "url_imagen": null,
            "url_producto": "p.png"
        }))
        .unwrap();

        assert_eq!(p.name, "Taza");
        assert_eq!(p.image_url.as_deref(), Some("p.png"));
    }

    #[test]
    fn test_product_defaults() {
        let p = product(&json!({"_id": 3})).unwrap();
        assert_eq!(p.id, ProductId::new(3));
        assert!(p.price.is_zero());
        assert_eq!(p.category, DEFAULT_CATEGORY);
        assert!(p.image_url.is_none());
    }

    #[test]
    fn test_product_unreadable_price_is_zero() {
        let p = product(&json!({"id": 3, "precio": "gratis"})).unwrap();
        assert!(p.price.is_zero());
    }

    #[test]
    fn test_product_category_object() {
        let p = product(&json!({"id": 3, "categoria": {"id": 2, "nombre_categoria": "Juguetes"}}))
            .unwrap();
        assert_eq!(p.category, "Juguetes");
    }

    #[test]
    fn test_product_without_id_is_malformed() {
        let err = product(&json!({"nombre": "Mug"})).unwrap_err();
        assert!(matches!(err, ApiError::Server { status: None, .. }));
    }

    #[test]
    fn test_products_requires_array() {
        assert!(products(&json!({"id": 1})).is_err());
        assert_eq!(products(&json!([{"id": 1}, {"id": 2}])).unwrap().len(), 2);
    }

    #[test]
    fn test_list_spanish_spelling() {
        let l = list(&json!({
            "id": 7,
            "nombre": "Birthday",
            "descripción": "Ideas",
            "usuarioId": 3,
            "productos": [{"id": 42, "nombre": "Mug", "precio": 5000}]
        }))
        .unwrap();

        assert_eq!(l.id, ListId::new(7));
        assert_eq!(l.name, "Birthday");
        assert_eq!(l.description, "Ideas");
        assert_eq!(l.created_by, Some(UserId::new(3)));
        assert_eq!(l.products.len(), 1);
        assert_eq!(l.products[0].name, "Mug");
    }

    #[test]
    fn test_list_english_spelling_without_products() {
        let l = list(&json!({"id": 8, "name": "Xmas", "description": "", "createdBy": {"id": 5}}))
            .unwrap();

        assert_eq!(l.name, "Xmas");
        assert!(l.products.is_empty());
        assert_eq!(l.created_by, Some(UserId::new(5)));
    }

    #[test]
    fn test_list_collapses_duplicate_products() {
        let l = list(&json!({
            "id": 1,
            "nombre": "Dupes",
            "productos": [{"id": 1, "nombre": "A"}, {"id": 1, "nombre": "B"}, {"id": 2}]
        }))
        .unwrap();

        assert_eq!(l.products.len(), 2);
        assert_eq!(l.products[0].name, "A");
    }

    #[test]
    fn test_list_skips_products_without_id() {
        let l = list(&json!({"id": 1, "nombre": "L", "productos": [{"nombre": "?"}, {"id": 9}]}))
            .unwrap();
        assert_eq!(l.products.len(), 1);
        assert_eq!(l.products[0].id, ProductId::new(9));
    }

    #[test]
    fn test_list_without_name_is_malformed() {
        assert!(list(&json!({"id": 1, "nombre": "  "})).is_err());
        assert!(list(&json!({"nombre": "No id"})).is_err());
    }

    #[test]
    fn test_user_flat_response() {
        let u = user(&json!({
            "id": 1,
            "nombre": "Ana",
            "correo": "ana@example.com",
            "rol": "ADMIN",
            "token": "abc"
        }))
        .unwrap();

        assert_eq!(u.id, UserId::new(1));
        assert_eq!(u.display_name, "Ana");
        assert_eq!(u.email.as_str(), "ana@example.com");
        assert!(u.is_admin());
    }

    #[test]
    fn test_user_nested_response() {
        let value = json!({
            "token": "abc",
            "usuario": {"id": 2, "nombre_usuario": "Beto", "correo_usuario": "beto@example.com"}
        });
        let u = user(&value).unwrap();
        assert_eq!(u.display_name, "Beto");
        assert_eq!(u.role, Role::Customer);
        assert_eq!(token(&value).unwrap().expose_secret(), "abc");
    }

    #[test]
    fn test_user_invalid_email_is_malformed() {
        assert!(user(&json!({"id": 1, "correo": "nope"})).is_err());
    }

    #[test]
    fn test_categories_spellings() {
        let categories = categories(&json!([
            { "id": 1, "nombre": "Cocina" },
            { "codigo_categoria": "2", "nombre_categoria": "Tecnología" },
        ]))
        .unwrap();
        assert_eq!(
            categories,
            vec![
                Category::new(CategoryId::new(1), "Cocina"),
                Category::new(CategoryId::new(2), "Tecnología"),
            ]
        );
        assert!(category(&json!({ "id": 3 })).is_err());
    }

    #[test]
    fn test_users_array() {
        let users = users(&json!([
            { "id": 1, "nombre": "Ana", "correo": "ana@example.com", "rol": "admin" },
            { "id": 2, "correo_usuario": "luis@example.com" },
        ]))
        .unwrap();
        assert_eq!(users.len(), 2);
        assert!(users[0].is_admin());
        assert_eq!(users[1].display_name, "luis");
        assert!(super::users(&json!({ "id": 1 })).is_err());
    }

    #[test]
    fn test_token_missing() {
        assert!(token(&json!({"id": 1})).is_none());
        assert!(token(&json!({"token": ""})).is_none());
    }
}
