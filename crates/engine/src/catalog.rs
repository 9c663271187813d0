//! Catalog store for seeded reference data.
//!
//! Users and products are read-only after initialization except through the
//! explicit create/update operations below. Catalog entities never expire.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use statewise_core::{CurrencyCode, Price, ProductId, UserId};

/// A catalog user (domain type).
///
/// Identity is immutable after creation; `preferences` is a freeform map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Freeform user preferences.
    pub preferences: HashMap<String, Value>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A catalog product (domain type).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Product category (e.g., "electronics").
    pub category: String,
    /// Freeform product attributes.
    pub attributes: HashMap<String, Value>,
}

/// Input for creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Freeform user preferences.
    #[serde(default)]
    pub preferences: HashMap<String, Value>,
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// Unit price amount (currency defaults to USD).
    pub price: Decimal,
    /// Product category.
    pub category: String,
    /// Freeform product attributes.
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
}

/// Partial update for a product. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New unit price amount.
    pub price: Option<Decimal>,
    /// New category.
    pub category: Option<String>,
    /// Replacement attribute map.
    pub attributes: Option<HashMap<String, Value>>,
}

/// Filter fields for product search. All provided fields are ANDed together.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Minimum unit price (inclusive).
    pub min_price: Option<Decimal>,
    /// Maximum unit price (inclusive).
    pub max_price: Option<Decimal>,
    /// Exact category match.
    pub category: Option<String>,
    /// Any additional filter keys, compared by exact equality against the
    /// same-named product attribute.
    pub extra: HashMap<String, Value>,
}

/// In-memory store for catalog reference data.
///
/// Constructed explicitly and passed by reference (or `Arc`) - there is no
/// module-level singleton, so tests can instantiate isolated stores.
#[derive(Debug, Default)]
pub struct CatalogStore {
    users: RwLock<HashMap<UserId, User>>,
    products: RwLock<HashMap<ProductId, Product>>,
}

impl CatalogStore {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog pre-populated with the demonstration fixtures.
    #[must_use]
    pub fn with_demo_data() -> Self {
        let store = Self::new();
        store.seed_demo();
        store
    }

    /// Seed the demonstration users and products.
    ///
    /// Shared by the server startup and the test suites so both operate on
    /// the same fixture set. Existing entries with the same ids are
    /// overwritten.
    pub fn seed_demo(&self) {
        let now = Utc::now();

        let users = [
            demo_user("u1", "Alice Chen", "alice@example.com", &[("theme", "dark")], now),
            demo_user("u2", "Bob Osei", "bob@example.com", &[("theme", "light")], now),
        ];

        let products = [
            demo_product("p1", "Wireless Mouse", 1000, "electronics", &[("color", "black")]),
            demo_product("p2", "Mechanical Keyboard", 8950, "electronics", &[("switches", "brown")]),
            demo_product("p3", "Laptop Stand", 3499, "accessories", &[("material", "aluminum")]),
            demo_product("p4", "USB-C Hub", 2450, "accessories", &[("ports", "7")]),
            demo_product("p5", "Coffee Mug", 1275, "kitchen", &[("capacity_ml", "350")]),
        ];

        let mut user_map = self.users.write();
        for user in users {
            user_map.insert(user.id.clone(), user);
        }
        drop(user_map);

        let mut product_map = self.products.write();
        for product in products {
            product_map.insert(product.id.clone(), product);
        }
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Get a user by ID.
    #[must_use]
    pub fn get_user(&self, id: &UserId) -> Option<User> {
        self.users.read().get(id).cloned()
    }

    /// List all users, sorted by ID (snapshot at call time).
    #[must_use]
    pub fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.read().values().cloned().collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        users
    }

    /// Create a new user with a generated ID.
    pub fn create_user(&self, new: NewUser) -> User {
        let now = Utc::now();
        let user = User {
            id: UserId::generate(),
            name: new.name,
            email: new.email,
            preferences: new.preferences,
            created_at: now,
            updated_at: now,
        };
        self.users.write().insert(user.id.clone(), user.clone());
        user
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Get a product by ID.
    #[must_use]
    pub fn get_product(&self, id: &ProductId) -> Option<Product> {
        self.products.read().get(id).cloned()
    }

    /// List all products, sorted by ID (snapshot at call time).
    #[must_use]
    pub fn list_products(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self.products.read().values().cloned().collect();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        products
    }

    /// Create a new product with a generated ID.
    pub fn create_product(&self, new: NewProduct) -> Product {
        let product = Product {
            id: ProductId::generate(),
            name: new.name,
            price: Price::new(new.price, CurrencyCode::USD),
            category: new.category,
            attributes: new.attributes,
        };
        self.products
            .write()
            .insert(product.id.clone(), product.clone());
        product
    }

    /// Update a product in place. Returns `None` if the product does not exist.
    pub fn update_product(&self, id: &ProductId, update: ProductUpdate) -> Option<Product> {
        let mut products = self.products.write();
        let product = products.get_mut(id)?;

        if let Some(name) = update.name {
            product.name = name;
        }
        if let Some(price) = update.price {
            product.price = Price::new(price, product.price.currency_code);
        }
        if let Some(category) = update.category {
            product.category = category;
        }
        if let Some(attributes) = update.attributes {
            product.attributes = attributes;
        }

        Some(product.clone())
    }

    /// Remove a product from the catalog.
    ///
    /// Returns whether something was actually removed. Carts that already
    /// reference the product keep their snapshot of its name and price.
    pub fn remove_product(&self, id: &ProductId) -> bool {
        self.products.write().remove(id).is_some()
    }

    /// Search products with ANDed filter fields.
    ///
    /// Known looseness, preserved for compatibility: any unrecognized filter
    /// key in [`ProductFilter::extra`] is compared by exact equality against
    /// the same-named product attribute, and a product without that
    /// attribute silently fails the match (no `InvalidFilter` error).
    #[must_use]
    pub fn search_products(&self, filter: &ProductFilter) -> Vec<Product> {
        let mut matches: Vec<Product> = self
            .products
            .read()
            .values()
            .filter(|product| product_matches(product, filter))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        matches
    }
}

/// Whether a product passes every provided filter field.
fn product_matches(product: &Product, filter: &ProductFilter) -> bool {
    if let Some(min) = filter.min_price
        && product.price.amount < min
    {
        return false;
    }
    if let Some(max) = filter.max_price
        && product.price.amount > max
    {
        return false;
    }
    if let Some(ref category) = filter.category
        && product.category != *category
    {
        return false;
    }
    filter
        .extra
        .iter()
        .all(|(key, expected)| product.attributes.get(key) == Some(expected))
}

fn demo_user(
    id: &str,
    name: &str,
    email: &str,
    preferences: &[(&str, &str)],
    now: DateTime<Utc>,
) -> User {
    User {
        id: UserId::new(id),
        name: name.to_owned(),
        email: email.to_owned(),
        preferences: preferences
            .iter()
            .map(|(k, v)| ((*k).to_owned(), Value::String((*v).to_owned())))
            .collect(),
        created_at: now,
        updated_at: now,
    }
}

fn demo_product(
    id: &str,
    name: &str,
    price_minor: i64,
    category: &str,
    attributes: &[(&str, &str)],
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        price: Price::from_minor_units(price_minor, CurrencyCode::USD),
        category: category.to_owned(),
        attributes: attributes
            .iter()
            .map(|(k, v)| ((*k).to_owned(), Value::String((*v).to_owned())))
            .collect(),
    }
}
