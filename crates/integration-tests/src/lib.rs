//! Integration tests for Shopfront.
//!
//! [`MockBackend`] serves the shop REST API from memory on `127.0.0.1:0`,
//! so the tests drive the real `ApiClient` and services over HTTP without
//! any external process.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth_session` - Login, logout, and admin sessions
//! - `cart_sync` - Cart mutations and the cached cart
//! - `catalog` - Listing filters and catalogue caching
//! - `orders_workflow` - Checkout and admin order management
//! - `favourites` - Signed-in and guest favourites
//! - `admin_products` - Multipart product uploads
//! - `analytics` - The admin dashboard

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Multipart, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Method};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use shopfront_client::{
    ApiClient, LocalStorage, MemoryNotifier, Shopfront, Store, TransitionPolicy,
};
use shopfront_core::cart::{CartLine, CartProduct};
use shopfront_core::catalog::{Product, ProductImage};
use shopfront_core::favourite::FavouriteItem;
use shopfront_core::order::Order;
use shopfront_core::types::{ImageId, OrderId, OrderStatus, Price, ProductId, Role};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub use axum::http::StatusCode;

type Shared = Arc<Mutex<MockState>>;

/// One request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path below the `/api` prefix, e.g. `cart/addItemCart`.
    pub path: String,
    pub bearer: Option<String>,
    pub request_id: Option<String>,
}

/// A product form received by the admin product endpoints.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub fields: Vec<(String, String)>,
    pub files: Vec<String>,
}

impl Upload {
    /// First value of a text field.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value of a repeated text field, in order.
    #[must_use]
    pub fn all(&self, key: &str) -> Vec<String> {
        self.fields
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }
}

#[derive(Debug, Clone)]
struct Account {
    id: String,
    password: String,
    role: Role,
}

#[derive(Default)]
struct MockState {
    accounts: HashMap<String, Account>,
    /// token -> username
    sessions: HashMap<String, String>,
    products: Vec<Product>,
    carts: HashMap<String, Vec<CartLine>>,
    /// (owner, order)
    orders: Vec<(String, Order)>,
    favourites: HashMap<String, Vec<FavouriteItem>>,
    analytics: HashMap<String, Value>,
    requests: Vec<RecordedRequest>,
    uploads: Vec<Upload>,
    fail_next: Option<(StatusCode, String)>,
}

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Backend handle
// =============================================================================

/// The in-process shop backend. Stops when dropped.
pub struct MockBackend {
    addr: SocketAddr,
    state: Shared,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState {
            analytics: default_analytics(),
            ..MockState::default()
        }));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener
            .local_addr()
            .expect("Failed to read mock backend address");

        let app = router(Arc::clone(&state));
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Register an account directly and return its user id.
    pub fn add_account(&self, username: &str, password: &str, role: Role) -> String {
        let id = uuid::Uuid::new_v4().simple().to_string();
        lock(&self.state).accounts.insert(
            username.to_string(),
            Account {
                id: id.clone(),
                password: password.to_string(),
                role,
            },
        );
        id
    }

    pub fn add_product(&self, product: Product) {
        lock(&self.state).products.push(product);
    }

    /// Answer the next request with `status` and `{message}`.
    pub fn fail_next(&self, status: StatusCode, message: &str) {
        lock(&self.state).fail_next = Some((status, message.to_string()));
    }

    pub fn set_analytics(&self, section: &str, value: Value) {
        lock(&self.state)
            .analytics
            .insert(section.to_string(), value);
    }

    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    /// Requests whose path starts with `prefix`.
    #[must_use]
    pub fn requests_to(&self, prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with(prefix))
            .collect()
    }

    #[must_use]
    pub fn uploads(&self) -> Vec<Upload> {
        lock(&self.state).uploads.clone()
    }

    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        lock(&self.state).products.clone()
    }

    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        lock(&self.state)
            .orders
            .iter()
            .map(|(_, order)| order.clone())
            .collect()
    }

    #[must_use]
    pub fn cart_of(&self, username: &str) -> Vec<CartLine> {
        lock(&self.state)
            .carts
            .get(username)
            .cloned()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn favourites_of(&self, username: &str) -> Vec<FavouriteItem> {
        lock(&self.state)
            .favourites
            .get(username)
            .cloned()
            .unwrap_or_default()
    }

    /// A client with fresh local storage.
    pub async fn shop(&self, policy: TransitionPolicy) -> (Shopfront, Arc<MemoryNotifier>) {
        self.shop_in(&temp_dir(), policy).await
    }

    /// A client whose local storage lives in `dir`.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built or storage cannot be read.
    pub async fn shop_in(&self, dir: &Path, policy: TransitionPolicy) -> (Shopfront, Arc<MemoryNotifier>) {
        let base = url::Url::parse(&self.base_url()).expect("Mock URL is valid");
        let api = ApiClient::new(&base, Duration::from_secs(300)).expect("Failed to build client");
        let store = Store::load(LocalStorage::open(dir))
            .await
            .expect("Failed to load store");
        let notifier = Arc::new(MemoryNotifier::new());
        let shop = Shopfront::new(api, store, notifier.clone(), policy).await;
        (shop, notifier)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// A fresh directory path for local storage.
#[must_use]
pub fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("shopfront-test-{}", uuid::Uuid::new_v4()))
}

/// A catalogue product with the fields the tests care about.
#[must_use]
pub fn product(id: &str, name: &str, price: Decimal, category: &str, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: format!("{name} description"),
        price: Price::new(price),
        category: category.to_string(),
        stock,
        in_stock: stock > 0,
        images: vec![ProductImage {
            url: format!("https://cdn.test/{id}.jpg"),
            public_id: Some(ImageId::new(id)),
        }],
        features: Vec::new(),
        sizes: Vec::new(),
        featured: false,
        reviews: Vec::new(),
        rating: None,
    }
}

// =============================================================================
// Routes
// =============================================================================

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/admin-login", post(admin_login))
        .route("/api/products/getAllProducts", get(all_products))
        .route("/api/products/getFeaturedProducts", get(featured_products))
        .route("/api/cart/getCartItems", get(cart_items))
        .route("/api/cart/addItemCart", post(add_to_cart))
        .route("/api/cart/updateQuantity", put(update_quantity))
        .route("/api/cart/remove/{id}", delete(remove_from_cart))
        .route("/api/cart/clear", delete(clear_cart))
        .route("/api/orders/getOrders", get(my_orders))
        .route("/api/orders/placeOrder", post(place_order))
        .route("/api/orders/getAllOrders", get(all_orders))
        .route("/api/admin/updateOrderStatus", patch(update_order_status))
        .route("/api/admin/deleteOrder/{id}", delete(delete_order))
        .route("/api/admin/createProduct", post(create_product))
        .route("/api/admin/updateProduct/{id}", put(update_product))
        .route("/api/admin/deleteProduct/{id}", delete(delete_product))
        .route("/api/user/{id}/favourites", get(favourites))
        .route("/api/favourites/add", post(add_favourite))
        .route("/api/favourites/remove/{id}", delete(remove_favourite))
        .route("/api/analytics/{section}", get(analytics))
        .layer(middleware::from_fn_with_state(Arc::clone(&state), record))
        .with_state(state)
}

/// Log every request and apply an injected failure, if any.
async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let injected = {
        let mut s = lock(&state);
        let headers = request.headers();
        s.requests.push(RecordedRequest {
            method: request.method().clone(),
            path: request
                .uri()
                .path()
                .trim_start_matches("/api/")
                .to_string(),
            bearer: headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(str::to_owned),
            request_id: headers
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned),
        });
        s.fail_next.take()
    };
    if let Some((status, message)) = injected {
        return reject(status, &message);
    }
    next.run(request).await
}

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

/// The signed-in username and role for a request.
fn caller(s: &MockState, headers: &HeaderMap) -> Result<(String, Role), Response> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Not authorized, no token"))?;
    let username = s
        .sessions
        .get(token)
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Not authorized, token failed"))?;
    let role = s.accounts.get(username).map(|a| a.role).unwrap_or_default();
    Ok((username.clone(), role))
}

fn require_admin(s: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    match caller(s, headers)? {
        (_, Role::Admin) => Ok(()),
        (_, Role::User) => Err(reject(StatusCode::FORBIDDEN, "Access denied. Not an admin.")),
    }
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginBody {
    username: String,
    password: String,
    #[serde(default)]
    #[allow(dead_code)]
    remember_me: bool,
}

fn open_session(s: &mut MockState, username: &str) -> String {
    let token = uuid::Uuid::new_v4().to_string();
    s.sessions.insert(token.clone(), username.to_string());
    token
}

fn check_password<'a>(s: &'a MockState, body: &LoginBody) -> Result<&'a Account, Response> {
    s.accounts
        .get(&body.username)
        .filter(|a| a.password == body.password)
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Invalid username or password"))
}

async fn login(State(state): State<Shared>, Json(body): Json<LoginBody>) -> Response {
    let mut s = lock(&state);
    let account = match check_password(&s, &body) {
        Ok(account) => account.clone(),
        Err(r) => return r,
    };
    let token = open_session(&mut s, &body.username);
    Json(json!({
        "_id": account.id,
        "username": body.username,
        "token": token,
        "role": account.role,
    }))
    .into_response()
}

async fn register(State(state): State<Shared>, Json(body): Json<LoginBody>) -> Response {
    let mut s = lock(&state);
    if s.accounts.contains_key(&body.username) {
        return reject(StatusCode::BAD_REQUEST, "User already exists");
    }
    let id = uuid::Uuid::new_v4().simple().to_string();
    s.accounts.insert(
        body.username.clone(),
        Account {
            id: id.clone(),
            password: body.password.clone(),
            role: Role::User,
        },
    );
    let token = open_session(&mut s, &body.username);
    (
        StatusCode::CREATED,
        Json(json!({ "_id": id, "username": body.username, "token": token })),
    )
        .into_response()
}

/// Answers for any valid account; the client refuses non-admin roles.
async fn admin_login(State(state): State<Shared>, Json(body): Json<LoginBody>) -> Response {
    let mut s = lock(&state);
    let account = match check_password(&s, &body) {
        Ok(account) => account.clone(),
        Err(r) => return r,
    };
    let token = open_session(&mut s, &body.username);
    Json(json!({
        "token": token,
        "admin": { "username": body.username, "role": account.role },
    }))
    .into_response()
}

// =============================================================================
// Catalogue
// =============================================================================

async fn all_products(State(state): State<Shared>) -> Response {
    let s = lock(&state);
    Json(json!({ "products": s.products })).into_response()
}

async fn featured_products(State(state): State<Shared>) -> Response {
    let s = lock(&state);
    let featured: Vec<&Product> = s.products.iter().filter(|p| p.featured).collect();
    Json(featured).into_response()
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddItem {
    product_id: ProductId,
    quantity: Option<u32>,
    size: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetQuantity {
    product_id: ProductId,
    quantity: u32,
}

fn items(lines: &[CartLine]) -> Response {
    Json(json!({ "items": lines })).into_response()
}

fn cart_product(product: &Product) -> CartProduct {
    CartProduct {
        id: product.id.clone(),
        name: product.name.clone(),
        price: product.price,
        images: product.images.clone(),
    }
}

async fn cart_items(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let s = lock(&state);
    match caller(&s, &headers) {
        Ok((user, _)) => items(s.carts.get(&user).map(Vec::as_slice).unwrap_or_default()),
        Err(r) => r,
    }
}

async fn add_to_cart(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<AddItem>,
) -> Response {
    let mut s = lock(&state);
    let user = match caller(&s, &headers) {
        Ok((user, _)) => user,
        Err(r) => return r,
    };
    let Some(product) = s.products.iter().find(|p| p.id == body.product_id).cloned() else {
        return reject(StatusCode::NOT_FOUND, "Product not found");
    };
    let quantity = body.quantity.unwrap_or(1);
    let lines = s.carts.entry(user).or_default();
    let in_cart: u32 = lines
        .iter()
        .filter(|l| l.product.id == product.id)
        .map(|l| l.quantity)
        .sum();
    if in_cart + quantity > product.stock {
        return reject(StatusCode::BAD_REQUEST, "Not enough stock");
    }
    match lines
        .iter_mut()
        .find(|l| l.product.id == product.id && l.size == body.size)
    {
        Some(line) => line.quantity += quantity,
        None => lines.push(CartLine {
            product: cart_product(&product),
            quantity,
            size: body.size,
        }),
    }
    items(lines)
}

async fn update_quantity(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<SetQuantity>,
) -> Response {
    let mut s = lock(&state);
    let user = match caller(&s, &headers) {
        Ok((user, _)) => user,
        Err(r) => return r,
    };
    let stock = s
        .products
        .iter()
        .find(|p| p.id == body.product_id)
        .map_or(0, |p| p.stock);
    if body.quantity > stock {
        return reject(StatusCode::BAD_REQUEST, "Not enough stock");
    }
    let lines = s.carts.entry(user).or_default();
    let Some(line) = lines.iter_mut().find(|l| l.product.id == body.product_id) else {
        return reject(StatusCode::NOT_FOUND, "Item not in cart");
    };
    line.quantity = body.quantity;
    items(lines)
}

async fn remove_from_cart(
    State(state): State<Shared>,
    headers: HeaderMap,
    axum::extract::Path(id): axum::extract::Path<ProductId>,
) -> Response {
    let mut s = lock(&state);
    let user = match caller(&s, &headers) {
        Ok((user, _)) => user,
        Err(r) => return r,
    };
    let lines = s.carts.entry(user).or_default();
    lines.retain(|l| l.product.id != id);
    items(lines)
}

async fn clear_cart(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut s = lock(&state);
    match caller(&s, &headers) {
        Ok((user, _)) => {
            s.carts.remove(&user);
            Json(json!({ "message": "Cart cleared" })).into_response()
        }
        Err(r) => r,
    }
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusBody {
    status: OrderStatus,
    order_id: OrderId,
}

async fn my_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let s = lock(&state);
    let user = match caller(&s, &headers) {
        Ok((user, _)) => user,
        Err(r) => return r,
    };
    let mine: Vec<&Order> = s
        .orders
        .iter()
        .filter(|(owner, _)| *owner == user)
        .map(|(_, order)| order)
        .collect();
    Json(mine).into_response()
}

async fn place_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut s = lock(&state);
    let user = match caller(&s, &headers) {
        Ok((user, _)) => user,
        Err(r) => return r,
    };
    if body["orderItems"].as_array().is_none_or(Vec::is_empty) {
        return reject(StatusCode::BAD_REQUEST, "No order items");
    }

    let number = s.orders.len() + 1;
    let order = serde_json::from_value::<Order>(json!({
        "_id": uuid::Uuid::new_v4().simple().to_string(),
        "orderId": format!("ORD-{number:04}"),
        "orderItems": body["orderItems"],
        "status": "pending",
        "totalCost": body["totalCost"],
        "shippingInfo": body["shippingInfo"],
        "paymentMethod": body["paymentMethod"],
        "userInfo": body["userInfo"],
        "date": "2026-10-15T12:00:00Z",
    }));
    let order = match order {
        Ok(order) => order,
        Err(e) => return reject(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    s.carts.remove(&user);
    s.orders.push((user, order.clone()));
    (StatusCode::CREATED, Json(order)).into_response()
}

async fn all_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let s = lock(&state);
    if let Err(r) = require_admin(&s, &headers) {
        return r;
    }
    let orders: Vec<&Order> = s.orders.iter().map(|(_, order)| order).collect();
    Json(json!({ "orders": orders })).into_response()
}

/// Accepts any status; the transition graph is the client's concern.
async fn update_order_status(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<StatusBody>,
) -> Response {
    let mut s = lock(&state);
    if let Err(r) = require_admin(&s, &headers) {
        return r;
    }
    match s.orders.iter_mut().find(|(_, o)| o.id == body.order_id) {
        Some((_, order)) => {
            order.status = body.status;
            Json(json!({ "message": "Order status updated" })).into_response()
        }
        None => reject(StatusCode::NOT_FOUND, "Order not found"),
    }
}

async fn delete_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    axum::extract::Path(id): axum::extract::Path<OrderId>,
) -> Response {
    let mut s = lock(&state);
    if let Err(r) = require_admin(&s, &headers) {
        return r;
    }
    s.orders.retain(|(_, o)| o.id != id);
    Json(json!({ "message": "Order deleted" })).into_response()
}

// =============================================================================
// Admin products
// =============================================================================

async fn read_form(mut multipart: Multipart) -> Result<Upload, Response> {
    let mut upload = Upload::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| reject(StatusCode::BAD_REQUEST, &e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if let Some(file_name) = field.file_name().map(str::to_owned) {
            field
                .bytes()
                .await
                .map_err(|e| reject(StatusCode::BAD_REQUEST, &e.to_string()))?;
            upload.files.push(file_name);
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| reject(StatusCode::BAD_REQUEST, &e.to_string()))?;
            upload.fields.push((name, value));
        }
    }
    Ok(upload)
}

/// Overwrite `product` with the submitted form.
fn apply_form(upload: &Upload, product: &mut Product) -> Result<(), Response> {
    let required = |key: &str| {
        upload
            .first(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| reject(StatusCode::BAD_REQUEST, "Please fill in all required fields"))
    };
    let invalid = |key: &str| reject(StatusCode::BAD_REQUEST, &format!("Invalid {key}"));

    product.name = required("name")?.to_string();
    product.description = required("description")?.to_string();
    product.price = Price::new(required("price")?.parse().map_err(|_| invalid("price"))?);
    product.stock = required("stock")?.parse().map_err(|_| invalid("stock"))?;
    product.category = upload.first("category").unwrap_or_default().to_string();
    product.in_stock = upload.first("inStock") == Some("true");
    product.featured = upload.first("featuredAt") == Some("true");
    product.features = upload.all("features");
    product.sizes = upload.all("size");

    let mut images = Vec::new();
    for existing in upload.all("existingImages") {
        images.push(serde_json::from_str::<ProductImage>(&existing).map_err(|_| invalid("existingImages"))?);
    }
    images.extend(upload.files.iter().map(|file| ProductImage {
        url: format!("https://cdn.test/uploads/{file}"),
        public_id: Some(ImageId::new(file.as_str())),
    }));
    product.images = images;
    Ok(())
}

async fn create_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let authorised = require_admin(&lock(&state), &headers);
    if let Err(r) = authorised {
        return r;
    }
    let upload = match read_form(multipart).await {
        Ok(upload) => upload,
        Err(r) => return r,
    };

    let mut created = product(
        &uuid::Uuid::new_v4().simple().to_string(),
        "",
        Decimal::ZERO,
        "",
        0,
    );
    if let Err(r) = apply_form(&upload, &mut created) {
        return r;
    }

    let mut s = lock(&state);
    s.uploads.push(upload);
    s.products.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    axum::extract::Path(id): axum::extract::Path<ProductId>,
    multipart: Multipart,
) -> Response {
    let authorised = require_admin(&lock(&state), &headers);
    if let Err(r) = authorised {
        return r;
    }
    let upload = match read_form(multipart).await {
        Ok(upload) => upload,
        Err(r) => return r,
    };

    let mut s = lock(&state);
    let Some(existing) = s.products.iter_mut().find(|p| p.id == id) else {
        return reject(StatusCode::NOT_FOUND, "Product not found");
    };
    if let Err(r) = apply_form(&upload, existing) {
        return r;
    }
    let updated = existing.clone();
    s.uploads.push(upload);
    Json(updated).into_response()
}

async fn delete_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    axum::extract::Path(id): axum::extract::Path<ProductId>,
) -> Response {
    let mut s = lock(&state);
    if let Err(r) = require_admin(&s, &headers) {
        return r;
    }
    s.products.retain(|p| p.id != id);
    Json(json!({ "message": "Product deleted" })).into_response()
}

// =============================================================================
// Favourites
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FavouriteBody {
    product_id: ProductId,
}

async fn favourites(
    State(state): State<Shared>,
    headers: HeaderMap,
    axum::extract::Path(user_id): axum::extract::Path<String>,
) -> Response {
    let s = lock(&state);
    let user = match caller(&s, &headers) {
        Ok((user, _)) => user,
        Err(r) => return r,
    };
    if s.accounts.get(&user).is_none_or(|a| a.id != user_id) {
        return reject(StatusCode::FORBIDDEN, "Not your favourites");
    }
    Json(s.favourites.get(&user).cloned().unwrap_or_default()).into_response()
}

async fn add_favourite(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<FavouriteBody>,
) -> Response {
    let mut s = lock(&state);
    let user = match caller(&s, &headers) {
        Ok((user, _)) => user,
        Err(r) => return r,
    };
    let Some(product) = s.products.iter().find(|p| p.id == body.product_id).cloned() else {
        return reject(StatusCode::NOT_FOUND, "Product not found");
    };
    let list = s.favourites.entry(user).or_default();
    if list.iter().any(|f| f.id == product.id) {
        return reject(StatusCode::BAD_REQUEST, "Product already in favourites");
    }
    list.push(FavouriteItem::from_product(&product, None));
    Json(json!({ "message": "Added to favourites" })).into_response()
}

async fn remove_favourite(
    State(state): State<Shared>,
    headers: HeaderMap,
    axum::extract::Path(id): axum::extract::Path<ProductId>,
) -> Response {
    let mut s = lock(&state);
    let user = match caller(&s, &headers) {
        Ok((user, _)) => user,
        Err(r) => return r,
    };
    s.favourites.entry(user).or_default().retain(|f| f.id != id);
    Json(json!({ "message": "Removed from favourites" })).into_response()
}

// =============================================================================
// Analytics
// =============================================================================

async fn analytics(
    State(state): State<Shared>,
    headers: HeaderMap,
    axum::extract::Path(section): axum::extract::Path<String>,
) -> Response {
    let s = lock(&state);
    if let Err(r) = require_admin(&s, &headers) {
        return r;
    }
    match s.analytics.get(&section) {
        Some(value) => Json(value.clone()).into_response(),
        None => reject(StatusCode::NOT_FOUND, "Unknown analytics section"),
    }
}

fn default_analytics() -> HashMap<String, Value> {
    HashMap::from([
        (
            "sales".to_string(),
            json!({
                "totalSales": 1234.5,
                "salesByDate": [{ "_id": "2026-10-14", "total": 400 }],
                "salesByCategory": [
                    { "_id": "lighting", "total": 834.5 },
                    { "_id": "kitchen", "total": 400 }
                ]
            }),
        ),
        (
            "orders".to_string(),
            json!({
                "orderStatus": [
                    { "_id": "pending", "count": 3 },
                    { "_id": "delivered", "count": 5 }
                ],
                "avgOrderValue": 154.31,
                "ordersByDate": [{ "_id": "2026-10-14", "count": 8 }]
            }),
        ),
        (
            "products".to_string(),
            json!({
                "topProducts": [{ "name": "Desk Lamp", "totalSold": 12, "totalRevenue": 720 }],
                "lowStock": [{ "_id": "p9", "name": "Mug", "stock": 2 }],
                "topRated": [{ "_id": "p1", "name": "Desk Lamp", "avgRating": 4.5 }]
            }),
        ),
        (
            "customers".to_string(),
            json!({
                "topCustomers": [{ "name": "ada", "totalSpent": 500, "orderCount": 4 }],
                "customerLocations": [{ "_id": "IL", "count": 2 }],
                "newCustomers": 7
            }),
        ),
    ])
}
