//! Kasir backend API client.
//!
//! All REST traffic with the backend flows through [`ApiClient`]. The
//! bearer credential is read from the shared [`TokenCell`] when each
//! request is built, never captured earlier, so a logout immediately
//! detaches the credential from everything still in flight to be sent.
//!
//! The [`Backend`] trait is the seam the session, catalog, payment, and
//! reporting components are injected with; tests substitute a mock.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::error::PosError;
use crate::models::{
    CategoryCount, DailySales, DashboardStats, LoginResponse, MenuItem, Order, OrderDraft, User,
};
use crate::storage::TokenCell;

/// Every endpoint lives under this prefix on the backend.
const API_PREFIX: &str = "/api";

// ---------------------------------------------------------------------------
// Backend seam
// ---------------------------------------------------------------------------

/// The backend operations the terminal consumes.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, PosError>;
    async fn profile(&self) -> Result<User, PosError>;
    async fn menu(&self) -> Result<Vec<MenuItem>, PosError>;
    async fn categories(&self) -> Result<Vec<CategoryCount>, PosError>;
    async fn create_order(&self, draft: &OrderDraft) -> Result<Order, PosError>;
    async fn recent_orders(&self, limit: usize) -> Result<Vec<Order>, PosError>;
    async fn today_sales(&self) -> Result<DailySales, PosError>;
    async fn dashboard_stats(&self) -> Result<DashboardStats, PosError>;
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Convert a `reqwest::Error` into a cashier-readable message.
fn friendly_error(url: &str, err: &reqwest::Error) -> PosError {
    if err.is_connect() {
        return PosError::Network(format!("Tidak dapat terhubung ke server di {url}"));
    }
    if err.is_timeout() {
        return PosError::Network(format!("Koneksi ke {url} melebihi batas waktu"));
    }
    if err.is_builder() {
        return PosError::Network(format!("Alamat server tidak valid: {url}"));
    }
    PosError::Network(format!("Kesalahan jaringan saat menghubungi {url}: {err}"))
}

/// Fallback message for a status code when the body carries no detail.
fn status_error(status: StatusCode) -> String {
    match status.as_u16() {
        401 => "Sesi berakhir, silakan login kembali".to_string(),
        403 => "Akses ditolak".to_string(),
        404 => "Endpoint tidak ditemukan di server".to_string(),
        s if s >= 500 => format!("Server bermasalah (HTTP {s})"),
        s => format!("Respons tidak terduga dari server (HTTP {s})"),
    }
}

/// Map a non-success response body to the error taxonomy. The backend
/// reports failures as `{"detail": "..."}`; 401s become `Auth` so callers
/// can fall back to the unauthenticated state.
fn error_from_body(status: StatusCode, body: &str) -> PosError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("detail")
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| status_error(status));

    if status == StatusCode::UNAUTHORIZED {
        PosError::Auth(detail)
    } else {
        PosError::Api {
            status: status.as_u16(),
            detail,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: Arc<TokenCell>,
}

impl ApiClient {
    pub fn new(config: &Config, tokens: Arc<TokenCell>) -> Result<Self, PosError> {
        let http = Client::builder()
            .build()
            .map_err(|e| PosError::Network(format!("Gagal membuat HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.base_url)
    }

    /// Build a request, attaching the bearer credential iff one is
    /// currently present.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self.http.request(method, self.url(path));
        if let Some(token) = self.tokens.get() {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, PosError> {
        let resp = req
            .send()
            .await
            .map_err(|e| friendly_error(&self.base_url, &e))?;
        self.decode(resp).await
    }

    async fn decode<T: DeserializeOwned>(&self, resp: Response) -> Result<T, PosError> {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }
        serde_json::from_str(&body)
            .map_err(|e| PosError::Network(format!("Respons server tidak valid: {e}")))
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, PosError> {
        let body = serde_json::json!({ "username": username, "password": password });
        self.send(self.request(Method::POST, "/auth/login").json(&body))
            .await
    }

    async fn profile(&self) -> Result<User, PosError> {
        self.send(self.request(Method::GET, "/auth/profile")).await
    }

    async fn menu(&self) -> Result<Vec<MenuItem>, PosError> {
        self.send(self.request(Method::GET, "/menu")).await
    }

    async fn categories(&self) -> Result<Vec<CategoryCount>, PosError> {
        self.send(self.request(Method::GET, "/menu/categories"))
            .await
    }

    async fn create_order(&self, draft: &OrderDraft) -> Result<Order, PosError> {
        self.send(self.request(Method::POST, "/orders").json(draft))
            .await
    }

    async fn recent_orders(&self, limit: usize) -> Result<Vec<Order>, PosError> {
        self.send(
            self.request(Method::GET, "/orders")
                .query(&[("limit", limit)]),
        )
        .await
    }

    async fn today_sales(&self) -> Result<DailySales, PosError> {
        self.send(self.request(Method::GET, "/orders/today")).await
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, PosError> {
        self.send(self.request(Method::GET, "/dashboard/stats"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_detail_is_preferred_over_status_fallback() {
        let err = error_from_body(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "Uang yang diterima kurang dari total"}"#,
        );
        assert_eq!(
            err,
            PosError::Api {
                status: 400,
                detail: "Uang yang diterima kurang dari total".into()
            }
        );
    }

    #[test]
    fn unauthorized_maps_to_auth_error() {
        let err = error_from_body(StatusCode::UNAUTHORIZED, r#"{"detail": "Invalid token"}"#);
        assert_eq!(err, PosError::Auth("Invalid token".into()));
        assert!(err.is_auth_failure());
    }

    #[test]
    fn missing_or_malformed_detail_falls_back_to_status_message() {
        let err = error_from_body(StatusCode::INTERNAL_SERVER_ERROR, "not json");
        assert_eq!(
            err,
            PosError::Api {
                status: 500,
                detail: "Server bermasalah (HTTP 500)".into()
            }
        );

        let err = error_from_body(StatusCode::UNAUTHORIZED, "{}");
        assert_eq!(
            err,
            PosError::Auth("Sesi berakhir, silakan login kembali".into())
        );
    }

    #[test]
    fn request_attaches_bearer_iff_token_present() {
        let tokens = Arc::new(TokenCell::default());
        let client = ApiClient::new(&Config::new("http://localhost:8000"), tokens.clone())
            .expect("client builds");

        let req = client
            .request(Method::GET, "/menu")
            .build()
            .expect("request builds");
        assert!(req.headers().get("authorization").is_none());

        tokens.set("jwt-abc");
        let req = client
            .request(Method::GET, "/menu")
            .build()
            .expect("request builds");
        let auth = req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        assert_eq!(auth.as_deref(), Some("Bearer jwt-abc"));

        // Logout detaches the header from the very next request.
        tokens.clear();
        let req = client
            .request(Method::GET, "/menu")
            .build()
            .expect("request builds");
        assert!(req.headers().get("authorization").is_none());
    }

    #[test]
    fn endpoint_urls_carry_the_api_prefix() {
        let tokens = Arc::new(TokenCell::default());
        let client = ApiClient::new(&Config::new("kasir.example.com/api/"), tokens)
            .expect("client builds");
        assert_eq!(
            client.url("/auth/login"),
            "https://kasir.example.com/api/auth/login"
        );
    }
}
