//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use super::middleware;
use super::openapi::openapi_json;
use super::routes::{data, health};
use crate::core::CoreApp;
use crate::core::constants::DEFAULT_BODY_LIMIT;
use crate::data::SqliteService;
use crate::domain::RowGateway;

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Serve until shutdown is triggered. Returns CoreApp for graceful shutdown.
    pub async fn start(self) -> Result<CoreApp> {
        let Self { app } = self;

        let shutdown = app.shutdown.clone();
        let addr = SocketAddr::new(app.config.server.host.parse()?, app.config.server.port);

        let router = router(app.rows.clone(), app.database.clone());

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(
            address = %addr,
            table = %app.rows.table(),
            "Listening on http://{}",
            addr
        );

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}

/// Build the full HTTP router
pub fn router(rows: Arc<RowGateway>, database: Arc<SqliteService>) -> Router {
    Router::new()
        .route("/api/health", get(health::health).with_state(database))
        .route("/api/openapi.json", get(openapi_json))
        .nest("/api/data", data::routes(rows))
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(middleware::cors())
        .layer(middleware::trace())
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode};
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::data::sqlite::repositories::table;

    const TABLE: &str = "electric_cars";

    async fn setup_router() -> (Router, Arc<SqliteService>) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        let columns: Vec<String> = ["Brand", "Model", "Range_Km", "FastCharge_KmH", "Date"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        table::ensure_table(&pool, TABLE, &columns).await.unwrap();
        for values in [
            [Some("Tesla"), Some("Model 3"), Some("450"), Some("940"), Some("2016-08-24")],
            [Some("BMW"), Some("i4"), Some("470"), None, Some("2021-03-01")],
        ] {
            let values: Vec<Option<String>> = values.iter().map(|v| v.map(String::from)).collect();
            table::insert_row(&pool, TABLE, &columns, &values)
                .await
                .unwrap();
        }

        let database = Arc::new(SqliteService::from_pool(pool));
        let rows = Arc::new(RowGateway::new(database.clone(), TABLE));
        (router(rows, database.clone()), database)
    }

    async fn send(router: Router, method: Method, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// Percent-encode a query value
    fn encode(value: &str) -> String {
        value
            .bytes()
            .map(|b| match b {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => {
                    (b as char).to_string()
                }
                _ => format!("%{:02X}", b),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_list_all_rows() {
        let (router, _) = setup_router().await;
        let (status, body) = send(router, Method::GET, "/api/data").await;
        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Brand"], "Tesla");
        assert_eq!(rows[0]["id"], 1);
        assert_eq!(rows[1]["FastCharge_KmH"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_list_with_filters_and_search() {
        let (router, _) = setup_router().await;
        let filters = encode(r#"[{"field":"Range_Km","type":"greater than","value":"460"}]"#);
        let (status, body) = send(
            router,
            Method::GET,
            &format!("/api/data?filters={}&q=i4", filters),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Model"], "i4");
    }

    #[tokio::test]
    async fn test_list_malformed_filters() {
        let (router, _) = setup_router().await;
        let (status, body) = send(router, Method::GET, "/api/data?filters=not-json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid filters JSON");
        assert_eq!(body["code"], "INVALID_FILTERS_JSON");
    }

    #[tokio::test]
    async fn test_list_invalid_filter() {
        let (router, _) = setup_router().await;
        let filters = encode(r#"[{"field":"Brand","type":"equals","value":""}]"#);
        let (status, body) =
            send(router, Method::GET, &format!("/api/data?filters={}", filters)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_FILTER");
        assert!(body["error"].as_str().unwrap().contains("Brand"));
    }

    #[tokio::test]
    async fn test_get_row() {
        let (router, _) = setup_router().await;
        let (status, body) = send(router, Method::GET, "/api/data/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["Brand"], "BMW");
        assert_eq!(body["Date"], "2021-03-01");
    }

    #[tokio::test]
    async fn test_get_row_not_found() {
        let (router, _) = setup_router().await;
        let (status, body) = send(router, Method::GET, "/api/data/42").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Record not found");
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_row_id_too_long() {
        let (router, _) = setup_router().await;
        let uri = format!("/api/data/{}", "1".repeat(300));
        let (status, body) = send(router, Method::GET, &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ID");
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let (router, _) = setup_router().await;
        let (status, body) = send(router.clone(), Method::DELETE, "/api/data/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "success": true }));

        let (status, _) = send(router.clone(), Method::DELETE, "/api/data/1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(router, Method::GET, "/api/data").await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_opaque_500() {
        let (router, database) = setup_router().await;
        database.close().await;

        let (status, body) = send(router.clone(), Method::GET, "/api/data").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Database query failed");
        assert_eq!(body["code"], "INTERNAL");

        let (status, body) = send(router.clone(), Method::GET, "/api/data/1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch data by ID");

        let (status, body) = send(router, Method::DELETE, "/api/data/1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to delete record");
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = setup_router().await;
        let (status, body) = send(router, Method::GET, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_health_degraded_when_database_closed() {
        let (router, database) = setup_router().await;
        database.close().await;
        let (status, body) = send(router, Method::GET, "/api/health").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["database"], "unavailable");
    }

    #[tokio::test]
    async fn test_list_long_search_term() {
        let (router, _) = setup_router().await;
        let uri = format!("/api/data?q={}", "a".repeat(300));
        let (status, body) = send(router, Method::GET, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_missing_table_with_filters_is_500() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let database = Arc::new(SqliteService::from_pool(pool));
        let rows = Arc::new(RowGateway::new(database.clone(), TABLE));
        let router = router(rows, database);

        let filters = encode(r#"[{"field":"Brand","type":"equals","value":"Tesla"}]"#);
        let (status, body) =
            send(router, Method::GET, &format!("/api/data?filters={}", filters)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "INTERNAL");
    }

    #[tokio::test]
    async fn test_openapi_json() {
        let (router, _) = setup_router().await;
        let (status, body) = send(router, Method::GET, "/api/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/data"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_route_404() {
        let (router, _) = setup_router().await;
        let (status, _) = send(router, Method::GET, "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
