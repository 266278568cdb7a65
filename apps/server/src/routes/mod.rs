use actix_cors::Cors;
use actix_web::web;

use crate::error::AppError;

mod health;
mod results;
mod watch;

macros_utils::routes! {
    mod health,
    mod watch,
    mod results,
}

/// JSON extractor settings: malformed bodies get the same `{"detail"}` shape as other errors
///
/// Body size stays at actix's default limit.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|error, _req| AppError::InvalidBody(error.to_string()).into())
}

/// Browser access for the given origins, `*` meaning any
pub fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| match origin.as_str() {
            "*" => cors.allow_any_origin(),
            origin => cors.allowed_origin(origin),
        })
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::{Value, json};
    use tempfile::{TempDir, tempdir};
    use watches::{LibsqlWatchStore, ManualClock, StorageError, Watch, WatchError, WatchRegistry, WatchStore};

    use super::{cors, json_config, routes};

    /// Store whose medium is gone: every call fails
    struct UnavailableStore;

    fn unavailable() -> WatchError {
        StorageError::PoolBuild("database file is gone".to_string()).into()
    }

    #[async_trait::async_trait]
    impl WatchStore for UnavailableStore {
        async fn create(&self, _url: &str, _interval: i64, _added_at: i64) -> watches::Result<i64> {
            Err(unavailable())
        }

        async fn list_all(&self) -> watches::Result<Vec<Watch>> {
            Err(unavailable())
        }

        async fn get_by_id(&self, _id: i64) -> watches::Result<Watch> {
            Err(unavailable())
        }

        async fn update_result(
            &self,
            _id: i64,
            _status: u16,
            _error: Option<String>,
            _checked_at: i64,
        ) -> watches::Result<()> {
            Err(unavailable())
        }
    }

    async fn test_registry(start: i64) -> (web::Data<WatchRegistry>, Arc<ManualClock>, TempDir) {
        let dir = tempdir().unwrap();
        let store = LibsqlWatchStore::open(dir.path().join("server.db"), 4).await.unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let registry = WatchRegistry::new(Arc::new(store), clock.clone());
        (web::Data::new(registry), clock, dir)
    }

    #[actix_web::test]
    async fn test_create_report_and_get() {
        let (registry, clock, _dir) = test_registry(100).await;
        let app = test::init_service(
            App::new().app_data(registry.clone()).app_data(json_config()).configure(routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/watches")
            .set_json(json!({ "url": "http://x", "interval": 5 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Watch = test::read_body_json(resp).await;
        assert_eq!(created.added_at, 100);
        assert_eq!(created.status, None);

        clock.set(106);
        let req = test::TestRequest::post()
            .uri("/results")
            .set_json(json!({ "id": created.id, "status": 200, "error": null }))
            .to_request();
        let ack: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ack, json!({ "ok": true }));

        let req = test::TestRequest::get().uri(&format!("/watches/{}", created.id)).to_request();
        let fetched: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            fetched,
            json!({
                "id": created.id,
                "url": "http://x",
                "interval": 5,
                "status": 200,
                "error": null,
                "last_checked": 106,
                "added_at": 100,
            })
        );

        let req = test::TestRequest::get().uri("/watches").to_request();
        let listed: Vec<Watch> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].last_checked, Some(106));
    }

    #[actix_web::test]
    async fn test_invalid_create_is_bad_request() {
        let (registry, _clock, _dir) = test_registry(0).await;
        let app = test::init_service(
            App::new().app_data(registry.clone()).app_data(json_config()).configure(routes),
        )
        .await;

        for body in [
            json!({ "url": "http://x", "interval": 0 }),
            json!({ "url": "", "interval": 60 }),
            json!({ "url": "http://x" }),
        ] {
            let req = test::TestRequest::post().uri("/watches").set_json(&body).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "accepted {body}");
            let error: Value = test::read_body_json(resp).await;
            assert!(error["detail"].is_string());
        }

        assert!(registry.list_watches().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_unknown_watch_is_not_found() {
        let (registry, _clock, _dir) = test_registry(0).await;
        let app = test::init_service(
            App::new().app_data(registry.clone()).app_data(json_config()).configure(routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/watches/41").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let error: Value = test::read_body_json(resp).await;
        assert_eq!(error, json!({ "detail": "Watch not found" }));

        let req = test::TestRequest::post()
            .uri("/results")
            .set_json(json!({ "id": 41, "status": 0, "error": "timeout" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_probes() {
        let (registry, _clock, _dir) = test_registry(0).await;
        let app = test::init_service(
            App::new().app_data(registry.clone()).app_data(json_config()).configure(routes),
        )
        .await;

        let health: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(health, json!({ "ok": true }));

        let ready: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/ready").to_request()).await;
        assert_eq!(ready, json!({ "ready": true }));
    }

    #[actix_web::test]
    async fn test_long_error_text_is_stored() {
        let (registry, _clock, _dir) = test_registry(0).await;
        let app = test::init_service(
            App::new().app_data(registry.clone()).app_data(json_config()).configure(routes),
        )
        .await;
        let watch = registry.add_watch("http://x", 5).await.unwrap();
        let error = "e".repeat(20_000);

        let req = test::TestRequest::post()
            .uri("/results")
            .set_json(json!({ "id": watch.id, "status": 0, "error": error }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let stored = registry.get_watch(watch.id).await.unwrap();
        assert_eq!(stored.error.as_deref(), Some(error.as_str()));
        assert_eq!(stored.last_checked, Some(0));
    }

    #[actix_web::test]
    async fn test_storage_failure_is_service_unavailable() {
        let registry = web::Data::new(WatchRegistry::new(Arc::new(UnavailableStore), Arc::new(ManualClock::new(0))));
        let app = test::init_service(
            App::new().app_data(registry.clone()).app_data(json_config()).configure(routes),
        )
        .await;

        let requests = [
            test::TestRequest::get().uri("/watches"),
            test::TestRequest::get().uri("/watches/1"),
            test::TestRequest::post().uri("/watches").set_json(json!({ "url": "http://x", "interval": 5 })),
            test::TestRequest::post().uri("/results").set_json(json!({ "id": 1, "status": 200, "error": null })),
        ];
        for req in requests {
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
            let error: Value = test::read_body_json(resp).await;
            assert_eq!(error, json!({ "detail": "Storage unavailable" }));
        }
    }

    #[actix_web::test]
    async fn test_cors_allows_configured_origin() {
        let (registry, _clock, _dir) = test_registry(0).await;
        let origins = vec!["http://localhost:5173".to_string()];
        let app = test::init_service(
            App::new().wrap(cors(&origins)).app_data(registry.clone()).app_data(json_config()).configure(routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/watches")
            .insert_header(("Origin", "http://localhost:5173"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let headers = resp.headers();
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "http://localhost:5173");
        assert_eq!(headers.get("access-control-allow-credentials").unwrap(), "true");
    }
}
