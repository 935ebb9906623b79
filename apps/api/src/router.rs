use std::sync::Arc;

use axum::Router;

use healthcheck_cell::{create_healthcheck_router, HealthCheckState};

pub fn create_router(state: Arc<HealthCheckState>) -> Router {
    Router::new().merge(create_healthcheck_router(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use shared_utils::test_utils::TestConfig;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_service_status() {
        let state = Arc::new(HealthCheckState::in_memory(TestConfig::default().to_arc()));
        let app = create_router(state);

        let response = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"healthcheck-as-a-service is running!");
    }

    #[tokio::test]
    async fn test_unknown_instance_resource() {
        let state = Arc::new(HealthCheckState::in_memory(TestConfig::default().to_arc()));
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/resources/ghost/groups")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
