//! # CORS ミドルウェア
//!
//! ブラウザ上のフロントエンドからのクロスオリジンリクエストを許可する。
//!
//! - オリジン: 設定された許可リストのみ（`*` の場合はリクエストのオリジンを返す）
//! - 認証情報（Cookie 等）: 許可
//! - メソッド / ヘッダー: リクエストの内容をそのまま許可する
//!
//! 認証情報を許可する場合 `*` をヘッダーに書けないため、
//! オリジン・メソッド・ヘッダーはいずれもリクエストの内容をミラーする。

use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::AllowedOrigins;

/// 許可オリジン設定から CORS レイヤーを構築する
pub fn cors_layer(allowed_origins: &AllowedOrigins) -> CorsLayer {
    let allow_origin = match allowed_origins {
        AllowedOrigins::Any => AllowOrigin::mirror_request(),
        AllowedOrigins::List(origins) => AllowOrigin::list(origins.iter().cloned()),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode, header},
        routing::get,
    };
    use http::HeaderValue;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;

    const ALLOWED: &str = "http://localhost:5173";

    fn create_app_with(allowed_origins: &AllowedOrigins) -> Router {
        Router::new()
            .route("/todos", get(|| async { "ok" }))
            .layer(cors_layer(allowed_origins))
    }

    fn create_test_app() -> Router {
        create_app_with(&AllowedOrigins::List(vec![HeaderValue::from_static(
            ALLOWED,
        )]))
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/todos")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_許可されたオリジンのプリフライトは要求内容をミラーして許可する() {
        let sut = create_test_app();

        let response = sut.oneshot(preflight(ALLOWED)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ALLOWED);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "PATCH");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "content-type");
    }

    #[tokio::test]
    async fn test_許可されていないオリジンにはallow_originを返さない() {
        let sut = create_test_app();

        let response = sut.oneshot(preflight("http://evil.example.com")).await.unwrap();

        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_単純リクエストにもallow_originを付与する() {
        let sut = create_test_app();

        let response = sut
            .oneshot(
                Request::builder()
                    .uri("/todos")
                    .header(header::ORIGIN, ALLOWED)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            ALLOWED
        );
    }

    #[tokio::test]
    async fn test_ワイルドカード指定ではリクエストのオリジンをそのまま返す() {
        let sut = create_app_with(&AllowedOrigins::Any);

        let response = sut
            .oneshot(preflight("https://any.example.com"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://any.example.com"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }
}
