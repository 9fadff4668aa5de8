use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;

use super::error::ApiError;

/// Json body extractor whose rejection speaks this API's contract: a missing
/// or malformed body is a validation failure (400), not axum's default
/// 422/415.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use contracts::domain::meta::MetaDraft;

    fn json_request(body: &str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/metas")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn missing_required_field_is_a_400() {
        // No producedQuantity in the body
        let req = json_request(r#"{"itemCode":"PROD0070","date":"2024-05-17","overtimeFlag":1}"#);
        let err = ApiJson::<MetaDraft>::from_request(req, &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_is_a_400() {
        let req = json_request("{not json");
        let err = ApiJson::<MetaDraft>::from_request(req, &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_content_type_is_a_400() {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/metas")
            .body(Body::from(
                r#"{"itemCode":"PROD0070","date":"2024-05-17","producedQuantity":1.0,"overtimeFlag":1}"#,
            ))
            .unwrap();
        let err = ApiJson::<MetaDraft>::from_request(req, &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn well_formed_body_passes_through() {
        let req = json_request(
            r#"{"itemCode":"PROD0070","date":"2024-05-17","producedQuantity":50000.0,"overtimeFlag":1}"#,
        );
        let ApiJson(draft) = ApiJson::<MetaDraft>::from_request(req, &()).await.unwrap();
        assert_eq!(draft.item_code, "PROD0070");
        assert_eq!(draft.produced_quantity, 50000.0);
    }
}
