use std::collections::HashMap;
use std::sync::Arc;

use poem::http::{header, StatusCode};
use poem::web::Form;
use poem::{Body, Endpoint, FromRequest, IntoResponse, Middleware, Request, RequestBody, Response};
use tokio::io::AsyncReadExt;

use crate::app_data::AppData;
use crate::errors::{ApiError, InternalError};
use crate::types::internal::context::RequestContext;
use crate::types::internal::{AccessDecision, AccessTier, RestaurantRef};

const PATH_PARAMS: [&str; 2] = ["restaurant", "restaurantId"];
const FIELD: &str = "restaurant_id";

/// Largest body the gate buffers while looking for `restaurant_id`
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

/// Restaurant-scoped access gate
///
/// Wraps an endpoint so that each request first goes through
/// `AccessProvider::resolve`. Only allowed requests reach the endpoint, with
/// the `RequestContext` available as request data. `AppData` must already be
/// attached to the request.
pub struct RestaurantGate;

impl<E: Endpoint> Middleware<E> for RestaurantGate {
    type Output = RestaurantGateEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        RestaurantGateEndpoint { inner: ep }
    }
}

pub struct RestaurantGateEndpoint<E> {
    inner: E,
}

impl<E: Endpoint> Endpoint for RestaurantGateEndpoint<E> {
    type Output = Response;

    async fn call(&self, mut req: Request) -> poem::Result<Self::Output> {
        let Some(app_data) = req.data::<Arc<AppData>>().cloned() else {
            tracing::error!("RestaurantGate used on a route without AppData");
            let err = InternalError::parse("request data", "AppData missing");
            return Ok(ApiError::from_internal_error(err).into_response());
        };

        let ctx = RequestContext::from_request(&req, &app_data.token_provider);
        let Some(tier) = ctx.principal().map(|principal| principal.tier()) else {
            tracing::debug!(request_id = %ctx.request_id, "Gate rejected request without principal");
            return Ok(unauthenticated_response(&app_data));
        };

        let restaurant = match tier {
            AccessTier::Global => None,
            AccessTier::RestaurantManager | AccessTier::Unscoped => {
                extract_restaurant_ref(&mut req).await?
            }
        };

        let decision = match app_data
            .access_provider
            .resolve(ctx.principal(), restaurant.as_ref())
            .await
        {
            Ok(decision) => decision,
            Err(e) => {
                tracing::error!(request_id = %ctx.request_id, "Access check failed: {}", e);
                return Ok(ApiError::from_internal_error(e).into_response());
            }
        };

        match decision {
            AccessDecision::Allow => {
                req.extensions_mut().insert(ctx);
                self.inner.call(req).await.map(IntoResponse::into_response)
            }
            AccessDecision::Deny => Ok(ApiError::restaurant_forbidden().into_response()),
            AccessDecision::NotFound => Ok(ApiError::restaurant_not_found().into_response()),
            AccessDecision::Unauthenticated => Ok(unauthenticated_response(&app_data)),
        }
    }
}

fn unauthenticated_response(app_data: &AppData) -> Response {
    match &app_data.login_url {
        Some(login_url) => Response::builder()
            .status(StatusCode::FOUND)
            .header(header::LOCATION, login_url.as_str())
            .finish(),
        None => ApiError::unauthenticated().into_response(),
    }
}

/// Find the restaurant a request is about
///
/// Sources in priority order: the `restaurant` path parameter, the
/// `restaurantId` path parameter, a `restaurant_id` body field (JSON or
/// urlencoded form), then a `restaurant_id` query parameter. Blank values are
/// skipped. A consumed body is put back for the wrapped endpoint; bodies over
/// `MAX_BODY_BYTES` are rejected with 413.
pub async fn extract_restaurant_ref(req: &mut Request) -> poem::Result<Option<RestaurantRef>> {
    for name in PATH_PARAMS {
        if let Some(reference) = req.raw_path_param(name).and_then(RestaurantRef::parse) {
            return Ok(Some(reference));
        }
    }

    if let Some(reference) = body_field(req)
        .await?
        .as_deref()
        .and_then(RestaurantRef::parse)
    {
        return Ok(Some(reference));
    }

    Ok(req
        .params::<HashMap<String, String>>()
        .ok()
        .and_then(|query| query.get(FIELD).and_then(|raw| RestaurantRef::parse(raw))))
}

async fn body_field(req: &mut Request) -> poem::Result<Option<String>> {
    let content_type = req
        .content_type()
        .map(|value| value.to_ascii_lowercase())
        .unwrap_or_default();
    let is_json = content_type.starts_with("application/json");
    let is_form = content_type.starts_with("application/x-www-form-urlencoded");
    if !is_json && !is_form {
        return Ok(None);
    }

    let bytes = read_bounded_body(req).await?;
    req.set_body(bytes.clone());

    if is_json {
        let value = serde_json::from_slice::<serde_json::Value>(&bytes).ok();
        return Ok(value.as_ref().and_then(|value| match value.get(FIELD)? {
            serde_json::Value::Number(number) => Some(json_number_ref(number)),
            serde_json::Value::String(text) => Some(text.clone()),
            _ => None,
        }));
    }

    let mut body = RequestBody::new(Body::from(bytes));
    Ok(Form::<HashMap<String, String>>::from_request(req, &mut body)
        .await
        .ok()
        .and_then(|Form(mut fields)| fields.remove(FIELD)))
}

/// Integral JSON numbers (`5`, `5.0`) become plain ids; anything else stays as written
fn json_number_ref(number: &serde_json::Number) -> String {
    if let Some(id) = number.as_i64() {
        return id.to_string();
    }
    match number.as_f64() {
        Some(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
            (value as i64).to_string()
        }
        _ => number.to_string(),
    }
}

async fn read_bounded_body(req: &mut Request) -> poem::Result<Vec<u8>> {
    let declared = req
        .header(header::CONTENT_LENGTH)
        .and_then(|value| value.trim().parse::<u64>().ok());
    if declared.is_some_and(|length| length > MAX_BODY_BYTES) {
        return Err(poem::Error::from_status(StatusCode::PAYLOAD_TOO_LARGE));
    }

    let mut bytes = Vec::new();
    req.take_body()
        .into_async_read()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut bytes)
        .await
        .map_err(|e| poem::Error::new(e, StatusCode::BAD_REQUEST))?;

    if bytes.len() as u64 > MAX_BODY_BYTES {
        return Err(poem::Error::from_status(StatusCode::PAYLOAD_TOO_LARGE));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_app_data;
    use crate::types::internal::PrincipalRole;
    use poem::endpoint::make;
    use poem::http::Method;
    use poem::{get, post, EndpointExt, Route};
    use std::io;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::{Context, Poll};
    use tokio::io::{AsyncRead, ReadBuf};

    /// Body source that hands out `remaining` bytes and counts what was pulled
    struct CountingReader {
        remaining: usize,
        read: Arc<AtomicUsize>,
    }

    impl AsyncRead for CountingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let n = self.remaining.min(buf.remaining()).min(8192);
            buf.put_slice(&vec![b' '; n]);
            self.remaining -= n;
            self.read.fetch_add(n, Ordering::SeqCst);
            Poll::Ready(Ok(()))
        }
    }

    fn counting_body(size: usize) -> (Body, Arc<AtomicUsize>) {
        let read = Arc::new(AtomicUsize::new(0));
        let reader = CountingReader {
            remaining: size,
            read: read.clone(),
        };
        (Body::from_async_read(reader), read)
    }

    async fn gated_client(vars: &[(&str, &str)]) -> (poem::test::TestClient<impl Endpoint>, Arc<AppData>) {
        let app_data = setup_test_app_data(vars).await;
        let route = Route::new()
            .at("/orders", post(make(|_req: Request| async { "reached" })).with(RestaurantGate))
            .data(app_data.clone());
        (poem::test::TestClient::new(route), app_data)
    }

    fn bearer(app_data: &AppData, roles: &[PrincipalRole]) -> String {
        let (token, _jti) = app_data.token_provider.generate_jwt(10, roles).unwrap();
        format!("Bearer {}", token)
    }

    async fn extract(mut req: Request) -> Option<RestaurantRef> {
        extract_restaurant_ref(&mut req).await.unwrap()
    }

    fn echo_route() -> Route {
        let echo = || {
            make(|mut req: Request| async move {
                format!("{:?}", extract_restaurant_ref(&mut req).await.ok().flatten())
            })
        };
        Route::new()
            .at("/r/:restaurant/:restaurantId", get(echo()))
            .at("/s/:restaurantId", post(echo()))
    }

    #[tokio::test]
    async fn test_query_parameter_is_used_without_path_or_body() {
        let req = Request::builder().uri_str("/products?restaurant_id=12").finish();

        assert_eq!(extract(req).await, Some(RestaurantRef::Id(12)));
    }

    #[tokio::test]
    async fn test_json_body_field_is_used_and_body_restored() {
        let mut req = Request::builder()
            .method(Method::POST)
            .uri_str("/products?restaurant_id=99")
            .content_type("application/json")
            .body(r#"{"restaurant_id": 5, "name": "Soup"}"#);

        let reference = extract_restaurant_ref(&mut req).await.unwrap();
        let remaining = req.take_body().into_string().await.unwrap();

        assert_eq!(reference, Some(RestaurantRef::Id(5)));
        assert!(remaining.contains("\"name\": \"Soup\""));
    }

    #[tokio::test]
    async fn test_form_body_field_is_used() {
        let req = Request::builder()
            .method(Method::POST)
            .uri_str("/products")
            .content_type("application/x-www-form-urlencoded")
            .body("name=Soup&restaurant_id=8");

        assert_eq!(extract(req).await, Some(RestaurantRef::Id(8)));
    }

    #[tokio::test]
    async fn test_blank_values_count_as_absent() {
        let req = Request::builder()
            .method(Method::POST)
            .uri_str("/products?restaurant_id=3")
            .content_type("application/json")
            .body(r#"{"restaurant_id": ""}"#);

        assert_eq!(extract(req).await, Some(RestaurantRef::Id(3)));
    }

    #[tokio::test]
    async fn test_non_numeric_value_is_unresolvable() {
        let req = Request::builder().uri_str("/products?restaurant_id=downtown").finish();

        assert_eq!(extract(req).await, Some(RestaurantRef::Unresolvable("downtown".to_string())));
    }

    #[tokio::test]
    async fn test_nothing_to_extract() {
        let req = Request::builder().uri_str("/products").finish();

        assert_eq!(extract(req).await, None);
    }

    #[tokio::test]
    async fn test_path_parameters_take_priority() {
        let cli = poem::test::TestClient::new(echo_route());

        let resp = cli.get("/r/1/2").query("restaurant_id", &3).send().await;
        resp.assert_status_is_ok();
        resp.assert_text("Some(Id(1))").await;

        let resp = cli
            .post("/s/2")
            .body_json(&serde_json::json!({ "restaurant_id": 3 }))
            .send()
            .await;
        resp.assert_text("Some(Id(2))").await;
    }

    #[tokio::test]
    async fn test_integral_json_numbers_are_ids() {
        let req = Request::builder()
            .method(Method::POST)
            .uri_str("/products")
            .content_type("application/json")
            .body(r#"{"restaurant_id": 5.0}"#);
        assert_eq!(extract(req).await, Some(RestaurantRef::Id(5)));

        let req = Request::builder()
            .method(Method::POST)
            .uri_str("/products")
            .content_type("application/json")
            .body(r#"{"restaurant_id": 5.5}"#);
        assert_eq!(extract(req).await, Some(RestaurantRef::Unresolvable("5.5".to_string())));
    }

    #[tokio::test]
    async fn test_request_without_principal_is_rejected_before_body_is_read() {
        let (cli, _app_data) = gated_client(&[]).await;
        let (body, read) = counting_body(20 * 1024 * 1024);

        let resp = cli
            .post("/orders")
            .content_type("application/json")
            .body(body)
            .send()
            .await;

        resp.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(read.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_global_principal_skips_body_extraction() {
        let (cli, app_data) = gated_client(&[]).await;
        let (body, read) = counting_body(1024);

        let resp = cli
            .post("/orders")
            .header("Authorization", bearer(&app_data, &[PrincipalRole::Admin]))
            .content_type("application/json")
            .body(body)
            .send()
            .await;

        resp.assert_status_is_ok();
        resp.assert_text("reached").await;
        assert_eq!(read.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected_after_bounded_read() {
        let (cli, app_data) = gated_client(&[]).await;
        let (body, read) = counting_body(20 * 1024 * 1024);

        let resp = cli
            .post("/orders")
            .header("Authorization", bearer(&app_data, &[PrincipalRole::RestaurantManager]))
            .content_type("application/json")
            .body(body)
            .send()
            .await;

        resp.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert!(read.load(Ordering::SeqCst) as u64 <= MAX_BODY_BYTES + 8192);
    }

    #[tokio::test]
    async fn test_declared_oversized_body_is_rejected_unread() {
        let (cli, app_data) = gated_client(&[]).await;
        let (body, read) = counting_body(1024);

        let resp = cli
            .post("/orders")
            .header("Authorization", bearer(&app_data, &[PrincipalRole::Staff]))
            .header("Content-Length", (MAX_BODY_BYTES + 1).to_string())
            .content_type("application/json")
            .body(body)
            .send()
            .await;

        resp.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(read.load(Ordering::SeqCst), 0);
    }
}
