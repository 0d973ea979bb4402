// API layer - HTTP endpoints
pub mod gate;
pub mod health;
pub mod restaurants;
pub mod scoped;

use poem::{delete, get, Endpoint, EndpointExt, Route};
use poem_openapi::OpenApiService;
use std::sync::Arc;

use crate::app_data::AppData;

pub use gate::RestaurantGate;
pub use health::HealthApi;
pub use restaurants::{BearerAuth, RestaurantApi};

/// Compose the full HTTP application
///
/// Restaurant-scoped routes are registered individually, each wrapped in
/// `RestaurantGate`, so that path parameters are resolved before the gate
/// runs. The OpenAPI service covers the remaining `/api` paths and Swagger UI
/// lives under `/swagger`.
pub fn build_app(app_data: Arc<AppData>, server_url: &str) -> impl Endpoint + use<> {
    let api_service = OpenApiService::new(
        (HealthApi, RestaurantApi::new(app_data.clone())),
        "Restaurant Access API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("{}/api", server_url));
    let ui = api_service.swagger_ui();

    Route::new()
        .at(
            "/api/restaurants/:restaurant",
            get(scoped::show_restaurant).with(RestaurantGate),
        )
        .at(
            "/api/restaurants/:restaurant/products",
            get(scoped::restaurant_products).with(RestaurantGate),
        )
        .at(
            "/api/restaurants/:restaurant/assignments",
            get(scoped::list_assignments)
                .post(scoped::assign_user)
                .with(RestaurantGate),
        )
        .at(
            "/api/restaurants/:restaurant/assignments/:user_id",
            delete(scoped::unassign_user).with(RestaurantGate),
        )
        .at("/api/products", get(scoped::list_products).with(RestaurantGate))
        .nest("/api", api_service)
        .nest("/swagger", ui)
        .data(app_data)
}
