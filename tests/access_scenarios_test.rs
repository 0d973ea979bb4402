mod common;

use common::{admin, assign_manager, create_restaurant, create_restaurant_with_id, manager, setup_app_data, staff};
use restaurant_access::types::db::product;
use restaurant_access::types::internal::context::RequestContext;
use restaurant_access::types::internal::{AccessDecision, Principal, PrincipalRole, RestaurantRef};
use sea_orm::EntityTrait;

#[tokio::test]
async fn test_global_roles_allowed_for_any_identifier() {
    let app_data = setup_app_data(&[]).await;
    let existing = create_restaurant(&app_data, "existing").await;
    let city_admin = Principal::new(2, [PrincipalRole::CityAdmin]);

    for principal in [admin(1), city_admin] {
        for reference in [RestaurantRef::Id(existing.id), RestaurantRef::Id(12345)] {
            let decision = app_data
                .access_provider
                .resolve(Some(&principal), Some(&reference))
                .await
                .unwrap();
            assert_eq!(decision, AccessDecision::Allow);
        }
    }
}

#[tokio::test]
async fn test_assigned_manager_allowed_and_can_access() {
    let app_data = setup_app_data(&[]).await;
    let restaurant = create_restaurant(&app_data, "assigned").await;
    assign_manager(&app_data, restaurant.id, 10).await;
    let principal = manager(10);

    let decision = app_data
        .access_provider
        .resolve(Some(&principal), Some(&restaurant.id.into()))
        .await
        .unwrap();

    assert_eq!(decision, AccessDecision::Allow);
    assert!(
        app_data
            .scope_provider
            .can_access_restaurant(Some(&principal), Some(&restaurant))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_unassigned_manager_denied() {
    let app_data = setup_app_data(&[]).await;
    let restaurant = create_restaurant(&app_data, "elsewhere").await;

    let decision = app_data
        .access_provider
        .resolve(Some(&manager(10)), Some(&restaurant.id.into()))
        .await
        .unwrap();

    assert_eq!(decision, AccessDecision::Deny);
}

#[tokio::test]
async fn test_nonexistent_restaurant_not_found_for_scoped_principals() {
    let app_data = setup_app_data(&[]).await;
    let nobody = Principal::new(30, []);

    for principal in [manager(10), staff(20), nobody] {
        let decision = app_data
            .access_provider
            .resolve(Some(&principal), Some(&RestaurantRef::Id(999)))
            .await
            .unwrap();
        assert_eq!(decision, AccessDecision::NotFound, "principal {}", principal.id());
    }
}

#[tokio::test]
async fn test_soft_deleted_restaurant_not_found() {
    let app_data = setup_app_data(&[]).await;
    let restaurant = create_restaurant(&app_data, "closing").await;
    assign_manager(&app_data, restaurant.id, 10).await;
    app_data.restaurant_store.soft_delete(restaurant.id).await.unwrap();

    let decision = app_data
        .access_provider
        .resolve(Some(&manager(10)), Some(&restaurant.id.into()))
        .await
        .unwrap();

    assert_eq!(decision, AccessDecision::NotFound);
}

#[tokio::test]
async fn test_deactivation_flips_access() {
    let app_data = setup_app_data(&[]).await;
    let restaurant = create_restaurant(&app_data, "flip").await;
    assign_manager(&app_data, restaurant.id, 10).await;
    let principal = manager(10);
    let scope = &app_data.scope_provider;
    assert!(scope.can_access_restaurant(Some(&principal), Some(&restaurant)).await.unwrap());

    app_data
        .assignment_store
        .deactivate(&RequestContext::for_system("test"), restaurant.id, 10)
        .await
        .unwrap();

    assert!(!scope.can_access_restaurant(Some(&principal), Some(&restaurant)).await.unwrap());
}

#[tokio::test]
async fn test_manager_assigned_to_restaurant_seven() {
    let app_data = setup_app_data(&[]).await;
    create_restaurant_with_id(&app_data, 3, "three").await;
    let seven = create_restaurant_with_id(&app_data, 7, "seven").await;
    assign_manager(&app_data, 7, 10).await;
    let principal = manager(10);

    let assigned_id = app_data
        .scope_provider
        .get_assigned_restaurant_id(Some(&principal))
        .await
        .unwrap();
    let accessible = app_data
        .scope_provider
        .get_accessible_restaurants(Some(&principal))
        .await
        .unwrap();

    assert_eq!(assigned_id, Some(7));
    assert_eq!(accessible, vec![seven]);
}

#[tokio::test]
async fn test_staff_without_assignments_sees_nothing() {
    let app_data = setup_app_data(&[]).await;
    let restaurant = create_restaurant(&app_data, "busy").await;
    app_data.product_store.create(restaurant.id, "Bread", 300).await.unwrap();
    let principal = staff(20);

    let accessible = app_data
        .scope_provider
        .get_accessible_restaurants(Some(&principal))
        .await
        .unwrap();
    let scoped = app_data
        .scope_provider
        .scope_query(Some(&principal), product::Entity::find())
        .await
        .unwrap();

    assert!(accessible.is_empty());
    assert!(app_data.product_store.fetch(scoped).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_scope_query_results_stay_within_assigned_restaurant() {
    let app_data = setup_app_data(&[]).await;
    let mine = create_restaurant(&app_data, "mine").await;
    let other = create_restaurant(&app_data, "other").await;
    for (restaurant_id, name) in [(mine.id, "Tea"), (other.id, "Coffee"), (mine.id, "Cake")] {
        app_data.product_store.create(restaurant_id, name, 250).await.unwrap();
    }
    assign_manager(&app_data, mine.id, 10).await;

    let scoped = app_data
        .scope_provider
        .scope_query(Some(&manager(10)), product::Entity::find())
        .await
        .unwrap();
    let rows = app_data.product_store.fetch(scoped).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.restaurant_id == mine.id));
}

#[tokio::test]
async fn test_unassigned_manager_scope_query_yields_nothing() {
    let app_data = setup_app_data(&[]).await;
    let restaurant = create_restaurant(&app_data, "any").await;
    app_data.product_store.create(restaurant.id, "Tea", 250).await.unwrap();

    let scoped = app_data
        .scope_provider
        .scope_query(Some(&manager(11)), product::Entity::find())
        .await
        .unwrap();

    assert!(app_data.product_store.fetch(scoped).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unscoped_policy_deny_is_applied() {
    let pass_through = setup_app_data(&[]).await;
    let deny = setup_app_data(&[("UNSCOPED_POLICY", "deny")]).await;

    let allowed = pass_through.access_provider.resolve(Some(&staff(20)), None).await.unwrap();
    let denied = deny.access_provider.resolve(Some(&staff(20)), None).await.unwrap();

    assert_eq!(allowed, AccessDecision::Allow);
    assert_eq!(denied, AccessDecision::Deny);
}
