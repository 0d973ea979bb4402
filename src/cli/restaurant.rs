use crate::stores::RestaurantStore;

/// Create a restaurant and print its id
pub async fn add_restaurant(
    restaurant_store: &RestaurantStore,
    name: &str,
    slug: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let restaurant = restaurant_store.create(name, slug).await?;

    println!("✅ Created restaurant {} ({}) with id {}", restaurant.name, restaurant.slug, restaurant.id);

    Ok(())
}
