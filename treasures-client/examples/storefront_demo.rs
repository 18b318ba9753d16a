//! End-to-end storefront walkthrough against a running backend
//!
//! Start the catalog API (default http://localhost:8000, override with
//! TREASURES_API_URL), then:
//!
//! ```sh
//! cargo run --example storefront_demo
//! ```

use treasures_cart::{CartStore, CheckoutDetails, LocalStore, PaymentMethod, checkout};
use treasures_client::{Category, ClientConfig, StorefrontClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let default_filter = if treasures_client::config::is_development() {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let data_dir = tempfile::tempdir()?;
    let store = LocalStore::open(data_dir.path().join("storefront.redb"))?;

    let client = StorefrontClient::new(ClientConfig::from_env(), store.clone());
    println!("API base URL: {}", client.base_url());

    if !client.check_health().await {
        println!("Backend is not reachable; nothing to browse.");
        return Ok(());
    }

    // Browse the shawls category, degrading to an empty list on failure
    let shawls = match client.get_products(Some(Category::Shawls)).await {
        Ok(products) => products,
        Err(e) => {
            println!("Could not load products: {}", e);
            Vec::new()
        }
    };
    println!("{} shawls available", shawls.len());

    let mut cart = CartStore::load(store);
    for product in shawls.iter().take(2) {
        cart.add_item(shared::cart::CartItemInput {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            category: product.category,
            variant: None,
        });
        println!("Added to cart: {} (Rs {})", product.name, product.price);
    }

    println!(
        "Cart: {} items, Rs {} total",
        cart.total_items(),
        cart.total_price()
    );

    if cart.items().is_empty() {
        return Ok(());
    }

    let details = CheckoutDetails {
        first_name: "Aadil".to_string(),
        last_name: "Mir".to_string(),
        email: "aadil@example.com".to_string(),
        phone: "9876543210".to_string(),
        address: "12 Boulevard Road".to_string(),
        apartment: None,
        city: "Srinagar".to_string(),
        state: "Jammu and Kashmir".to_string(),
        pincode: "190001".to_string(),
        payment_method: PaymentMethod::Cod,
    };

    let confirmation = checkout::place_order(&mut cart, &details)?;
    println!(
        "Order {} placed for Rs {}; cart now has {} items",
        confirmation.order_id,
        confirmation.total_price,
        cart.total_items()
    );

    Ok(())
}
