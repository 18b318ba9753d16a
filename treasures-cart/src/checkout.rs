//! Checkout simulation
//!
//! Order placement is simulated client-side: the shipping form is
//! validated, a confirmation is produced, and the cart is cleared. No
//! payment provider is contacted; `PaymentMethod` only records the
//! shopper's choice for the confirmation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::cart::CartLine;
use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::store::CartStore;

/// Payment option offered at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery
    #[default]
    Cod,
    Online,
}

/// Shipping and contact details collected by the checkout form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckoutDetails {
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
    #[validate(email(message = "enter a valid email address"))]
    pub email: String,
    /// Indian mobile number, exactly 10 digits
    #[validate(custom(function = validate_phone))]
    pub phone: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    /// Apartment / suite, optional
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apartment: Option<String>,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "state is required"))]
    pub state: String,
    /// Indian postal code, exactly 6 digits
    #[validate(custom(function = validate_pincode))]
    pub pincode: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("phone").with_message("enter a valid 10-digit phone number".into()))
    }
}

fn validate_pincode(pincode: &str) -> Result<(), ValidationError> {
    if pincode.len() == 6 && pincode.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("pincode").with_message("enter a valid 6-digit pincode".into()))
    }
}

/// Checkout errors
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    /// One message per failed field, suitable for inline display
    #[error("Invalid checkout details: {}", .0.join(", "))]
    Invalid(Vec<String>),
}

/// Result of a successfully placed (simulated) order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_id: String,
    pub placed_at: DateTime<Utc>,
    /// Line snapshots at placement time
    pub items: Vec<CartLine>,
    pub total_items: u32,
    /// Whole rupees
    pub total_price: f64,
    pub payment_method: PaymentMethod,
}

/// Validate the form, snapshot the cart into a confirmation, and clear it
///
/// The cart is only cleared on success; a rejected form leaves it intact.
pub fn place_order(
    cart: &mut CartStore,
    details: &CheckoutDetails,
) -> Result<OrderConfirmation, CheckoutError> {
    if cart.items().is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    details.validate().map_err(|errors| {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: invalid value", field),
                })
            })
            .collect();
        messages.sort();
        CheckoutError::Invalid(messages)
    })?;

    let confirmation = OrderConfirmation {
        order_id: Uuid::new_v4().to_string(),
        placed_at: Utc::now(),
        items: cart.items().to_vec(),
        total_items: cart.total_items(),
        total_price: cart.total_price(),
        payment_method: details.payment_method,
    };

    tracing::info!(
        order_id = %confirmation.order_id,
        total = confirmation.total_price,
        "Order placed"
    );

    cart.clear();
    Ok(confirmation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStore;
    use shared::cart::CartItemInput;
    use shared::models::Category;

    fn valid_details() -> CheckoutDetails {
        CheckoutDetails {
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
        }
    }

    fn cart_with_item() -> CartStore {
        let mut cart = CartStore::load(LocalStore::open_in_memory().unwrap());
        cart.add_item(CartItemInput {
            id: "shawl-001".to_string(),
            name: "Royal Kashmiri Pashmina".to_string(),
            price: 45000.0,
            image: "/uploads/shawl.jpg".to_string(),
            category: Category::Shawls,
            variant: Some("Color: Ivory".to_string()),
        });
        cart
    }

    #[test]
    fn test_place_order_clears_cart() {
        let mut cart = cart_with_item();

        let confirmation = place_order(&mut cart, &valid_details()).unwrap();

        assert_eq!(confirmation.total_items, 1);
        assert_eq!(confirmation.total_price, 45000.0);
        assert_eq!(confirmation.items.len(), 1);
        assert!(cart.items().is_empty());
        assert_eq!(cart.total_price(), 0.0);
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let mut cart = CartStore::load(LocalStore::open_in_memory().unwrap());
        assert!(matches!(
            place_order(&mut cart, &valid_details()),
            Err(CheckoutError::EmptyCart)
        ));
    }

    #[test]
    fn test_invalid_email_is_rejected() {
        let mut cart = cart_with_item();
        let details = CheckoutDetails {
            email: "not-an-email".to_string(),
            ..valid_details()
        };

        let err = place_order(&mut cart, &details).unwrap_err();
        match err {
            CheckoutError::Invalid(messages) => {
                assert!(messages.iter().any(|m| m.starts_with("email:")));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
        // Rejected checkout leaves the cart intact
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_short_phone_is_rejected() {
        let mut cart = cart_with_item();
        let details = CheckoutDetails {
            phone: "12345".to_string(),
            ..valid_details()
        };

        assert!(matches!(
            place_order(&mut cart, &details),
            Err(CheckoutError::Invalid(_))
        ));
    }

    #[test]
    fn test_non_digit_pincode_is_rejected() {
        let mut cart = cart_with_item();
        let details = CheckoutDetails {
            pincode: "19000a".to_string(),
            ..valid_details()
        };

        assert!(matches!(
            place_order(&mut cart, &details),
            Err(CheckoutError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_required_fields_collects_messages() {
        let mut cart = cart_with_item();
        let details = CheckoutDetails {
            first_name: String::new(),
            city: String::new(),
            ..valid_details()
        };

        let err = place_order(&mut cart, &details).unwrap_err();
        match err {
            CheckoutError::Invalid(messages) => {
                assert!(messages.iter().any(|m| m.starts_with("first_name:")));
                assert!(messages.iter().any(|m| m.starts_with("city:")));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }
}
