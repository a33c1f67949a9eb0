//! Snapshot codec.
//!
//! A snapshot is the whole cart serialized as a JSON array of line items,
//! the same shape a browser storefront keeps in local storage.

use rocketcart_core::Cart;

use super::StorageError;

/// Serialize a cart into snapshot text.
///
/// # Errors
///
/// Returns `StorageError::Encoding` if serialization fails.
pub fn encode(cart: &Cart) -> Result<String, StorageError> {
    Ok(serde_json::to_string(cart)?)
}

/// Parse snapshot text back into a cart.
///
/// Cart invariants are checked while parsing: a zero quantity or a repeated
/// product ID makes the snapshot unreadable.
///
/// # Errors
///
/// Returns `StorageError::Encoding` if the text is not a valid cart.
pub fn decode(snapshot: &str) -> Result<Cart, StorageError> {
    Ok(serde_json::from_str(snapshot)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketcart_core::{LineItem, Price, ProductId, Quantity};

    use super::*;

    #[test]
    fn test_encode_is_a_json_array() {
        let cart = Cart::from_items(vec![LineItem {
            id: ProductId::new(7),
            title: "X".to_string(),
            price: Price::from_cents(17990),
            image: None,
            amount: Quantity::new(2).unwrap(),
        }])
        .unwrap();

        let text = encode(&cart).unwrap();
        assert_eq!(
            text,
            r#"[{"id":7,"title":"X","price":"179.90","amount":2}]"#
        );
        assert_eq!(decode(&text).unwrap(), cart);
    }

    #[test]
    fn test_empty_cart() {
        assert_eq!(encode(&Cart::new()).unwrap(), "[]");
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode("not json"), Err(StorageError::Encoding(_))));
        assert!(decode(r#"{"id": 1}"#).is_err());
        assert!(decode(r#"[{"id":1,"title":"A","price":"1","amount":0}]"#).is_err());
    }
}
