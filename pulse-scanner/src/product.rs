//! Storefront product detail (`<product url>.json`) as served by Shopify.

use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product: Product,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: u64,
    pub title: String,
}

impl ProductVariant {
    /// Direct add-to-cart link for one unit of this variant
    pub fn cart_url(&self, base: &Url) -> String {
        format!("{}/cart/{}:1", base.as_str().trim_end_matches('/'), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_product_detail() {
        let json = r#"{"product": {"id": 1, "title": "Cap", "variants": [
            {"id": 111, "title": "Black / OS", "price": "40.00"},
            {"id": 222, "title": "White / OS", "price": "40.00"}
        ]}}"#;
        let detail: ProductDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.product.title, "Cap");
        assert_eq!(detail.product.variants.len(), 2);
        assert_eq!(detail.product.variants[1].id, 222);
    }

    #[test]
    fn test_missing_variants_defaults_to_empty() {
        let detail: ProductDetail = serde_json::from_str(r#"{"product": {}}"#).unwrap();
        assert!(detail.product.variants.is_empty());
    }

    #[test]
    fn test_cart_url() {
        let variant = ProductVariant {
            id: 39_000_111,
            title: "M".to_string(),
        };
        let base = Url::parse("http://a7.co").unwrap();
        assert_eq!(variant.cart_url(&base), "http://a7.co/cart/39000111:1");
    }
}
