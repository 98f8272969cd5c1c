//! Menu data model
//!
//! `MenuItem` is the row shape shared by the remote payload and the local
//! store. `Category` is derived from the stored rows and carries the only
//! mutable bit of state, the `selected` flag.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A single dish on the menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    /// File name of the dish photo, resolved to a URL by the front end
    #[serde(default)]
    pub image: String,
}

impl MenuItem {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        category: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            category: category.into(),
            image: image.into(),
        }
    }

    /// Price as shown on the menu, e.g. `$12.99`; whole and one-decimal
    /// prices are padded to cents
    pub fn display_price(&self) -> String {
        let mut price = self.price;
        if price.scale() < 2 {
            price.rescale(2);
        }
        format!("${}", price)
    }
}

/// The JSON document served by the remote source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuPayload {
    #[serde(default)]
    pub menu: Vec<MenuItem>,
}

impl MenuPayload {
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// A filter chip derived from the distinct item categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub label: String,
    pub selected: bool,
    pub ordinal: usize,
}

impl Category {
    /// Build the unselected category list from labels in first-seen order
    pub fn from_labels<I, S>(labels: I) -> Vec<Category>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        labels
            .into_iter()
            .enumerate()
            .map(|(ordinal, label)| Category {
                label: label.into(),
                selected: false,
                ordinal,
            })
            .collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.selected {
            write!(f, "[x] {}", self.label)
        } else {
            write!(f, "[ ] {}", self.label)
        }
    }
}

/// Accept prices encoded either as JSON numbers or as strings.
///
/// Numbers are parsed from their textual form so `12.99` stays `12.99`.
fn deserialize_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(serde_json::Number),
        Text(String),
    }

    let text = match RawPrice::deserialize(deserializer)? {
        RawPrice::Number(n) => n.to_string(),
        RawPrice::Text(s) => s.trim().trim_start_matches('$').to_string(),
    };

    let price = parse_price(&text).map_err(serde::de::Error::custom)?;
    check_price_precision(price).map_err(serde::de::Error::custom)
}

/// Parse a price string into a `Decimal`, accepting exponent notation
pub fn parse_price(text: &str) -> Result<Decimal, rust_decimal::Error> {
    Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text))
}

/// Most significant digits a price may carry and still read back
/// unchanged from the store's REAL column
pub const MAX_PRICE_DIGITS: u32 = 15;

/// A price the local store cannot hold exactly
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("price {0} has more than {max} significant digits", max = MAX_PRICE_DIGITS)]
pub struct PricePrecisionError(pub Decimal);

/// Reject prices with more than [`MAX_PRICE_DIGITS`] significant digits
pub fn check_price_precision(price: Decimal) -> Result<Decimal, PricePrecisionError> {
    let mantissa = price.normalize().mantissa().unsigned_abs();
    let digits = mantissa.checked_ilog10().map_or(1, |d| d + 1);
    if digits > MAX_PRICE_DIGITS {
        return Err(PricePrecisionError(price));
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_payload_decodes_numeric_and_string_prices() {
        let json = br#"{
            "menu": [
                {"name": "Greek Salad", "description": "Crispy lettuce", "price": 12.99, "category": "starters", "image": "greekSalad.jpg"},
                {"name": "Lemon Dessert", "description": "Grandma's recipe", "price": "5.00", "category": "desserts", "image": "lemonDessert.jpg"}
            ]
        }"#;

        let payload = MenuPayload::from_json(json).unwrap();
        assert_eq!(payload.menu.len(), 2);
        assert_eq!(payload.menu[0].price, dec!(12.99));
        assert_eq!(payload.menu[1].price, dec!(5.00));
        assert_eq!(payload.menu[1].display_price(), "$5.00");
    }

    #[test]
    fn test_display_price_pads_to_cents() {
        assert_eq!(MenuItem::new("Fish", "", dec!(20), "mains", "").display_price(), "$20.00");
        assert_eq!(MenuItem::new("Fish", "", dec!(20.5), "mains", "").display_price(), "$20.50");
        assert_eq!(MenuItem::new("Fish", "", dec!(0.125), "mains", "").display_price(), "$0.125");
    }

    #[test]
    fn test_price_precision_limit() {
        assert!(check_price_precision(dec!(12.99)).is_ok());
        assert!(check_price_precision(dec!(0)).is_ok());
        assert!(check_price_precision(dec!(1234567890.12345)).is_ok());
        assert!(check_price_precision(dec!(-1234567890.12345)).is_ok());
        // trailing zeros are not significant
        assert!(check_price_precision(dec!(1.50000000000000000)).is_ok());

        let err = check_price_precision(dec!(1234567890.123456789)).unwrap_err();
        assert_eq!(err, PricePrecisionError(dec!(1234567890.123456789)));
    }

    #[test]
    fn test_payload_rejects_high_precision_price() {
        let json = br#"{"menu": [{"name": "Caviar", "price": "1234567890.123456789", "category": "specials"}]}"#;
        let err = MenuPayload::from_json(json).unwrap_err();
        assert!(err.to_string().contains("significant digits"), "{}", err);
    }

    #[test]
    fn test_payload_rejects_non_numeric_price() {
        let json = br#"{"menu": [{"name": "Soup", "price": "cheap", "category": "mains"}]}"#;
        assert!(MenuPayload::from_json(json).is_err());
    }

    #[test]
    fn test_missing_optional_fields_default_to_empty() {
        let json = br#"{"menu": [{"name": "Bruschetta", "price": 7.99}]}"#;
        let payload = MenuPayload::from_json(json).unwrap();
        assert_eq!(payload.menu[0].category, "");
        assert_eq!(payload.menu[0].image, "");
    }

    #[test]
    fn test_categories_from_labels() {
        let categories = Category::from_labels(["starters", "mains"]);
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1].label, "mains");
        assert_eq!(categories[1].ordinal, 1);
        assert!(categories.iter().all(|c| !c.selected));
    }
}
