//! # Line-Item Snapshot Codec
//!
//! The persisted form of a sale's line items.
//!
//! ## Wire Format
//! A sale row stores its lines as one JSON array, in cart order:
//! ```text
//! [
//!   {"id":1,"name":"RAM 8GB","type":"item","price":100000,"quantity":2,"total":200000},
//!   {"id":3,"name":"Reformat","type":"service","price":35000,"quantity":1,"total":35000}
//! ]
//! ```
//! Amounts are centavos. `total` is written for readers of the raw column;
//! on decode it is recomputed from `price × quantity`.
//!
//! Sales written by the earlier register carry float pesos
//! (`"price": 1000.0`). A JSON integer is always centavos, a JSON float is
//! pesos and is rounded to the nearest centavo.
//!
//! ## Robustness
//! Decoding never fails. Corrupted content yields an empty list so sale
//! listings keep rendering.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::money::Money;
use crate::types::{LineItem, LineKind};

/// One persisted entry.
#[derive(Debug, Serialize, Deserialize)]
struct LineRecord {
    id: i64,
    name: String,
    #[serde(rename = "type")]
    kind: LineKind,
    #[serde(deserialize_with = "stored_amount")]
    price: Money,
    quantity: i64,
    #[serde(default, deserialize_with = "optional_stored_amount")]
    total: Option<Money>,
}

/// An amount as found in the column.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredAmount {
    Centavos(i64),
    Pesos(f64),
}

impl StoredAmount {
    fn into_money(self) -> Option<Money> {
        match self {
            StoredAmount::Centavos(cents) => Some(Money::from_cents(cents)),
            StoredAmount::Pesos(pesos) => {
                let cents = (pesos * 100.0).round();
                // i64::MAX as f64 rounds up, so the bound is exclusive
                if cents.is_finite() && cents >= i64::MIN as f64 && cents < i64::MAX as f64 {
                    Some(Money::from_cents(cents as i64))
                } else {
                    None
                }
            }
        }
    }
}

fn stored_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
    StoredAmount::deserialize(deserializer)?
        .into_money()
        .ok_or_else(|| de::Error::custom("amount out of range"))
}

fn optional_stored_amount<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Money>, D::Error> {
    match Option::<StoredAmount>::deserialize(deserializer)? {
        Some(amount) => amount
            .into_money()
            .map(Some)
            .ok_or_else(|| de::Error::custom("amount out of range")),
        None => Ok(None),
    }
}

impl From<&LineItem> for LineRecord {
    fn from(item: &LineItem) -> Self {
        LineRecord {
            id: item.id,
            name: item.name.clone(),
            kind: item.kind,
            price: item.price,
            quantity: item.quantity,
            total: Some(item.total()),
        }
    }
}

impl From<LineRecord> for LineItem {
    fn from(record: LineRecord) -> Self {
        LineItem::new(record.id, record.kind, record.name, record.price, record.quantity)
    }
}

/// Serializes line items into the persisted form.
///
/// ## Errors
/// Only fails if serde_json does; the sale coordinator treats that as a
/// failure of the whole sale.
pub fn encode_line_items(items: &[LineItem]) -> Result<String, serde_json::Error> {
    let records: Vec<LineRecord> = items.iter().map(LineRecord::from).collect();
    serde_json::to_string(&records)
}

/// Deserializes the persisted form, falling back to an empty list.
///
/// ## Example
/// ```rust
/// use shopfront_core::codec::decode_line_items;
///
/// assert!(decode_line_items("not json").is_empty());
/// assert!(decode_line_items("").is_empty());
/// ```
pub fn decode_line_items(raw: &str) -> Vec<LineItem> {
    match serde_json::from_str::<Vec<LineRecord>>(raw) {
        Ok(records) => records.into_iter().map(LineItem::from).collect(),
        Err(err) => {
            warn!(error = %err, len = raw.len(), "Unreadable line items, showing none");
            Vec::new()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<LineItem> {
        vec![
            LineItem::new(1, LineKind::Item, "RAM 8GB", Money::from_major_minor(1000, 0), 2),
            LineItem::new(3, LineKind::Service, "Reformat", Money::from_major_minor(350, 0), 1),
            LineItem::new(1, LineKind::Service, "Ñandú \"quoted\"", Money::from_cents(1), 7),
        ]
    }

    #[test]
    fn test_round_trip_preserves_order_and_fields() {
        let items = sample();
        let raw = encode_line_items(&items).unwrap();
        assert_eq!(decode_line_items(&raw), items);
    }

    #[test]
    fn test_wire_shape() {
        let raw = encode_line_items(&sample()[..1]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let entry = &value[0];

        assert_eq!(entry["id"], 1);
        assert_eq!(entry["name"], "RAM 8GB");
        assert_eq!(entry["type"], "item");
        assert_eq!(entry["price"], 100000);
        assert_eq!(entry["quantity"], 2);
        assert_eq!(entry["total"], 200000);
    }

    #[test]
    fn test_empty_list() {
        let raw = encode_line_items(&[]).unwrap();
        assert_eq!(raw, "[]");
        assert!(decode_line_items(&raw).is_empty());
    }

    #[test]
    fn test_malformed_content_decodes_to_empty() {
        assert!(decode_line_items("{broken").is_empty());
        assert!(decode_line_items("{\"id\": 1}").is_empty());
        assert!(decode_line_items("[{\"id\":1,\"name\":\"x\",\"type\":\"gadget\",\"price\":1,\"quantity\":1}]").is_empty());
        assert!(decode_line_items("[{\"id\":1,\"name\":\"x\",\"type\":\"item\",\"price\":\"10\",\"quantity\":1}]").is_empty());
        assert!(decode_line_items("[{\"id\":1,\"name\":\"x\",\"type\":\"item\",\"price\":1e300,\"quantity\":1}]").is_empty());
    }

    #[test]
    fn test_float_pesos_from_earlier_register() {
        let raw = r#"[
            {"id": 1, "name": "RAM 8GB", "type": "item", "price": 1000.0, "quantity": 2, "total": 2000.0},
            {"id": 4, "name": "Fan", "type": "item", "price": 199.99, "quantity": 1, "total": 199.99},
            {"id": 1, "name": "Reformat", "type": "service", "price": 350.0, "quantity": 1, "total": 350.0}
        ]"#;

        let items = decode_line_items(raw);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].price, Money::from_major_minor(1000, 0));
        assert_eq!(items[0].total(), Money::from_major_minor(2000, 0));
        assert_eq!(items[1].price, Money::from_cents(19999));
        assert_eq!(items[2].kind, LineKind::Service);
    }

    #[test]
    fn test_missing_total_is_tolerated() {
        let raw = "[{\"id\":2,\"name\":\"SSD\",\"type\":\"item\",\"price\":250000,\"quantity\":1}]";
        let items = decode_line_items(raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].total(), Money::from_major_minor(2500, 0));
    }
}
