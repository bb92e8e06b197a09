//! Price ledger
//!
//! Line items in placement order plus their total. The total is always
//! derived from the rows, so removing a row can never leave it stale.

use serde::Serialize;

/// Currency suffix used by the default page
pub const DEFAULT_CURRENCY: &str = "₽";

/// Digit group separator (no-break space, as in ru-RU formatting)
const GROUP_SEPARATOR: char = '\u{a0}';

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Packed entity id of the container
    pub item_id: u32,
    pub model: String,
    pub price: u64,
}

impl LineItem {
    /// "15 000 ₽"
    pub fn price_label(&self, currency: &str) -> String {
        format!("{} {}", format_price(self.price), currency)
    }
}

/// Serializable view handed to JavaScript
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub rows: Vec<LineItem>,
    pub total: u64,
    pub total_label: String,
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    rows: Vec<LineItem>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item_id: u32, model: impl Into<String>, price: u64) {
        self.rows.push(LineItem {
            item_id,
            model: model.into(),
            price,
        });
    }

    pub fn remove(&mut self, item_id: u32) -> Option<LineItem> {
        let pos = self.rows.iter().position(|row| row.item_id == item_id)?;
        Some(self.rows.remove(pos))
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn total(&self) -> u64 {
        self.rows.iter().map(|row| row.price).sum()
    }

    pub fn rows(&self) -> &[LineItem] {
        &self.rows
    }

    pub fn contains(&self, item_id: u32) -> bool {
        self.rows.iter().any(|row| row.item_id == item_id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        let total = self.total();
        LedgerSnapshot {
            rows: self.rows.clone(),
            total,
            total_label: format_price(total),
        }
    }
}

/// Group digits by thousands: 1234567 -> "1 234 567"
pub fn format_price(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0), "0");
        assert_eq!(format_price(999), "999");
        assert_eq!(format_price(3000), "3\u{a0}000");
        assert_eq!(format_price(15000), "15\u{a0}000");
        assert_eq!(format_price(1234567), "1\u{a0}234\u{a0}567");
    }

    #[test]
    fn test_price_label() {
        let row = LineItem {
            item_id: 1,
            model: "msk_201.glb".into(),
            price: 15000,
        };
        assert_eq!(row.price_label(DEFAULT_CURRENCY), "15\u{a0}000 ₽");
    }

    #[test]
    fn test_total_tracks_rows() {
        let mut ledger = Ledger::new();
        ledger.add(1, "swing.glb", 5000);
        ledger.add(2, "bench.glb", 3000);
        ledger.add(3, "swing.glb", 5000);
        assert_eq!(ledger.total(), 13000);

        let removed = ledger.remove(2).unwrap();
        assert_eq!(removed.model, "bench.glb");
        assert_eq!(ledger.total(), 10000);
        assert_eq!(ledger.len(), 2);

        // 二重削除は何もしない
        assert_eq!(ledger.remove(2), None);
        assert_eq!(ledger.total(), 10000);
    }

    #[test]
    fn test_clear() {
        let mut ledger = Ledger::new();
        ledger.add(1, "lgd_3.glb", 11000);
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.total(), 0);
        assert_eq!(ledger.snapshot().total_label, "0");
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut ledger = Ledger::new();
        ledger.add(7, "lgk_11.glb", 6000);
        let json = serde_json::to_value(ledger.snapshot()).unwrap();
        assert_eq!(json["total"], 6000);
        assert_eq!(json["rows"][0]["itemId"], 7);
        assert_eq!(json["rows"][0]["model"], "lgk_11.glb");
        assert_eq!(json["totalLabel"], "6\u{a0}000");
    }
}
