//! 台帳のDOM表示
//!
//! 合計金額の要素と明細テーブルの tbody を台帳の内容で書き換える。
//! 削除ボタンには `data-item-id` を付け、クリック処理はページ側で委譲する。

use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use planner_core::{format_price, Ledger, LineItem};

pub const DELETE_BUTTON_CLASS: &str = "delete-button";
pub const ITEM_ID_ATTRIBUTE: &str = "data-item-id";
const DELETE_BUTTON_LABEL: &str = "🗑️";

pub struct LedgerView {
    document: Document,
    total: Option<Element>,
    rows: Option<Element>,
    currency: String,
}

impl LedgerView {
    /// 要素が見つからない場合は警告を出し、その部分の描画をスキップする
    pub fn attach(total_id: &str, table_id: &str, currency: &str) -> Option<Self> {
        let document = web_sys::window()?.document()?;

        let total = document.get_element_by_id(total_id);
        if total.is_none() {
            log::warn!("total price element #{} not found", total_id);
        }

        let rows = document
            .get_element_by_id(table_id)
            .and_then(|table| table.query_selector("tbody").ok().flatten());
        if rows.is_none() {
            log::warn!("table body #{} tbody not found", table_id);
        }

        Some(Self {
            document,
            total,
            rows,
            currency: currency.to_string(),
        })
    }

    pub fn render(&self, ledger: &Ledger) -> Result<(), JsValue> {
        if let Some(total) = &self.total {
            total.set_text_content(Some(&format_price(ledger.total())));
        }

        if let Some(rows) = &self.rows {
            rows.set_inner_html("");
            for item in ledger.rows() {
                let row = self.build_row(item)?;
                rows.append_child(&row)?;
            }
        }

        Ok(())
    }

    fn build_row(&self, item: &LineItem) -> Result<Element, JsValue> {
        let row = self.document.create_element("tr")?;

        for text in row_cells(item, &self.currency) {
            let cell = self.document.create_element("td")?;
            cell.set_text_content(Some(&text));
            row.append_child(&cell)?;
        }

        let cell = self.document.create_element("td")?;
        let button = self.document.create_element("button")?;
        button.set_class_name(DELETE_BUTTON_CLASS);
        button.set_attribute(ITEM_ID_ATTRIBUTE, &item.item_id.to_string())?;
        button.set_attribute("style", "cursor:pointer;")?;
        button.set_text_content(Some(DELETE_BUTTON_LABEL));
        cell.append_child(&button)?;
        row.append_child(&cell)?;

        Ok(row)
    }
}

/// モデル名と価格ラベルの2列
fn row_cells(item: &LineItem, currency: &str) -> [String; 2] {
    [item.model.clone(), item.price_label(currency)]
}
