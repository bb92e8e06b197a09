//! エディタ設定
//!
//! JSから渡されるプレーンなオブジェクト。全フィールド省略可能。

use planner_core::{Catalog, CatalogEntry, DEFAULT_CURRENCY, DEFAULT_ROTATION_SENSITIVITY};
use serde::Deserialize;
use wasm_bindgen::JsValue;

/// 初期カメラの軌道パラメータ
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub alpha: f32,
    pub beta: f32,
    pub radius: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            beta: 1.3,
            radius: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// 省略時は組み込みカタログ
    pub catalog: Option<Vec<CatalogEntry>>,
    pub rotation_sensitivity: f32,
    pub camera: CameraConfig,
    pub total_price_element: String,
    pub table_element: String,
    pub currency: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            rotation_sensitivity: DEFAULT_ROTATION_SENSITIVITY,
            camera: CameraConfig::default(),
            total_price_element: "totalPrice".to_string(),
            table_element: "elementsTable".to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl EditorConfig {
    /// `undefined` / `null` は既定値として扱う
    pub fn from_js(value: JsValue) -> Result<Self, JsValue> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        serde_wasm_bindgen::from_value(value)
            .map_err(|e| JsValue::from_str(&format!("Invalid editor config: {}", e)))
    }

    /// カタログを構築（重複・不正サイズはエラー）
    pub fn build_catalog(&self) -> Result<Catalog, planner_core::CatalogError> {
        match &self.catalog {
            Some(entries) => Catalog::new(entries.clone()),
            None => Ok(Catalog::default()),
        }
    }
}
