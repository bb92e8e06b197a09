//! ユーティリティモジュール
//!
//! console_log マクロ。`log` クレートの出力先は `console_log` クレートが担う

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);
}

/// コンソールにログ出力するマクロ
macro_rules! console_log {
    ($($t:tt)*) => (crate::utils::log(&format_args!($($t)*).to_string()))
}
pub(crate) use console_log;
