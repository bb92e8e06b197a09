// crates/planner-wasm/src/lib.rs

mod config;
mod dom;
mod editor;
mod renderer;
mod shaders;
mod subscription;
mod utils;

use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use planner_core::{PlannerError, PointerButton};
use glam::{Vec2, Vec3};
use planner_renderer::{import_glb, Camera, ImportError};

use config::EditorConfig;
use dom::LedgerView;
use editor::Editor;
use renderer::Renderer;
use subscription::LedgerSubscriptionManager;
use utils::console_log;

// パニック時のスタックトレース表示とロガー登録
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        console_log!("logger already set: {}", err);
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// カメラ操作中のドラッグ
struct CameraDrag {
    button: PointerButton,
    last: Vec2,
}

/// Engine構造体
/// エディタ状態とRendererを統合し、JSから操作可能なAPIを提供
#[wasm_bindgen]
pub struct Engine {
    editor: Editor,
    renderer: Renderer,
    subscriptions: LedgerSubscriptionManager,
    view: Option<LedgerView>,
    // カメラが切り離されている間は None
    camera_drag: Option<CameraDrag>,
}

#[wasm_bindgen]
impl Engine {
    /// 新しいEngineを作成（非同期）
    /// `config` は省略可能（`EditorConfig` のフィールドをcamelCaseで指定）
    pub async fn create(canvas: HtmlCanvasElement, config: JsValue) -> Result<Engine, JsValue> {
        console_log!("Creating Engine...");
        let config = EditorConfig::from_js(config)?;
        let catalog = config.build_catalog().map_err(|e| to_js(PlannerError::from(e)))?;

        let camera = Camera::new(1.0).with_orbit(config.camera.alpha, config.camera.beta, config.camera.radius);
        let renderer = Renderer::create(canvas, camera).await?;

        let view = LedgerView::attach(&config.total_price_element, &config.table_element, &config.currency);
        let editor = Editor::new(catalog, config.rotation_sensitivity);

        let engine = Self {
            editor,
            renderer,
            subscriptions: LedgerSubscriptionManager::new(),
            view,
            camera_drag: None,
        };
        engine.refresh_view();

        console_log!("Engine created successfully ({} catalog models)", engine.editor.catalog().len());
        Ok(engine)
    }

    /// 地面（playground）モデルを読み込む。既存の地面は置き換え
    pub fn load_ground(&mut self, bytes: &[u8]) -> Result<u32, JsValue> {
        let mesh = import_glb(bytes).map_err(|e| to_js(format!("playground: {}", e)))?;
        Ok(self.editor.load_ground(mesh).to_u32())
    }

    /// ドロップ時点の配置先 `[x, y, z]`
    /// モデルの取得を待つ前に呼び、結果を `drop_model` に渡す
    pub fn drop_point(&self, screen_x: f32, screen_y: f32) -> Vec<f32> {
        let ray = self.renderer.screen_to_ray(screen_x, screen_y);
        self.editor.drop_point(&ray).to_array().to_vec()
    }

    /// `drop_point` で求めた位置にモデルを配置し、アイテムIDを返す
    /// メッシュを含まないファイルはエラーログを出して `undefined`
    pub fn drop_model(&mut self, model: &str, bytes: &[u8], drop_point: &[f32]) -> Result<Option<u32>, JsValue> {
        let &[x, y, z] = drop_point else {
            return Err(to_js(format!("drop point must be [x, y, z], got {} values", drop_point.len())));
        };
        let drop_point = Vec3::new(x, y, z);

        let mesh = match import_glb(bytes) {
            Ok(mesh) => mesh,
            Err(ImportError::NoMeshes) => {
                log::error!("model not loaded: {}", model);
                return Ok(None);
            }
            Err(err) => return Err(to_js(format!("{}: {}", model, err))),
        };

        match self.editor.place_model(model, mesh, drop_point) {
            Ok(entity) => {
                self.refresh_view();
                Ok(Some(entity.to_u32()))
            }
            Err(err @ PlannerError::EmptyModel(_)) => {
                log::error!("{}", err);
                Ok(None)
            }
            Err(err) => Err(to_js(err)),
        }
    }

    /// アイテムを削除
    pub fn remove_item(&mut self, id: u32) -> bool {
        match self.editor.remove_item(id) {
            Ok(removed) => {
                log::info!("removed {} ({})", removed.row.model, id);
                if removed.aborted_gesture {
                    self.camera_drag = None;
                }
                self.refresh_view();
                true
            }
            Err(err) => {
                log::warn!("{}", err);
                false
            }
        }
    }

    /// 地面以外を全て削除
    pub fn clear(&mut self) {
        self.editor.clear();
        self.camera_drag = None;
        self.refresh_view();
    }

    // ========================================================================
    // ポインター操作
    // ========================================================================

    /// `button` は `MouseEvent.button`（0: 左, 2: 右）
    pub fn pointer_down(&mut self, x: f32, y: f32, button: i16) {
        let button = PointerButton::from(button);
        let ray = self.renderer.screen_to_ray(x, y);

        if self.editor.pointer_down(&ray, button, x) {
            self.camera_drag = None;
        } else if self.editor.is_camera_attached() {
            self.camera_drag = Some(CameraDrag {
                button,
                last: Vec2::new(x, y),
            });
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if self.editor.is_manipulating() {
            let ray = self.renderer.screen_to_ray(x, y);
            self.editor.pointer_move(&ray, x);
            return;
        }
        if !self.editor.is_camera_attached() {
            return;
        }
        if let Some(drag) = &mut self.camera_drag {
            let position = Vec2::new(x, y);
            let delta = position - drag.last;
            drag.last = position;
            match drag.button {
                PointerButton::Primary => self.renderer.camera.orbit(delta.x, delta.y),
                PointerButton::Secondary => self.renderer.camera.pan(delta.x, delta.y),
                _ => {}
            }
        }
    }

    /// `pointerup` / `pointercancel` / `lostpointercapture` 共通
    pub fn pointer_up(&mut self) {
        self.editor.pointer_up();
        self.camera_drag = None;
    }

    /// ホイールでズーム
    pub fn wheel(&mut self, delta_y: f32) {
        if self.editor.is_camera_attached() {
            self.renderer.camera.zoom(delta_y);
        }
    }

    pub fn has_ground(&self) -> bool {
        self.editor.ground().is_some()
    }

    pub fn is_camera_attached(&self) -> bool {
        self.editor.is_camera_attached()
    }

    /// 操作中のアイテムID
    pub fn selected_item(&self) -> Option<u32> {
        self.editor.manipulator().selected().map(|e| e.to_u32())
    }

    // ========================================================================
    // 台帳
    // ========================================================================

    pub fn total_price(&self) -> f64 {
        self.editor.ledger().total() as f64
    }

    pub fn item_count(&self) -> usize {
        self.editor.ledger().len()
    }

    /// `{ rows: [{ itemId, model, price }], total, totalLabel }`
    pub fn ledger(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.editor.ledger().snapshot()).map_err(to_js)
    }

    pub fn catalog_models(&self) -> Vec<String> {
        self.editor.catalog().models().map(str::to_string).collect()
    }

    /// `[{ model, price, targetSize, rotation }]`（パレット表示用）
    pub fn catalog(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.editor.catalog().entries()).map_err(to_js)
    }

    /// 台帳が変わるたびに次のtickでスナップショットを受け取る
    pub fn subscribe_ledger(&mut self, callback: js_sys::Function) -> u32 {
        self.subscriptions.subscribe(callback)
    }

    pub fn unsubscribe_ledger(&mut self, id: u32) -> bool {
        self.subscriptions.unsubscribe(id)
    }

    // ========================================================================
    // フレーム
    // ========================================================================

    /// 毎フレーム呼ばれる（購読通知 → 描画）
    pub fn tick(&mut self, _delta_time: f32) -> Result<(), JsValue> {
        self.subscriptions.notify(&self.editor.ledger().snapshot())?;
        self.renderer.render_world(self.editor.world(), self.editor.library())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
    }

    pub fn width(&self) -> u32 {
        self.renderer.width()
    }

    pub fn height(&self) -> u32 {
        self.renderer.height()
    }
}

impl Engine {
    fn refresh_view(&self) {
        let Some(view) = &self.view else {
            return;
        };
        if let Err(err) = view.render(self.editor.ledger()) {
            log::warn!("failed to update ledger view: {:?}", err);
        }
    }
}
