use thiserror::Error;

/// カタログ設定の読み込みエラー
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate catalog entry: {0}")]
    Duplicate(String),
    #[error("catalog entry {model}: target size must be positive, got {size}")]
    InvalidSize { model: String, size: f32 },
}

/// プランナー全体のエラー
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("unknown item id: {0}")]
    UnknownItem(u32),
    #[error("model {0} has no geometry")]
    EmptyModel(String),
}
