use crate::ecs::Component;

/// Nameコンポーネント
/// Entityの表示名（デバッグ・ログ用）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    value: String,
}

impl Name {
    /// 配置アイテムのコンテナ名
    pub const CONTAINER: &'static str = "modelContainer";
    /// 地面モデル名
    pub const GROUND: &'static str = "playground";

    pub fn new(name: impl Into<String>) -> Self {
        Self { value: name.into() }
    }

    pub fn container() -> Self {
        Self::new(Self::CONTAINER)
    }

    pub fn ground() -> Self {
        Self::new(Self::GROUND)
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::container()
    }
}

impl Component for Name {}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}
