use glam::Quat;

use crate::ecs::Component;
use crate::math::Aabb;

/// 配置済みアイテム（コンテナ）
/// 台帳の行と1対1で対応する
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedItem {
    /// カタログ上のモデル名（例: "swing.glb"）
    pub model: String,
    /// ドロップ時に確定した価格
    pub price: u64,
    /// カタログ由来の初期回転
    pub base_rotation: Quat,
    /// ユーザー操作によるY軸回転（ラジアン）
    pub yaw: f32,
}

impl PlacedItem {
    pub fn new(model: impl Into<String>, price: u64) -> Self {
        Self {
            model: model.into(),
            price,
            base_rotation: Quat::IDENTITY,
            yaw: 0.0,
        }
    }

    pub fn with_base_rotation(mut self, rotation: Quat) -> Self {
        self.base_rotation = rotation;
        self
    }

    /// yawを反映した最終回転
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * self.base_rotation
    }
}

impl Component for PlacedItem {}

/// 地面マーカー
/// クリア対象外、ドラッグ時のピック対象
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ground;

impl Component for Ground {}

/// モデルローカル空間のバウンディングボックス
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalBounds(pub Aabb);

impl Component for LocalBounds {}

/// メッシュライブラリ内のID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u32);

/// 描画・ピックに使うメッシュへの参照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshRef(pub MeshId);

impl Component for MeshRef {}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_rotation_combines_yaw_and_base() {
        let item = PlacedItem::new("bench.glb", 3000)
            .with_base_rotation(Quat::from_rotation_x(FRAC_PI_2));
        assert!(item.rotation().abs_diff_eq(item.base_rotation, 1e-6));

        let turned = PlacedItem { yaw: FRAC_PI_2, ..item };
        // ベンチの上方向(+Y)はX回転で+Zへ、さらにyawで+Xへ
        let up = turned.rotation() * Vec3::Y;
        assert!((up - Vec3::X).length() < 1e-5);
    }
}
