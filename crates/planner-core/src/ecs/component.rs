/// 全コンポーネントが実装すべきマーカートレイト
/// - `'static`: コンポーネントは参照を持たない
/// - `Send + Sync`: 型消去ストレージ（`Box<dyn AnyStorage>`）に格納するため
pub trait Component: 'static + Send + Sync {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Price(u64);
    impl Component for Price {}

    fn assert_component<T: Component>() {}

    #[test]
    fn test_marker_is_implementable() {
        assert_component::<Price>();
        assert_eq!(Price(3000).0, 3000);
    }
}
