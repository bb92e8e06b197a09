//! 台帳購読管理モジュール
//!
//! 台帳スナップショットの変更を監視し、コールバックを呼び出す

use js_sys::Function;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use wasm_bindgen::JsValue;

use planner_core::LedgerSnapshot;

/// 購読情報
pub struct LedgerSubscription {
    pub callback: Function,
    pub last_snapshot_hash: u64,
}

/// 購読マネージャー
pub struct LedgerSubscriptionManager {
    subscriptions: HashMap<u32, LedgerSubscription>,
    next_id: u32,
}

impl LedgerSubscriptionManager {
    pub fn new() -> Self {
        Self {
            subscriptions: HashMap::new(),
            next_id: 1,
        }
    }

    /// 登録直後の最初のnotifyで必ず1回呼ばれる
    pub fn subscribe(&mut self, callback: Function) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        self.subscriptions.insert(
            id,
            LedgerSubscription {
                callback,
                last_snapshot_hash: 0,
            },
        );

        id
    }

    pub fn unsubscribe(&mut self, id: u32) -> bool {
        self.subscriptions.remove(&id).is_some()
    }

    /// 前回から変化した購読にだけスナップショットを渡す
    pub fn notify(&mut self, snapshot: &LedgerSnapshot) -> Result<(), JsValue> {
        if self.subscriptions.is_empty() {
            return Ok(());
        }

        let hash = calculate_hash(snapshot);
        let stale: Vec<u32> = self
            .subscriptions
            .iter()
            .filter(|(_, sub)| sub.last_snapshot_hash != hash)
            .map(|(&id, _)| id)
            .collect();
        if stale.is_empty() {
            return Ok(());
        }

        let value = serde_wasm_bindgen::to_value(snapshot)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize ledger: {}", e)))?;

        for id in stale {
            if let Some(sub) = self.subscriptions.get_mut(&id) {
                sub.last_snapshot_hash = hash;
                if let Err(err) = sub.callback.call1(&JsValue::NULL, &value) {
                    log::error!("ledger subscriber {} failed: {:?}", id, err);
                }
            }
        }

        Ok(())
    }
}

impl Default for LedgerSubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// スナップショットのハッシュを計算
pub fn calculate_hash(snapshot: &LedgerSnapshot) -> u64 {
    let json = serde_json::to_string(snapshot).unwrap_or_default();
    let mut hasher = DefaultHasher::new();
    json.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::Ledger;

    #[test]
    fn test_hash_tracks_ledger_contents() {
        let mut ledger = Ledger::new();
        let empty = calculate_hash(&ledger.snapshot());

        ledger.add(1, "swing.glb", 5000);
        let one = calculate_hash(&ledger.snapshot());
        assert_ne!(empty, one);
        assert_eq!(one, calculate_hash(&ledger.snapshot()));

        ledger.remove(1);
        assert_eq!(empty, calculate_hash(&ledger.snapshot()));
    }

    #[test]
    fn test_same_total_different_rows() {
        let mut a = Ledger::new();
        a.add(1, "swing.glb", 5000);
        let mut b = Ledger::new();
        b.add(2, "swing.glb", 5000);
        assert_ne!(calculate_hash(&a.snapshot()), calculate_hash(&b.snapshot()));
    }
}
