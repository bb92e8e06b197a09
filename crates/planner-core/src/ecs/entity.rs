use std::fmt;
use std::num::NonZeroU32;

/// Entity識別子（世代番号付き）
/// - index: Entity配列のインデックス
/// - generation: 再利用時の世代番号（削除済みの配置アイテムとの区別用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    index: u32,
    generation: NonZeroU32,
}

/// JS側IDのビット配分（上位12bit: generation, 下位20bit: index）
const INDEX_BITS: u32 = 20;
const INDEX_MASK: u32 = (1 << INDEX_BITS) - 1;
const GENERATION_MASK: u32 = 0xFFF;

impl EntityId {
    /// 新しいEntityIdを作成
    /// generationは1以上である必要がある（0は無効値として予約）
    pub fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation: NonZeroU32::new(generation).expect("generation must be >= 1"),
        }
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation.get()
    }

    /// 台帳の行やDOMの`data-item-id`に載せるパック済みID
    #[inline]
    pub fn to_u32(&self) -> u32 {
        ((self.generation.get() & GENERATION_MASK) << INDEX_BITS) | (self.index & INDEX_MASK)
    }

    /// パック済みIDから復元
    /// generation部が0のIDは一度も発行されていないのでNone
    #[inline]
    pub fn from_u32(id: u32) -> Option<Self> {
        let generation = NonZeroU32::new((id >> INDEX_BITS) & GENERATION_MASK)?;
        Some(Self {
            index: id & INDEX_MASK,
            generation,
        })
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}
