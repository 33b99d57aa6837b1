use serde::{Deserialize, Serialize};

/// Anki 笔记 ID
pub type NoteId = i64;

/// 从牌组中读出的一张卡片
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: NoteId,
    /// 去掉 HTML 后的字段文本
    pub content: String,
}

impl CardRecord {
    pub fn new(id: NoteId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

/// 已评分的卡片
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredCard {
    pub id: NoteId,
    pub content: String,
    pub importance: i64,
}

impl ScoredCard {
    /// 由卡片和评分构建（评分范围由调用方校验）
    pub fn new(card: CardRecord, importance: i64) -> Self {
        Self {
            id: card.id,
            content: card.content,
            importance,
        }
    }
}

/// 评分量表（闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingScale {
    pub min: i64,
    pub max: i64,
}

impl Default for RatingScale {
    fn default() -> Self {
        Self { min: 1, max: 10 }
    }
}

impl RatingScale {
    pub fn contains(&self, rating: i64) -> bool {
        (self.min..=self.max).contains(&rating)
    }
}

/// 选出的笔记 ID，按重要性从高到低排列
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionResult {
    ids: Vec<NoteId>,
}

impl SelectionResult {
    pub fn new(ids: Vec<NoteId>) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &[NoteId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Anki 浏览器的搜索语句，例如 `nid:1 or nid:2`
    pub fn search_query(&self) -> String {
        self.ids
            .iter()
            .map(|id| format!("nid:{}", id))
            .collect::<Vec<_>>()
            .join(" or ")
    }

    /// 输出文件内容：每行一个 ID，以换行结尾
    pub fn to_lines(&self) -> String {
        self.ids.iter().map(|id| format!("{}\n", id)).collect()
    }
}
