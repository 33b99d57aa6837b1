//! 牌组读取（数据来源）

pub mod apkg;

pub use apkg::{extract_cards, load_deck, render_fields};
