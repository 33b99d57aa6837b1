//! 集成测试公用工具：构造 .apkg 牌组和确定性的评分能力

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anki_prioritizer::error::LlmError;
use anki_prioritizer::ImportanceRater;
use async_trait::async_trait;
use rusqlite::Connection;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// 创建只有 `notes(id, flds)` 表的集合数据库
pub fn build_collection(path: &Path, notes: &[(i64, &str)]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, flds TEXT NOT NULL);")
        .unwrap();
    for (id, flds) in notes {
        conn.execute(
            "INSERT INTO notes (id, flds) VALUES (?1, ?2)",
            rusqlite::params![id, flds],
        )
        .unwrap();
    }
}

/// 把若干 (压缩包内文件名, 内容) 打包成 .apkg
pub fn build_archive(path: &Path, entries: &[(&str, Vec<u8>)]) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    for (name, bytes) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

/// 生成一个包含给定笔记的 .apkg（集合放在 `entry` 中）
pub fn build_apkg(dir: &Path, entry: &str, notes: &[(i64, &str)]) -> PathBuf {
    let db_path = dir.join(format!("{}.sqlite", entry));
    build_collection(&db_path, notes);
    let db_bytes = std::fs::read(&db_path).unwrap();

    let apkg = dir.join("deck.apkg");
    build_archive(
        &apkg,
        &[(entry, db_bytes), ("media", b"{}".to_vec())],
    );
    apkg
}

/// 按卡片内容查表返回评分；表里没有的内容返回无法解析的响应
pub struct MapRater {
    ratings: HashMap<String, i64>,
    pub calls: AtomicUsize,
}

impl MapRater {
    pub fn new(pairs: impl IntoIterator<Item = (String, i64)>) -> Self {
        Self {
            ratings: pairs.into_iter().collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImportanceRater for MapRater {
    async fn rate(&self, content: &str) -> Result<i64, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.ratings
            .get(content)
            .copied()
            .ok_or_else(|| LlmError::NotANumber {
                response: "I cannot rate this".to_string(),
            })
    }
}
