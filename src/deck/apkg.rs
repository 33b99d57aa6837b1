//! `.apkg` 牌组读取
//!
//! `.apkg` 是一个 zip 压缩包，里面的 `collection.anki21` / `collection.anki2`
//! 是 SQLite 数据库。这里只读取 `notes` 表的 `id` 和 `flds`。

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};
use zip::ZipArchive;

use crate::error::{AppResult, DeckError};
use crate::models::CardRecord;

/// 按优先级排列的集合数据库文件名
const COLLECTION_ENTRIES: [&str; 2] = ["collection.anki21", "collection.anki2"];
/// 新版导出格式（zstd 压缩），不支持
const COMPRESSED_COLLECTION: &str = "collection.anki21b";
/// Anki 字段分隔符
const FIELD_SEPARATOR: char = '\x1f';

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static SOUND_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[sound:[^\]]*\]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// 异步读取牌组（SQLite 和解压在阻塞线程池中执行）
pub async fn load_deck(path: &Path) -> AppResult<Vec<CardRecord>> {
    let path: PathBuf = path.to_path_buf();
    let cards = tokio::task::spawn_blocking(move || extract_cards(&path)).await??;
    Ok(cards)
}

/// 从 `.apkg` 文件中读出所有卡片，按笔记 ID 排序
pub fn extract_cards(path: &Path) -> Result<Vec<CardRecord>, DeckError> {
    let deck_name = path.display().to_string();

    if !path.is_file() {
        return Err(DeckError::NotFound { path: deck_name });
    }

    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file).map_err(|source| DeckError::InvalidArchive {
        path: deck_name.clone(),
        source,
    })?;

    let entry = pick_collection_entry(&archive, &deck_name)?;
    debug!("使用集合数据库: {}", entry);

    // rusqlite 只能打开磁盘上的文件，先解压到临时文件
    let mut db_file = tempfile::NamedTempFile::new()?;
    {
        let mut zipped = archive
            .by_name(entry)
            .map_err(|source| DeckError::InvalidArchive {
                path: deck_name.clone(),
                source,
            })?;
        io::copy(&mut zipped, db_file.as_file_mut())?;
    }

    let cards = read_notes(db_file.path())?;
    info!("📚 从 {} 读取到 {} 张卡片", deck_name, cards.len());

    Ok(cards)
}

fn pick_collection_entry<R: io::Read + io::Seek>(
    archive: &ZipArchive<R>,
    deck_name: &str,
) -> Result<&'static str, DeckError> {
    let names: Vec<&str> = archive.file_names().collect();
    let has = |name: &str| names.iter().any(|n| *n == name);

    if has(COLLECTION_ENTRIES[0]) {
        return Ok(COLLECTION_ENTRIES[0]);
    }
    // 新版导出中的 collection.anki2 只是提示升级的占位数据库
    if has(COMPRESSED_COLLECTION) {
        return Err(DeckError::UnsupportedFormat {
            path: deck_name.to_string(),
            entry: COMPRESSED_COLLECTION.to_string(),
        });
    }
    if has(COLLECTION_ENTRIES[1]) {
        return Ok(COLLECTION_ENTRIES[1]);
    }

    Err(DeckError::MissingCollection {
        path: deck_name.to_string(),
    })
}

fn read_notes(db_path: &Path) -> Result<Vec<CardRecord>, DeckError> {
    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

    let mut stmt = conn.prepare("SELECT id, flds FROM notes ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        let id: i64 = row.get(0)?;
        let fields: String = row.get(1)?;
        Ok(CardRecord::new(id, render_fields(&fields)))
    })?;

    let mut cards = Vec::new();
    for row in rows {
        cards.push(row?);
    }
    Ok(cards)
}

/// 把 `flds` 转成纯文本：逐个字段去掉 HTML，丢弃空字段，用换行连接
pub fn render_fields(raw: &str) -> String {
    raw.split(FIELD_SEPARATOR)
        .map(strip_html)
        .filter(|field| !field.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_html(field: &str) -> String {
    let text = field
        .replace("<br>", " ")
        .replace("<br/>", " ")
        .replace("<br />", " ");
    let text = HTML_TAG.replace_all(&text, " ");
    let text = SOUND_REF.replace_all(&text, " ");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_split_and_joined() {
        assert_eq!(
            render_fields("What is Rust?\x1fA systems language"),
            "What is Rust?\nA systems language"
        );
    }

    #[test]
    fn html_and_entities_are_removed() {
        let raw = "<div><b>H<sub>2</sub>O</b>&nbsp;is&nbsp;water</div>\x1f<img src=\"a.png\">Tom &amp; Jerry";
        assert_eq!(render_fields(raw), "H 2 O is water\nTom & Jerry");
    }

    #[test]
    fn sound_only_fields_are_dropped() {
        assert_eq!(render_fields("Bonjour\x1f[sound:bonjour.mp3]\x1f"), "Bonjour");
    }

    #[test]
    fn empty_note_renders_empty_text() {
        assert_eq!(render_fields("\x1f  \x1f<br>"), "");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = extract_cards(&dir.path().join("nope.apkg"));

        assert!(matches!(result, Err(DeckError::NotFound { .. })));
    }

    #[test]
    fn non_zip_file_is_invalid_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.apkg");
        std::fs::write(&path, b"definitely not a zip").unwrap();

        let result = extract_cards(&path);
        assert!(matches!(result, Err(DeckError::InvalidArchive { .. })));
    }
}
