//! 晒し者履歴 (Hall of Shame)
//!
//! `rusqlite` を使って、過去の批評セッションを追記専用で保存します。
//! 1行 = 1回の分析 (チーム名一覧・批評本文・最弱ポケモン・ゲーム名・時刻)。
//!
//! # 特色
//! - Windows でもビルドしやすいように `bundled` フィーチャを利用
//! - チーム名一覧は JSON 配列として TEXT カラムに保存
//! - 一覧は挿入順 (id 昇順)
//!
//! # 代表的な使い方
//! ```no_run
//! use pokeroast_core::history::{ShameEntry, ShameLog};
//!
//! # fn demo() -> color_eyre::Result<()> {
//! let mut log = ShameLog::open_or_create("pokeroast.sqlite")?; // ファイルが無ければ作成
//! log.append(&ShameEntry::new(vec!["magikarp".into()], "lol", "magikarp", "Red / Blue / Yellow"))?;
//! for entry in log.list()? {
//!     println!("{} <- {}", entry.worst_pokemon, entry.team.join(", "));
//! }
//! # Ok(()) }
//! ```

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use color_eyre::eyre::Result;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 履歴1件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShameEntry {
    /// 保存前は 0
    pub id: i64,
    pub team: Vec<String>,
    pub roast: String,
    pub worst_pokemon: String,
    pub game: String,
    pub created_at_epoch_ms: i64,
}

impl ShameEntry {
    pub fn new<R: Into<String>, W: Into<String>, G: Into<String>>(team: Vec<String>, roast: R, worst_pokemon: W, game: G) -> Self {
        Self {
            id: 0,
            team,
            roast: roast.into(),
            worst_pokemon: worst_pokemon.into(),
            game: game.into(),
            created_at_epoch_ms: 0,
        }
    }
}

/// 最弱ポケモンの集計
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offender {
    pub name: String,
    pub times: i64,
}

/// DB ハンドル。内部で `rusqlite::Connection` を保持します。
pub struct ShameLog {
    conn: Connection,
    path: PathBuf,
}

impl ShameLog {
    /// DB を開き、存在しなければ新規作成。
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref().to_path_buf();
        let conn = Connection::open(&p)?;
        let log = Self { conn, path: p };
        log.ensure_schema()?;
        info!(target: "history", path = ?log.path, "shame_log_opened");
        Ok(log)
    }

    /// メモリ上 (永続化なし) の DB を作成 (主にテスト用途)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let log = Self { conn, path: PathBuf::from(":memory:") };
        log.ensure_schema()?;
        Ok(log)
    }

    /// スキーマを作成 (存在しない場合のみ)
    fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS shame_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                team_json TEXT NOT NULL,
                roast TEXT NOT NULL,
                worst_pokemon TEXT NOT NULL,
                game TEXT NOT NULL,
                created_at_epoch_ms INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_shame_worst ON shame_entries(worst_pokemon);
            "#,
        )?;
        Ok(())
    }

    /// 現在時刻 (ms since epoch)
    fn now_ms() -> Result<i64> {
        Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() as i64)
    }

    /// 1件追記し、採番された id を返す
    pub fn append(&mut self, entry: &ShameEntry) -> Result<i64> {
        let team_json = serde_json::to_string(&entry.team)?;
        let created = Self::now_ms()?;
        self.conn.execute(
            r#"INSERT INTO shame_entries(team_json, roast, worst_pokemon, game, created_at_epoch_ms)
               VALUES (?1, ?2, ?3, ?4, ?5)"#,
            params![team_json, entry.roast, entry.worst_pokemon, entry.game, created],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(target: "history", id, worst = %entry.worst_pokemon, "shame_appended");
        Ok(id)
    }

    /// 全件 (挿入順)
    pub fn list(&self) -> Result<Vec<ShameEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, team_json, roast, worst_pokemon, game, created_at_epoch_ms FROM shame_entries ORDER BY id ASC",
        )?;
        let iter = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, i64>(5)?,
            ))
        })?;
        let mut out = Vec::new();
        for r in iter {
            let (id, team_json, roast, worst_pokemon, game, created_at_epoch_ms) = r?;
            let team: Vec<String> = serde_json::from_str(&team_json)?;
            out.push(ShameEntry { id, team, roast, worst_pokemon, game, created_at_epoch_ms });
        }
        Ok(out)
    }

    pub fn count(&self) -> Result<i64> {
        Ok(self.conn.query_row("SELECT COUNT(*) FROM shame_entries", [], |row| row.get(0))?)
    }

    /// 最弱に選ばれた回数の多い順 (同数は名前順)。空名は除外
    pub fn worst_offenders(&self, limit: usize) -> Result<Vec<Offender>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT worst_pokemon, COUNT(*) AS times FROM shame_entries
               WHERE worst_pokemon <> ''
               GROUP BY worst_pokemon
               ORDER BY times DESC, worst_pokemon ASC
               LIMIT ?1"#,
        )?;
        let iter = stmt.query_map(params![limit as i64], |row| {
            Ok(Offender { name: row.get(0)?, times: row.get(1)? })
        })?;
        let mut out = Vec::new();
        for r in iter { out.push(r?); }
        Ok(out)
    }

    /// 全削除 (メンテナンス用)。削除件数を返す
    pub fn clear(&mut self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM shame_entries", [])?)
    }

    /// DB ファイルのパス
    pub fn db_file_path(&self) -> &Path { &self.path }
}
