//! # 라벨(태그/재료) 공용 쿼리 모듈
//!
//! 태그와 재료는 `{id, name, user_id}`로 모양이 같고, 레시피와 다대다로
//! 연결된다는 점도 같습니다. 테이블 이름만 다르므로 `LabelKind`로 구분하여
//! 한 곳에서 쿼리를 구성합니다.
//!
//! ```text
//! tags        ←── recipe_tags        ──→ recipes
//! ingredients ←── recipe_ingredients ──→ recipes
//! ```

use std::collections::{HashMap, HashSet};

use sqlx::{sqlite::SqliteRow, FromRow, SqliteConnection, SqlitePool};

use crate::error::AppError;

/// 라벨 종류. SQL에 들어가는 이름은 전부 정적 문자열입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Tag,
    Ingredient,
}

impl LabelKind {
    fn table(self) -> &'static str {
        match self {
            LabelKind::Tag => "tags",
            LabelKind::Ingredient => "ingredients",
        }
    }

    fn link_table(self) -> &'static str {
        match self {
            LabelKind::Tag => "recipe_tags",
            LabelKind::Ingredient => "recipe_ingredients",
        }
    }

    fn link_column(self) -> &'static str {
        match self {
            LabelKind::Tag => "tag_id",
            LabelKind::Ingredient => "ingredient_id",
        }
    }

    /// 레시피 요청 본문에서 이 라벨 목록이 들어오는 필드 이름
    pub fn field(self) -> &'static str {
        match self {
            LabelKind::Tag => "tags",
            LabelKind::Ingredient => "ingredients",
        }
    }
}

/// 레시피가 어떤 라벨을 연결할 수 있는지
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkPolicy {
    /// 존재하는 라벨이면 소유자와 무관하게 연결
    #[default]
    AnyOwner,
    /// 레시피 소유자의 라벨만 연결. 다른 사용자의 id는 존재하지 않는 것으로 취급
    SameOwner,
}

impl LinkPolicy {
    pub fn from_flag(same_owner: bool) -> Self {
        if same_owner {
            LinkPolicy::SameOwner
        } else {
            LinkPolicy::AnyOwner
        }
    }
}

/// `owner`의 라벨을 이름 내림차순으로 조회합니다.
///
/// `assigned_only`가 true면 레시피에 하나 이상 연결된 라벨만 반환합니다.
/// JOIN이 아니라 `EXISTS`를 쓰므로 여러 레시피에 연결돼 있어도 한 번만 나옵니다.
pub async fn list_labels<T>(
    pool: &SqlitePool,
    kind: LabelKind,
    owner: &str,
    assigned_only: bool,
) -> Result<Vec<T>, AppError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut sql = format!("SELECT l.id, l.name FROM {} l WHERE l.user_id = ?", kind.table());
    if assigned_only {
        sql.push_str(&format!(
            " AND EXISTS (SELECT 1 FROM {} x WHERE x.{} = l.id)",
            kind.link_table(),
            kind.link_column()
        ));
    }
    sql.push_str(" ORDER BY l.name DESC, l.id DESC");

    let labels = sqlx::query_as::<_, T>(&sql)
        .bind(owner)
        .fetch_all(pool)
        .await?;

    Ok(labels)
}

/// 새 라벨을 만들고, 저장된 행을 다시 읽어 반환합니다.
pub async fn create_label<T>(
    pool: &SqlitePool,
    kind: LabelKind,
    owner: &str,
    name: &str,
) -> Result<T, AppError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(&format!(
        "INSERT INTO {} (id, user_id, name) VALUES (?, ?, ?)",
        kind.table()
    ))
    .bind(&id)
    .bind(owner)
    .bind(name)
    .execute(pool)
    .await?;

    sqlx::query_as::<_, T>(&format!(
        "SELECT id, name FROM {} WHERE id = ? AND user_id = ?",
        kind.table()
    ))
    .bind(&id)
    .bind(owner)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::Internal(format!("Failed to retrieve created {}", kind.field())))
}

/// 요청으로 받은 라벨 id들이 모두 존재하는지 확인하고, 중복을 제거한 목록을 돌려줍니다.
///
/// 없는 id가 하나라도 있으면 해당 필드(`tags`/`ingredients`)의 검증 에러입니다.
pub async fn resolve_label_ids(
    conn: &mut SqliteConnection,
    kind: LabelKind,
    owner: &str,
    ids: &[String],
    policy: LinkPolicy,
) -> Result<Vec<String>, AppError> {
    let sql = match policy {
        LinkPolicy::AnyOwner => format!("SELECT id FROM {} WHERE id = ?", kind.table()),
        LinkPolicy::SameOwner => {
            format!("SELECT id FROM {} WHERE id = ? AND user_id = ?", kind.table())
        }
    };

    let mut seen = HashSet::new();
    let mut resolved = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(id.as_str()) {
            continue;
        }

        let mut query = sqlx::query_as::<_, (String,)>(&sql).bind(id);
        if policy == LinkPolicy::SameOwner {
            query = query.bind(owner);
        }
        let found = query.fetch_optional(&mut *conn).await?;

        match found {
            Some((id,)) => resolved.push(id),
            None => {
                return Err(AppError::validation(
                    kind.field(),
                    format!("Invalid pk \"{}\" - object does not exist.", id),
                ))
            }
        }
    }

    Ok(resolved)
}

/// 레시피의 연결 집합을 `ids`로 통째로 교체합니다. 빈 슬라이스면 모두 해제됩니다.
///
/// 복합 PK + `INSERT OR IGNORE`라서 같은 id를 두 번 넣어도 한 번만 연결됩니다.
pub async fn replace_links(
    conn: &mut SqliteConnection,
    kind: LabelKind,
    recipe_id: &str,
    ids: &[String],
) -> Result<(), AppError> {
    sqlx::query(&format!("DELETE FROM {} WHERE recipe_id = ?", kind.link_table()))
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    let insert = format!(
        "INSERT OR IGNORE INTO {} (recipe_id, {}) VALUES (?, ?)",
        kind.link_table(),
        kind.link_column()
    );
    for id in ids {
        sqlx::query(&insert)
            .bind(recipe_id)
            .bind(id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// 레시피 하나에 연결된 라벨 id 목록 (요약 응답용)
pub async fn linked_ids(
    conn: &mut SqliteConnection,
    kind: LabelKind,
    recipe_id: &str,
) -> Result<Vec<String>, AppError> {
    let rows: Vec<(String,)> = sqlx::query_as(&format!(
        "SELECT {col} FROM {link} WHERE recipe_id = ? ORDER BY {col}",
        col = kind.link_column(),
        link = kind.link_table()
    ))
    .bind(recipe_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// `owner`의 모든 레시피에 대해 레시피 id → 연결된 라벨 id 목록.
/// 목록 조회에서 레시피마다 쿼리를 날리지 않기 위해 한 번에 가져옵니다.
pub async fn linked_ids_by_recipe(
    conn: &mut SqliteConnection,
    kind: LabelKind,
    owner: &str,
) -> Result<HashMap<String, Vec<String>>, AppError> {
    let rows: Vec<(String, String)> = sqlx::query_as(&format!(
        r#"
        SELECT x.recipe_id, x.{col}
        FROM {link} x
        JOIN recipes r ON r.id = x.recipe_id
        WHERE r.user_id = ?
        ORDER BY x.recipe_id, x.{col}
        "#,
        col = kind.link_column(),
        link = kind.link_table()
    ))
    .bind(owner)
    .fetch_all(&mut *conn)
    .await?;

    let mut by_recipe: HashMap<String, Vec<String>> = HashMap::new();
    for (recipe_id, label_id) in rows {
        by_recipe.entry(recipe_id).or_default().push(label_id);
    }
    Ok(by_recipe)
}

/// 레시피 하나에 연결된 라벨 객체 목록 (상세 응답용), 이름 오름차순
pub async fn linked_labels<T>(
    conn: &mut SqliteConnection,
    kind: LabelKind,
    recipe_id: &str,
) -> Result<Vec<T>, AppError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let labels = sqlx::query_as::<_, T>(&format!(
        r#"
        SELECT l.id, l.name
        FROM {table} l
        JOIN {link} x ON x.{col} = l.id
        WHERE x.recipe_id = ?
        ORDER BY l.name, l.id
        "#,
        table = kind.table(),
        link = kind.link_table(),
        col = kind.link_column()
    ))
    .bind(recipe_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(labels)
}
