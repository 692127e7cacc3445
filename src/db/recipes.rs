//! # 레시피 데이터베이스 쿼리 모듈
//!
//! 레시피 CRUD와 태그/재료 연결 집합 관리입니다.
//! 모든 함수는 `owner`를 받아 `recipes.user_id = owner`인 행만 다룹니다.
//! 다른 사용자의 레시피는 존재하지 않는 것과 똑같이 `None`을 반환합니다.
//!
//! 생성/수정은 하나의 트랜잭션에서 스칼라 필드와 연결 집합을 함께 씁니다.
//! 중간에 실패하면 트랜잭션이 롤백되어 반쯤 바뀐 레시피가 보이지 않습니다.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::labels::{self, LabelKind, LinkPolicy};
use crate::error::AppError;
use crate::models::*;

const RECIPE_COLUMNS: &str = "id, title, time_minutes, price, link";

async fn find_owned_row(
    conn: &mut SqliteConnection,
    owner: &str,
    id: &str,
) -> Result<Option<RecipeRow>, AppError> {
    let row = sqlx::query_as::<_, RecipeRow>(&format!(
        "SELECT {} FROM recipes WHERE id = ? AND user_id = ?",
        RECIPE_COLUMNS
    ))
    .bind(id)
    .bind(owner)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

async fn load_summary(
    conn: &mut SqliteConnection,
    owner: &str,
    id: &str,
) -> Result<Option<RecipeSummary>, AppError> {
    let Some(row) = find_owned_row(conn, owner, id).await? else {
        return Ok(None);
    };
    let tags = labels::linked_ids(conn, LabelKind::Tag, id).await?;
    let ingredients = labels::linked_ids(conn, LabelKind::Ingredient, id).await?;

    row.into_summary(tags, ingredients).map(Some)
}

/// `owner`의 레시피 요약 목록, id 내림차순(최신순)
pub async fn list_recipes(pool: &SqlitePool, owner: &str) -> Result<Vec<RecipeSummary>, AppError> {
    let mut conn = pool.acquire().await?;

    let rows = sqlx::query_as::<_, RecipeRow>(&format!(
        "SELECT {} FROM recipes WHERE user_id = ? ORDER BY id DESC",
        RECIPE_COLUMNS
    ))
    .bind(owner)
    .fetch_all(&mut *conn)
    .await?;

    let mut tags = labels::linked_ids_by_recipe(&mut conn, LabelKind::Tag, owner).await?;
    let mut ingredients =
        labels::linked_ids_by_recipe(&mut conn, LabelKind::Ingredient, owner).await?;

    rows.into_iter()
        .map(|row| {
            let tag_ids = tags.remove(&row.id).unwrap_or_default();
            let ingredient_ids = ingredients.remove(&row.id).unwrap_or_default();
            row.into_summary(tag_ids, ingredient_ids)
        })
        .collect()
}

/// 레시피 상세 (태그/재료 객체 포함)
///
/// ## 반환값
/// - `Ok(Some(RecipeDetail))`: `owner`의 레시피
/// - `Ok(None)`: 없거나 다른 사용자의 레시피
pub async fn get_recipe(
    pool: &SqlitePool,
    owner: &str,
    id: &str,
) -> Result<Option<RecipeDetail>, AppError> {
    let mut conn = pool.acquire().await?;

    let Some(row) = find_owned_row(&mut conn, owner, id).await? else {
        return Ok(None);
    };
    let tags: Vec<Tag> = labels::linked_labels(&mut conn, LabelKind::Tag, id).await?;
    let ingredients: Vec<Ingredient> =
        labels::linked_labels(&mut conn, LabelKind::Ingredient, id).await?;

    row.into_detail(tags, ingredients).map(Some)
}

/// 새 레시피를 만듭니다. 태그/재료 id가 하나라도 없으면 아무것도 저장하지 않습니다.
pub async fn create_recipe(
    pool: &SqlitePool,
    owner: &str,
    req: &RecipeRequest,
    policy: LinkPolicy,
) -> Result<RecipeSummary, AppError> {
    let mut tx = pool.begin().await?;

    let tag_ids =
        labels::resolve_label_ids(&mut tx, LabelKind::Tag, owner, &req.tags, policy).await?;
    let ingredient_ids = labels::resolve_label_ids(
        &mut tx,
        LabelKind::Ingredient,
        owner,
        &req.ingredients,
        policy,
    )
    .await?;

    let id = uuid::Uuid::now_v7().to_string();
    sqlx::query(
        r#"
        INSERT INTO recipes (id, user_id, title, time_minutes, price, link)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(owner)
    .bind(&req.title)
    .bind(req.time_minutes)
    .bind(price_to_storage(&req.price))
    .bind(&req.link)
    .execute(&mut *tx)
    .await?;

    labels::replace_links(&mut tx, LabelKind::Tag, &id, &tag_ids).await?;
    labels::replace_links(&mut tx, LabelKind::Ingredient, &id, &ingredient_ids).await?;

    let summary = load_summary(&mut tx, owner, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created recipe".to_string()))?;
    tx.commit().await?;

    Ok(summary)
}

/// 부분 수정 (PATCH)
///
/// 요청에 있는 필드만 바꿉니다. `tags`/`ingredients`가 있으면 기존 집합을
/// 더하지 않고 통째로 교체하고, 없으면 그대로 둡니다.
pub async fn update_recipe_partial(
    pool: &SqlitePool,
    owner: &str,
    id: &str,
    patch: &RecipePatchRequest,
    policy: LinkPolicy,
) -> Result<Option<RecipeSummary>, AppError> {
    let mut tx = pool.begin().await?;

    // 소유권 확인이 먼저: 남의 레시피면 참조 검증 없이 404
    if find_owned_row(&mut tx, owner, id).await?.is_none() {
        return Ok(None);
    }

    let tag_ids = match &patch.tags {
        Some(ids) => {
            Some(labels::resolve_label_ids(&mut tx, LabelKind::Tag, owner, ids, policy).await?)
        }
        None => None,
    };
    let ingredient_ids = match &patch.ingredients {
        Some(ids) => Some(
            labels::resolve_label_ids(&mut tx, LabelKind::Ingredient, owner, ids, policy).await?,
        ),
        None => None,
    };

    let mut query = QueryBuilder::<Sqlite>::new(
        "UPDATE recipes SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
    );
    if let Some(title) = &patch.title {
        query.push(", title = ").push_bind(title.clone());
    }
    if let Some(time_minutes) = patch.time_minutes {
        query.push(", time_minutes = ").push_bind(time_minutes);
    }
    if let Some(price) = &patch.price {
        query.push(", price = ").push_bind(price_to_storage(price));
    }
    if let Some(link) = &patch.link {
        query.push(", link = ").push_bind(link.clone());
    }
    query
        .push(" WHERE id = ")
        .push_bind(id.to_string())
        .push(" AND user_id = ")
        .push_bind(owner.to_string());
    query.build().execute(&mut *tx).await?;

    if let Some(ids) = &tag_ids {
        labels::replace_links(&mut tx, LabelKind::Tag, id, ids).await?;
    }
    if let Some(ids) = &ingredient_ids {
        labels::replace_links(&mut tx, LabelKind::Ingredient, id, ids).await?;
    }

    let summary = load_summary(&mut tx, owner, id).await?;
    tx.commit().await?;

    Ok(summary)
}

/// 전체 수정 (PUT)
///
/// 모든 필드를 교체합니다. 요청에서 생략된 `tags`/`ingredients`는 빈 집합이 되어
/// 기존 연결이 모두 해제됩니다. (PATCH에서 생략하면 유지되는 것과 다름)
pub async fn update_recipe_full(
    pool: &SqlitePool,
    owner: &str,
    id: &str,
    req: RecipeRequest,
    policy: LinkPolicy,
) -> Result<Option<RecipeSummary>, AppError> {
    let patch = RecipePatchRequest::from(req);
    update_recipe_partial(pool, owner, id, &patch, policy).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_ingredient, create_tag, test_pool, test_user};
    use serde_json::json;

    fn request(value: serde_json::Value) -> RecipeRequest {
        serde_json::from_value(value).unwrap()
    }

    fn patch(value: serde_json::Value) -> RecipePatchRequest {
        serde_json::from_value(value).unwrap()
    }

    async fn sample_recipe(pool: &SqlitePool, owner: &str, title: &str) -> RecipeSummary {
        create_recipe(
            pool,
            owner,
            &request(json!({ "title": title, "time_minutes": 10, "price": 5.00 })),
            LinkPolicy::AnyOwner,
        )
        .await
        .unwrap()
    }

    async fn recipe_count(pool: &SqlitePool) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes")
            .fetch_one(pool)
            .await
            .unwrap();
        count
    }

    #[tokio::test]
    async fn list_is_newest_first_and_scoped_to_owner() {
        let pool = test_pool().await;
        let me = test_user(&pool, "test@test.com").await;
        let other = test_user(&pool, "other@other.com").await;
        sample_recipe(&pool, &me, "first").await;
        sample_recipe(&pool, &me, "second").await;
        sample_recipe(&pool, &other, "theirs").await;

        let recipes = list_recipes(&pool, &me).await.unwrap();
        assert_eq!(recipes.len(), 2);
        assert!(recipes.iter().all(|r| r.title != "theirs"));

        let ids: Vec<&str> = recipes.iter().map(|r| r.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn create_with_tags_shows_them_in_detail() {
        let pool = test_pool().await;
        let owner = test_user(&pool, "a@x.com").await;
        let tag1 = create_tag(&pool, &owner, "Vegan").await.unwrap();
        let tag2 = create_tag(&pool, &owner, "Dessert").await.unwrap();

        let created = create_recipe(
            &pool,
            &owner,
            &request(json!({
                "title": "Cheesecake",
                "time_minutes": 20,
                "price": 6,
                "tags": [tag1.id, tag2.id],
            })),
            LinkPolicy::AnyOwner,
        )
        .await
        .unwrap();
        assert_eq!(created.tags.len(), 2);
        assert_eq!(created.price.to_string(), "6.00");

        let detail = get_recipe(&pool, &owner, &created.id).await.unwrap().unwrap();
        assert_eq!(detail.tags.len(), 2);
        assert!(detail.tags.contains(&tag1));
        assert!(detail.tags.contains(&tag2));
        assert!(detail.ingredients.is_empty());
    }

    #[tokio::test]
    async fn create_with_ingredients() {
        let pool = test_pool().await;
        let owner = test_user(&pool, "a@x.com").await;
        let prawns = create_ingredient(&pool, &owner, "Prawns").await.unwrap();
        let ginger = create_ingredient(&pool, &owner, "Ginger").await.unwrap();

        let created = create_recipe(
            &pool,
            &owner,
            &request(json!({
                "title": "Thai prawn red curry",
                "time_minutes": 20,
                "price": "7.00",
                "ingredients": [prawns.id, ginger.id],
            })),
            LinkPolicy::AnyOwner,
        )
        .await
        .unwrap();

        let detail = get_recipe(&pool, &owner, &created.id).await.unwrap().unwrap();
        // 상세 응답은 이름 오름차순
        assert_eq!(detail.ingredients, vec![ginger, prawns]);
    }

    #[tokio::test]
    async fn unknown_reference_saves_nothing() {
        let pool = test_pool().await;
        let owner = test_user(&pool, "a@x.com").await;

        let result = create_recipe(
            &pool,
            &owner,
            &request(json!({
                "title": "Ghost",
                "time_minutes": 1,
                "price": 1,
                "tags": ["does-not-exist"],
            })),
            LinkPolicy::AnyOwner,
        )
        .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(recipe_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn detail_of_foreign_recipe_is_none() {
        let pool = test_pool().await;
        let me = test_user(&pool, "a@x.com").await;
        let other = test_user(&pool, "b@x.com").await;
        let theirs = sample_recipe(&pool, &other, "theirs").await;

        assert!(get_recipe(&pool, &me, &theirs.id).await.unwrap().is_none());
        assert!(get_recipe(&pool, &other, &theirs.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn partial_update_replaces_tags_when_supplied() {
        let pool = test_pool().await;
        let owner = test_user(&pool, "a@x.com").await;
        let old_tag = create_tag(&pool, &owner, "Old").await.unwrap();
        let new_tag = create_tag(&pool, &owner, "Curry").await.unwrap();
        let recipe = create_recipe(
            &pool,
            &owner,
            &request(json!({
                "title": "Chicken tikka",
                "time_minutes": 30,
                "price": 5,
                "tags": [old_tag.id],
            })),
            LinkPolicy::AnyOwner,
        )
        .await
        .unwrap();

        let updated = update_recipe_partial(
            &pool,
            &owner,
            &recipe.id,
            &patch(json!({ "title": "Chicken tikka masala", "tags": [new_tag.id] })),
            LinkPolicy::AnyOwner,
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.title, "Chicken tikka masala");
        assert_eq!(updated.tags, vec![new_tag.id.clone()]);
        assert_eq!(updated.time_minutes, 30);
    }

    #[tokio::test]
    async fn partial_update_without_tags_keeps_them() {
        let pool = test_pool().await;
        let owner = test_user(&pool, "a@x.com").await;
        let tag = create_tag(&pool, &owner, "Keep").await.unwrap();
        let recipe = create_recipe(
            &pool,
            &owner,
            &request(json!({
                "title": "Stew",
                "time_minutes": 60,
                "price": "3.50",
                "link": "https://example.com/stew.jpg",
                "tags": [tag.id],
            })),
            LinkPolicy::AnyOwner,
        )
        .await
        .unwrap();

        let updated = update_recipe_partial(
            &pool,
            &owner,
            &recipe.id,
            &patch(json!({ "price": 4 })),
            LinkPolicy::AnyOwner,
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.tags, vec![tag.id]);
        assert_eq!(updated.price.to_string(), "4.00");
        assert_eq!(updated.link.as_deref(), Some("https://example.com/stew.jpg"));
    }

    #[tokio::test]
    async fn partial_update_with_empty_tags_clears_them() {
        let pool = test_pool().await;
        let owner = test_user(&pool, "a@x.com").await;
        let tag = create_tag(&pool, &owner, "Gone").await.unwrap();
        let recipe = create_recipe(
            &pool,
            &owner,
            &request(json!({ "title": "Salad", "time_minutes": 5, "price": 2, "tags": [tag.id] })),
            LinkPolicy::AnyOwner,
        )
        .await
        .unwrap();

        let updated = update_recipe_partial(
            &pool,
            &owner,
            &recipe.id,
            &patch(json!({ "tags": [], "link": null })),
            LinkPolicy::AnyOwner,
        )
        .await
        .unwrap()
        .unwrap();

        assert!(updated.tags.is_empty());
        assert!(updated.link.is_none());
    }

    #[tokio::test]
    async fn full_update_without_tags_clears_them() {
        let pool = test_pool().await;
        let owner = test_user(&pool, "a@x.com").await;
        let tag = create_tag(&pool, &owner, "Curry").await.unwrap();
        let recipe = create_recipe(
            &pool,
            &owner,
            &request(json!({
                "title": "Chicken tikka",
                "time_minutes": 30,
                "price": 5,
                "link": "https://example.com/tikka",
                "tags": [tag.id],
            })),
            LinkPolicy::AnyOwner,
        )
        .await
        .unwrap();

        let updated = update_recipe_full(
            &pool,
            &owner,
            &recipe.id,
            request(json!({ "title": "Spaghetti carbonara", "time_minutes": 25, "price": 5 })),
            LinkPolicy::AnyOwner,
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.title, "Spaghetti carbonara");
        assert_eq!(updated.time_minutes, 25);
        assert!(updated.tags.is_empty());
        assert!(updated.link.is_none());

        let detail = get_recipe(&pool, &owner, &recipe.id).await.unwrap().unwrap();
        assert!(detail.tags.is_empty());
    }

    #[tokio::test]
    async fn updates_of_foreign_recipe_are_none_and_change_nothing() {
        let pool = test_pool().await;
        let me = test_user(&pool, "a@x.com").await;
        let other = test_user(&pool, "b@x.com").await;
        let theirs = sample_recipe(&pool, &other, "theirs").await;

        let partial = update_recipe_partial(
            &pool,
            &me,
            &theirs.id,
            &patch(json!({ "title": "mine now" })),
            LinkPolicy::AnyOwner,
        )
        .await
        .unwrap();
        assert!(partial.is_none());

        let full = update_recipe_full(
            &pool,
            &me,
            &theirs.id,
            request(json!({ "title": "mine now", "time_minutes": 1, "price": 1 })),
            LinkPolicy::AnyOwner,
        )
        .await
        .unwrap();
        assert!(full.is_none());

        let unchanged = get_recipe(&pool, &other, &theirs.id).await.unwrap().unwrap();
        assert_eq!(unchanged.title, "theirs");
    }

    #[tokio::test]
    async fn unknown_ingredient_id_leaves_recipe_unchanged() {
        let pool = test_pool().await;
        let owner = test_user(&pool, "a@x.com").await;
        let recipe = sample_recipe(&pool, &owner, "original").await;

        let result = update_recipe_partial(
            &pool,
            &owner,
            &recipe.id,
            &patch(json!({ "title": "changed", "ingredients": ["nope"] })),
            LinkPolicy::AnyOwner,
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let detail = get_recipe(&pool, &owner, &recipe.id).await.unwrap().unwrap();
        assert_eq!(detail.title, "original");
    }
}
