use sqlx::SqlitePool;

use super::labels::{self, LabelKind};
use crate::error::AppError;
use crate::models::Ingredient;

pub async fn list_ingredients(
    pool: &SqlitePool,
    owner: &str,
    assigned_only: bool,
) -> Result<Vec<Ingredient>, AppError> {
    labels::list_labels(pool, LabelKind::Ingredient, owner, assigned_only).await
}

pub async fn create_ingredient(
    pool: &SqlitePool,
    owner: &str,
    name: &str,
) -> Result<Ingredient, AppError> {
    labels::create_label(pool, LabelKind::Ingredient, owner, name).await
}
