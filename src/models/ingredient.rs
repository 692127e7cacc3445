use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateIngredientRequest {
    #[validate(length(min = 1, max = 255, message = "This field may not be blank."))]
    pub name: String,
}
