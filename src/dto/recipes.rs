use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Ingredient, Recipe, Tag},
};

pub const MAX_RECIPE_NAME_LEN: usize = 200;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct IngredientAmount {
    pub id: Uuid,
    pub amount: i32,
}

/// Body of recipe create and update. Update overwrites every field, including
/// the full tag and ingredient sets.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RecipeWriteRequest {
    pub ingredients: Vec<IngredientAmount>,
    pub tags: Vec<Uuid>,
    /// Opaque image payload, usually a `data:image/...;base64,` URL.
    pub image: String,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
}

impl RecipeWriteRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.ingredients.is_empty() {
            return Err(AppError::bad_request("ingredients are required"));
        }
        if self.tags.is_empty() {
            return Err(AppError::bad_request("tags are required"));
        }
        if self.cooking_time <= 0 {
            return Err(AppError::bad_request(
                "cooking_time must be greater than 0",
            ));
        }
        let mut seen = HashSet::with_capacity(self.ingredients.len());
        for item in &self.ingredients {
            if !seen.insert(item.id) {
                return Err(AppError::bad_request(format!(
                    "ingredient {} is listed more than once",
                    item.id
                )));
            }
            if item.amount <= 0 {
                return Err(AppError::bad_request(
                    "ingredient amount must be greater than 0",
                ));
            }
        }
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("name is required"));
        }
        if name.chars().count() > MAX_RECIPE_NAME_LEN {
            return Err(AppError::bad_request(format!(
                "name must be at most {MAX_RECIPE_NAME_LEN} characters"
            )));
        }
        Ok(())
    }

    /// Tag ids with duplicates removed, first occurrence wins.
    pub fn unique_tags(&self) -> Vec<Uuid> {
        let mut seen = HashSet::with_capacity(self.tags.len());
        self.tags
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct RecipeList {
    #[schema(value_type = Vec<Recipe>)]
    pub items: Vec<Recipe>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct TagList {
    #[schema(value_type = Vec<Tag>)]
    pub items: Vec<Tag>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct IngredientList {
    #[schema(value_type = Vec<Ingredient>)]
    pub items: Vec<Ingredient>,
}
