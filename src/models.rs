use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{ingredients, recipes, tags, users};

/// Public view of a user as seen by the requesting caller.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// True when the caller follows this user. Always false for anonymous callers.
    pub is_subscribed: bool,
}

impl User {
    pub fn from_entity(model: users::Model, is_subscribed: bool) -> Self {
        Self {
            id: model.id,
            email: model.email,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            is_subscribed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl From<tags::Model> for Tag {
    fn from(model: tags::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            color: model.color,
            slug: model.slug,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
}

impl From<ingredients::Model> for Ingredient {
    fn from(model: ingredients::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            measurement_unit: model.measurement_unit,
        }
    }
}

/// Ingredient together with the amount one recipe uses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct RecipeIngredient {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Canonical read shape of a recipe, returned by list, detail, create and update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Recipe {
    pub id: Uuid,
    pub author: User,
    pub name: String,
    pub image: String,
    pub text: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub tags: Vec<Tag>,
    pub cooking_time: i32,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeShort {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<recipes::Model> for RecipeShort {
    fn from(model: recipes::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            image: model.image,
            cooking_time: model.cooking_time,
        }
    }
}

/// An author the caller follows, with a preview of their recipes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Subscription {
    #[serde(flatten)]
    pub author: User,
    pub recipes: Vec<RecipeShort>,
    pub recipes_count: i64,
}
