use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Errors raised while turning request or storage values into a [`Recipe`]
#[derive(Debug, thiserror::Error)]
pub enum RecipeError {
    #[error("recipe must be a list of ingredients")]
    NotAList,
    #[error("recipe must contain at least one ingredient")]
    Empty,
    #[error("invalid recipe: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One line of a recipe. `name` is only shown in the long form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub parts: u32,
}

/// Public view of an ingredient: no name, no quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortIngredient {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipe(pub Vec<Ingredient>);

impl Recipe {
    /// Accepts the shapes clients send for `recipe`: a list of ingredients,
    /// a single ingredient object, or either of those already serialized
    /// into a JSON string.
    pub fn from_input(value: &Value) -> Result<Self, RecipeError> {
        let recipe = match value {
            Value::String(text) => {
                let parsed: Value = serde_json::from_str(text)?;
                if parsed.is_string() {
                    return Err(RecipeError::NotAList);
                }
                return Self::from_input(&parsed);
            }
            Value::Array(_) => Recipe(serde_json::from_value(value.clone())?),
            Value::Object(_) => Recipe(vec![serde_json::from_value(value.clone())?]),
            _ => return Err(RecipeError::NotAList),
        };

        if recipe.0.is_empty() {
            return Err(RecipeError::Empty);
        }
        Ok(recipe)
    }

    /// Decode the text column
    pub fn from_storage(text: &str) -> Result<Self, RecipeError> {
        Ok(Recipe(serde_json::from_str(text)?))
    }

    pub fn to_storage(&self) -> Result<String, RecipeError> {
        Ok(serde_json::to_string(&self.0)?)
    }

    pub fn short(&self) -> Vec<ShortIngredient> {
        self.0
            .iter()
            .map(|ingredient| ShortIngredient {
                color: ingredient.color.clone(),
            })
            .collect()
    }
}

/// Raw `drinks` row; `recipe` is still JSON text
#[derive(Debug, Clone, FromRow)]
pub struct DrinkRow {
    pub id: i64,
    pub title: String,
    pub recipe: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Recipe,
}

impl TryFrom<DrinkRow> for Drink {
    type Error = RecipeError;

    fn try_from(row: DrinkRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            title: row.title,
            recipe: Recipe::from_storage(&row.recipe)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShortDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LongDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl Drink {
    pub fn short(&self) -> ShortDrink {
        ShortDrink {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.short(),
        }
    }

    pub fn long(&self) -> LongDrink {
        LongDrink {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.0.clone(),
        }
    }
}
