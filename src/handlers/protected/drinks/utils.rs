use axum::{extract::rejection::JsonRejection, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::database::models::Recipe;
use crate::error::ApiError;

/// Request body for POST and PATCH. Fields stay untyped until validated so
/// `recipe` can arrive as a list, an object or a serialized string.
#[derive(Debug, Default, Deserialize)]
pub struct DrinkInput {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub recipe: Option<Value>,
}

impl DrinkInput {
    pub fn from_body(body: Result<Json<Value>, JsonRejection>) -> Result<Self, ApiError> {
        let Json(value) = body?;
        if !value.is_object() {
            return Err(ApiError::unprocessable_entity("request body must be a JSON object"));
        }
        serde_json::from_value(value).map_err(|e| ApiError::unprocessable_entity(e.to_string()))
    }

    /// `None` when the field is absent or null
    pub fn title(&self) -> Result<Option<String>, ApiError> {
        match &self.title {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(title)) if !title.trim().is_empty() => Ok(Some(title.trim().to_string())),
            Some(Value::String(_)) => Err(ApiError::unprocessable_entity("title must not be empty")),
            Some(_) => Err(ApiError::unprocessable_entity("title must be a string")),
        }
    }

    /// `None` when the field is absent or null
    pub fn recipe(&self) -> Result<Option<Recipe>, ApiError> {
        match &self.recipe {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(Recipe::from_input(value)?)),
        }
    }
}

/// Ids that are not integers cannot name a drink
pub fn parse_id(id: &str) -> Result<i64, ApiError> {
    id.parse::<i64>()
        .map_err(|_| ApiError::not_found(format!("drink {}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> DrinkInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn title_must_be_a_non_empty_string() {
        assert_eq!(input(json!({"title": " Water "})).title().unwrap(), Some("Water".to_string()));
        assert_eq!(input(json!({})).title().unwrap(), None);
        assert!(input(json!({"title": ""})).title().is_err());
        assert!(input(json!({"title": 5})).title().is_err());
    }

    #[test]
    fn absent_recipe_is_none() {
        assert!(input(json!({"title": "x"})).recipe().unwrap().is_none());
        assert!(input(json!({"recipe": null})).recipe().unwrap().is_none());
        assert!(input(json!({"recipe": 3})).recipe().is_err());
    }

    #[test]
    fn non_object_body_is_unprocessable() {
        let err = DrinkInput::from_body(Ok(Json(json!([1, 2])))).unwrap_err();
        assert_eq!(err.status_code().as_u16(), 422);
    }

    #[test]
    fn non_numeric_id_is_not_found() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert_eq!(parse_id("abc").unwrap_err().status_code().as_u16(), 404);
    }
}
