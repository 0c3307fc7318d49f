pub mod drink;

pub use drink::{Drink, DrinkRow, Ingredient, LongDrink, Recipe, RecipeError, ShortDrink};
