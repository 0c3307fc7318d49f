use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::database::manager::DatabaseError;
use crate::database::models::{Drink, DrinkRow, Ingredient, Recipe};

const CREATE_DRINKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS drinks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL UNIQUE,
    recipe TEXT NOT NULL
)"#;

/// Storage operations for the `drinks` table. Each mutation commits on its own.
#[derive(Clone)]
pub struct DrinkRepository {
    pool: SqlitePool,
}

impl DrinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn create_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_DRINKS_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Drop every drink and start from a single seeded one
    pub async fn drop_and_create_all(&self) -> Result<Drink, DatabaseError> {
        sqlx::query("DROP TABLE IF EXISTS drinks").execute(&self.pool).await?;
        // AUTOINCREMENT keeps its counter in sqlite_sequence, which only
        // exists once such a table has been created
        match sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'drinks'")
            .execute(&self.pool)
            .await
        {
            Ok(_) => {}
            Err(sqlx::Error::Database(e)) if e.message().contains("no such table") => {
                debug!("No id sequence to reset");
            }
            Err(e) => return Err(e.into()),
        }
        self.create_schema().await?;

        let water = Recipe(vec![Ingredient {
            color: "blue".to_string(),
            name: Some("water".to_string()),
            parts: 1,
        }]);
        let drink = self.create("water", &water).await?;
        info!("Reset drinks table, seeded drink {}", drink.id);
        Ok(drink)
    }

    pub async fn list_all(&self) -> Result<Vec<Drink>, DatabaseError> {
        let rows = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(decode).collect()
    }

    pub async fn find(&self, id: i64) -> Result<Option<Drink>, DatabaseError> {
        let row = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(decode).transpose()
    }

    /// Like `find`, but a missing row is an error
    pub async fn find_404(&self, id: i64) -> Result<Drink, DatabaseError> {
        self.find(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("drink {}", id)))
    }

    pub async fn create(&self, title: &str, recipe: &Recipe) -> Result<Drink, DatabaseError> {
        let stored = recipe.to_storage()?;
        let row = sqlx::query_as::<_, DrinkRow>(
            "INSERT INTO drinks (title, recipe) VALUES (?, ?) RETURNING id, title, recipe",
        )
        .bind(title)
        .bind(&stored)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, format!("drink titled '{}' already exists", title)))?;

        debug!("Inserted drink {}", row.id);
        decode(row)
    }

    /// Persist title and recipe of a drink previously loaded with `find`
    pub async fn update(&self, drink: &Drink) -> Result<(), DatabaseError> {
        let stored = drink.recipe.to_storage()?;
        let result = sqlx::query("UPDATE drinks SET title = ?, recipe = ? WHERE id = ?")
            .bind(&drink.title)
            .bind(&stored)
            .bind(drink.id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DatabaseError::from_write(e, format!("drink titled '{}' already exists", drink.title))
            })?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("drink {}", drink.id)));
        }
        debug!("Updated drink {}", drink.id);
        Ok(())
    }

    pub async fn delete(&self, drink: &Drink) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = ?")
            .bind(drink.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("drink {}", drink.id)));
        }
        debug!("Deleted drink {}", drink.id);
        Ok(())
    }
}

fn decode(row: DrinkRow) -> Result<Drink, DatabaseError> {
    let id = row.id;
    Drink::try_from(row).map_err(|source| DatabaseError::CorruptRecipe { id, source })
}
