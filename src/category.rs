//! Spending categories, e.g. 'Groceries', 'Eating Out', 'Wages'.
//!
//! A transaction belongs to at most one category.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::CategoryId};

/// The ID used for transactions without a category wherever they are grouped
/// by category. No real category has this ID.
pub const UNCATEGORIZED_ID: CategoryId = 0;

/// The label shown for transactions without a category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// The name of a category.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an error if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        if name.trim().is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category for expenses and income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The id of the category.
    pub id: CategoryId,
    /// The name of the category.
    pub name: CategoryName,
    /// A longer explanation of what belongs in the category.
    pub description: Option<String>,
    /// An icon name or emoji shown next to the category.
    pub icon: Option<String>,
    /// A CSS colour used when charting the category.
    pub color: Option<String>,
}

impl Category {
    /// Create a new category.
    pub fn build(name: CategoryName) -> CategoryBuilder {
        CategoryBuilder {
            name,
            description: None,
            icon: None,
            color: None,
        }
    }
}

/// A category that has not been saved to the database yet.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBuilder {
    name: CategoryName,
    description: Option<String>,
    icon: Option<String>,
    color: Option<String>,
}

impl CategoryBuilder {
    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Set the icon.
    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_owned());
        self
    }

    /// Set the colour.
    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_owned());
        self
    }
}

/// Create a category in the database.
///
/// # Errors
/// This function will return an error if there is an SQL error, e.g. the name is already taken.
pub fn create_category(builder: CategoryBuilder, connection: &Connection) -> Result<Category, Error> {
    let category = connection
        .prepare(
            "INSERT INTO category (name, description, icon, color) VALUES (?1, ?2, ?3, ?4)
             RETURNING id, name, description, icon, color",
        )?
        .query_row(
            (
                builder.name.as_ref(),
                builder.description,
                builder.icon,
                builder.color,
            ),
            map_category_row,
        )?;

    Ok(category)
}

/// Retrieve the category with `category_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `category_id` does not refer to a valid category,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, description, icon, color FROM category WHERE id = :id")?
        .query_row(&[(":id", &category_id)], map_category_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered by name.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, description, icon, color FROM category ORDER BY name")?
        .query_map([], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Create the category table in the database.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                description TEXT,
                icon TEXT,
                color TEXT
            )",
        (),
    )?;

    Ok(())
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;

    Ok(Category {
        id,
        name: CategoryName::new_unchecked(&raw_name),
        description: row.get(2)?,
        icon: row.get(3)?,
        color: row.get(4)?,
    })
}

#[cfg(test)]
mod category_name_tests {
    use crate::{Error, category::CategoryName};

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(CategoryName::new(""), Err(Error::EmptyCategoryName));
        assert_eq!(CategoryName::new("   "), Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_succeeds_on_non_empty_string() {
        let name = CategoryName::new("Groceries").unwrap();

        assert_eq!(name.as_ref(), "Groceries");
    }
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;

    use crate::{Error, db::initialize};

    use super::{Category, CategoryName, create_category, get_all_categories, get_category};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_category_succeeds() {
        let conn = get_test_connection();

        let category = create_category(
            Category::build(CategoryName::new_unchecked("Food"))
                .description("Groceries and eating out")
                .icon("🍔")
                .color("#ff0000"),
            &conn,
        )
        .unwrap();

        assert_eq!(category.name, CategoryName::new_unchecked("Food"));
        assert_eq!(
            category.description.as_deref(),
            Some("Groceries and eating out")
        );
        assert_eq!(category.icon.as_deref(), Some("🍔"));
        assert_eq!(category.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn create_category_fails_on_duplicate_name() {
        let conn = get_test_connection();
        create_category(Category::build(CategoryName::new_unchecked("Food")), &conn).unwrap();

        let result = create_category(Category::build(CategoryName::new_unchecked("Food")), &conn);

        assert!(matches!(result, Err(Error::SqlError(_))));
    }

    #[test]
    fn get_category_succeeds() {
        let conn = get_test_connection();
        let want = create_category(Category::build(CategoryName::new_unchecked("Rent")), &conn)
            .unwrap();

        let got = get_category(want.id, &conn).unwrap();

        assert_eq!(want, got);
    }

    #[test]
    fn get_category_with_invalid_id_returns_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_category(1337, &conn), Err(Error::NotFound));
    }

    #[test]
    fn get_all_categories_is_sorted_by_name() {
        let conn = get_test_connection();
        for name in ["Transport", "Food", "Rent"] {
            create_category(Category::build(CategoryName::new_unchecked(name)), &conn).unwrap();
        }

        let names = get_all_categories(&conn)
            .unwrap()
            .into_iter()
            .map(|category| category.name.to_string())
            .collect::<Vec<_>>();

        assert_eq!(names, ["Food", "Rent", "Transport"]);
    }
}
