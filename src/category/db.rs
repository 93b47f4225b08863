//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryName},
    user::UserId,
};

/// Create a category and return it with its generated ID.
pub fn create_category(
    name: CategoryName,
    user_id: UserId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO category (name, user_id) VALUES (?1, ?2);",
        (name.as_ref(), user_id.as_i64()),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, name, user_id })
}

/// Retrieve a single category by its name within a user's scope.
///
/// Names are matched exactly (case-sensitive).
pub fn get_category_by_name(
    name: &CategoryName,
    user_id: UserId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, user_id FROM category WHERE user_id = :user_id AND name = :name;")?
        .query_row(
            &[
                (":user_id", &user_id.as_i64() as &dyn rusqlite::ToSql),
                (":name", &name.as_ref()),
            ],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Return the category with `name` for `user_id`, creating it on first use.
///
/// The lookup and insert are two separate statements, so two concurrent
/// requests with the same new name can both insert.
pub fn get_or_create_category(
    name: CategoryName,
    user_id: UserId,
    connection: &Connection,
) -> Result<Category, Error> {
    match get_category_by_name(&name, user_id, connection) {
        Err(Error::NotFound) => create_category(name, user_id, connection),
        result => result,
    }
}

/// Retrieve a user's categories ordered alphabetically by name.
pub fn get_all_categories(user_id: UserId, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, user_id FROM category WHERE user_id = :user_id ORDER BY name ASC;")?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
            UNIQUE(user_id, name)
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let user_id = UserId::new(row.get(2)?);

    Ok(Category { id, name, user_id })
}

#[cfg(test)]
mod category_name_tests {
    use crate::{Error, category::CategoryName};

    #[test]
    fn new_fails_on_empty_string() {
        let category_name = CategoryName::new("");

        assert_eq!(category_name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        let category_name = CategoryName::new("\n\t \r");

        assert_eq!(category_name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_succeeds_on_non_empty_string() {
        let category_name = CategoryName::new("🔥");

        assert!(category_name.is_ok())
    }
}
