//! Category management for the expense tracker.

mod db;
mod domain;
mod list_endpoint;

pub use db::{
    create_category, create_category_table, get_all_categories, get_category_by_name,
    get_or_create_category,
};
pub use domain::{Category, CategoryId, CategoryName};
pub use list_endpoint::list_categories_endpoint;
