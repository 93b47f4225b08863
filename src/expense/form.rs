//! The request body shared by the create and edit expense endpoints.

use serde::Deserialize;
use time::Date;

use crate::{Error, category::CategoryName};

/// The JSON body for creating or updating an expense.
///
/// Field names follow the client's wire format, so `categoryName` rather
/// than `category_name`. All fields are optional at the parsing stage so
/// that a missing field surfaces as a validation error instead of a
/// deserialization failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseData {
    /// The amount of money spent.
    pub amount: Option<f64>,
    /// The calendar day the money was spent on.
    pub date: Option<Date>,
    /// The name of the category the expense belongs to.
    pub category_name: Option<String>,
    /// An optional text description of what the expense was for.
    pub description: Option<String>,
}

/// The contents of an [ExpenseData] body with the required fields present.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedExpenseData {
    /// The amount of money spent.
    pub amount: f64,
    /// The calendar day the money was spent on.
    pub date: Date,
    /// The name of the category the expense belongs to.
    pub category_name: CategoryName,
    /// An optional text description of what the expense was for.
    pub description: Option<String>,
}

impl ExpenseData {
    /// Check that the required fields are present and non-empty.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::MissingField] if `amount`, `date`, or `categoryName` is absent,
    /// - or [Error::EmptyCategoryName] if the category name is an empty string.
    pub fn validate(self) -> Result<ValidatedExpenseData, Error> {
        let amount = self.amount.ok_or(Error::MissingField("amount"))?;
        let date = self.date.ok_or(Error::MissingField("date"))?;
        let category_name = match self.category_name {
            Some(name) => CategoryName::new(&name)?,
            None => return Err(Error::MissingField("categoryName")),
        };

        Ok(ValidatedExpenseData {
            amount,
            date,
            category_name,
            description: self.description,
        })
    }
}

#[cfg(test)]
mod validation_tests {
    use time::macros::date;

    use crate::Error;

    use super::ExpenseData;

    fn complete_form() -> ExpenseData {
        ExpenseData {
            amount: Some(12.3),
            date: Some(date!(2025 - 10 - 05)),
            category_name: Some("Groceries".to_owned()),
            description: Some("weekly shop".to_owned()),
        }
    }

    #[test]
    fn validate_succeeds_on_complete_form() {
        let validated = complete_form().validate().expect("form should validate");

        assert_eq!(validated.amount, 12.3);
        assert_eq!(validated.date, date!(2025 - 10 - 05));
        assert_eq!(validated.category_name.as_ref(), "Groceries");
        assert_eq!(validated.description.as_deref(), Some("weekly shop"));
    }

    #[test]
    fn validate_succeeds_without_description() {
        let form = ExpenseData {
            description: None,
            ..complete_form()
        };

        assert!(form.validate().is_ok());
    }

    #[test]
    fn validate_fails_on_missing_amount() {
        let form = ExpenseData {
            amount: None,
            ..complete_form()
        };

        assert_eq!(form.validate(), Err(Error::MissingField("amount")));
    }

    #[test]
    fn validate_fails_on_missing_date() {
        let form = ExpenseData {
            date: None,
            ..complete_form()
        };

        assert_eq!(form.validate(), Err(Error::MissingField("date")));
    }

    #[test]
    fn validate_fails_on_missing_category_name() {
        let form = ExpenseData {
            category_name: None,
            ..complete_form()
        };

        assert_eq!(form.validate(), Err(Error::MissingField("categoryName")));
    }

    #[test]
    fn validate_fails_on_empty_category_name() {
        let form = ExpenseData {
            category_name: Some("".to_owned()),
            ..complete_form()
        };

        assert_eq!(form.validate(), Err(Error::EmptyCategoryName));
    }
}
