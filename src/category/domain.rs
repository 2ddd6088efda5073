//! Core category domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, TransactionType, user::UserID};

/// Database identifier for a category.
pub type CategoryId = i64;

/// The color used for new categories when none is given.
pub const DEFAULT_CATEGORY_COLOR: &str = "#3B82F6";

/// The longest icon name accepted for a category.
pub const MAX_ICON_LENGTH: usize = 50;

/// A validated `#RRGGBB` hex color.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryColor(String);

impl CategoryColor {
    /// Create a category color.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::Validation] if `color` is not a `#`
    /// followed by six hexadecimal digits. Letter case is not checked.
    pub fn new(color: &str) -> Result<Self, Error> {
        let color = color.trim();
        let is_valid = color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit());

        if is_valid {
            Ok(Self(color.to_string()))
        } else {
            Err(Error::Validation(
                "color must be a hex color such as #3B82F6".to_owned(),
            ))
        }
    }

    /// Create a color without validation.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the format invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(color: &str) -> Self {
        Self(color.to_string())
    }
}

impl AsRef<str> for CategoryColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check the length of an optional icon name, treating blank names as no icon.
///
/// # Errors
///
/// Returns an [Error::Validation] if the icon is longer than [MAX_ICON_LENGTH] characters.
pub fn validate_icon(icon: Option<&str>) -> Result<Option<String>, Error> {
    let Some(icon) = icon.map(str::trim).filter(|icon| !icon.is_empty()) else {
        return Ok(None);
    };

    if icon.chars().count() > MAX_ICON_LENGTH {
        return Err(Error::Validation(format!(
            "icon must be at most {MAX_ICON_LENGTH} characters"
        )));
    }

    Ok(Some(icon.to_owned()))
}

/// A user-defined label for income or expenses (e.g., 'Salario', 'Transporte').
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub user_id: UserID,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
    pub color: CategoryColor,
    pub icon: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A category along with how many transactions use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    pub transaction_count: u64,
}

/// The category fields embedded in transactions and budgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub color: CategoryColor,
    pub icon: Option<String>,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            color: category.color.clone(),
            icon: category.icon.clone(),
            category_type: category.category_type,
        }
    }
}

/// Validated data for creating or editing a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub category_type: TransactionType,
    pub color: CategoryColor,
    pub icon: Option<String>,
}

/// Form data for category creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryFormData {
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl CategoryFormData {
    /// Validate the form, using `fallback_color` when no color was given.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] describing the first invalid field.
    pub fn validate(&self, fallback_color: &str) -> Result<NewCategory, Error> {
        let name = crate::user::validate_name(&self.name)?;
        let color = CategoryColor::new(self.color.as_deref().unwrap_or(fallback_color))?;
        let icon = validate_icon(self.icon.as_deref())?;

        Ok(NewCategory {
            name,
            category_type: self.category_type,
            color,
            icon,
        })
    }
}

/// The categories every new user starts with: (name, type, color, icon).
pub const DEFAULT_CATEGORIES: [(&str, TransactionType, &str, &str); 10] = [
    ("Salario", TransactionType::Income, "#10B981", "briefcase"),
    ("Freelance", TransactionType::Income, "#3B82F6", "code"),
    ("Inversiones", TransactionType::Income, "#8B5CF6", "trending-up"),
    ("Alimentación", TransactionType::Expense, "#F59E0B", "utensils"),
    ("Transporte", TransactionType::Expense, "#EF4444", "car"),
    ("Entretenimiento", TransactionType::Expense, "#EC4899", "film"),
    ("Salud", TransactionType::Expense, "#06B6D4", "heart"),
    ("Educación", TransactionType::Expense, "#84CC16", "book"),
    ("Hogar", TransactionType::Expense, "#F97316", "home"),
    ("Otros", TransactionType::Expense, "#6B7280", "more-horizontal"),
];

#[cfg(test)]
mod tests {
    use crate::{
        Error, TransactionType,
        category::domain::{
            CategoryColor, CategoryFormData, DEFAULT_CATEGORY_COLOR, validate_icon,
        },
    };

    #[test]
    fn color_accepts_lowercase_hex() {
        assert!(CategoryColor::new("#ab12ef").is_ok());
    }

    #[test]
    fn color_rejects_missing_hash() {
        assert!(matches!(
            CategoryColor::new("3B82F6"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn color_rejects_short_and_non_hex() {
        assert!(CategoryColor::new("#FFF").is_err());
        assert!(CategoryColor::new("#GGGGGG").is_err());
    }

    #[test]
    fn icon_longer_than_50_is_rejected() {
        assert!(validate_icon(Some(&"a".repeat(51))).is_err());
        assert_eq!(
            validate_icon(Some(&"a".repeat(50))),
            Ok(Some("a".repeat(50)))
        );
    }

    #[test]
    fn blank_icon_is_none() {
        assert_eq!(validate_icon(Some("  ")), Ok(None));
    }

    #[test]
    fn form_uses_fallback_color() {
        let form = CategoryFormData {
            name: "Mascotas".to_owned(),
            category_type: TransactionType::Expense,
            color: None,
            icon: None,
        };

        let category = form.validate(DEFAULT_CATEGORY_COLOR).unwrap();

        assert_eq!(category.color.as_ref(), DEFAULT_CATEGORY_COLOR);
    }
}
