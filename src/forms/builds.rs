use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{BuildName, Category, ComponentSlug, TypeConstraintError};

#[derive(Deserialize)]
pub struct SelectComponentForm {
    pub category: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectComponentFormPayload {
    pub category: Category,
    pub slug: ComponentSlug,
}

#[derive(Debug, Error)]
pub enum BuildFormError {
    #[error("Build form validation failed: {0}")]
    Validation(String),
    #[error("Build form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for BuildFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for BuildFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<SelectComponentForm> for SelectComponentFormPayload {
    type Error = BuildFormError;

    fn try_from(value: SelectComponentForm) -> Result<Self, Self::Error> {
        Ok(Self {
            category: Category::try_from(value.category)?,
            slug: ComponentSlug::new(value.slug)?,
        })
    }
}

#[derive(Deserialize)]
pub struct RemoveComponentForm {
    pub category: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoveComponentFormPayload {
    pub category: Category,
    pub index: usize,
}

impl TryFrom<RemoveComponentForm> for RemoveComponentFormPayload {
    type Error = BuildFormError;

    fn try_from(value: RemoveComponentForm) -> Result<Self, Self::Error> {
        Ok(Self {
            category: Category::try_from(value.category)?,
            index: value.index,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct SaveBuildForm {
    #[validate(length(min = 1))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveBuildFormPayload {
    pub name: BuildName,
}

impl TryFrom<SaveBuildForm> for SaveBuildFormPayload {
    type Error = BuildFormError;

    fn try_from(value: SaveBuildForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: BuildName::new(value.name)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_form_rejects_unknown_category() {
        let form = SelectComponentForm {
            category: "Cooling".into(),
            slug: "some-part".into(),
        };
        assert!(SelectComponentFormPayload::try_from(form).is_err());
    }

    #[test]
    fn save_form_rejects_blank_name() {
        let form = SaveBuildForm { name: "   ".into() };
        assert!(SaveBuildFormPayload::try_from(form).is_err());
    }

    #[test]
    fn save_form_trims_name() {
        let form = SaveBuildForm {
            name: "  Mi PC Gamer  ".into(),
        };
        let payload = SaveBuildFormPayload::try_from(form).unwrap();
        assert_eq!(payload.name.as_str(), "Mi PC Gamer");
    }
}
