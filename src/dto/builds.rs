use serde::Serialize;

use crate::domain::build::Build;
use crate::domain::component::Component;
use crate::domain::types::Category;

/// One resolved component row on a saved-build card.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BuildCardLine {
    pub category: String,
    pub name: String,
    pub brand: String,
    pub image_url: String,
    pub price: f64,
}

/// A saved build prepared for template rendering: the stored snapshot plus
/// whatever components still resolve against the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct BuildCard {
    pub id: i32,
    pub name: String,
    pub total_price: f64,
    pub created_at: String,
    pub lines: Vec<BuildCardLine>,
}

impl BuildCard {
    pub fn new(build: &Build, resolve: impl Fn(&str) -> Option<Component>) -> Self {
        let mut lines = Vec::new();
        for category in Category::ALL {
            let Some(slugs) = build.components.get(&category) else {
                continue;
            };
            for slug in slugs {
                if let Some(component) = resolve(slug.as_str()) {
                    lines.push(BuildCardLine {
                        category: category.as_str().to_string(),
                        name: component.name.as_str().to_string(),
                        brand: component.brand.as_str().to_string(),
                        image_url: component.image_url.as_str().to_string(),
                        price: component.best_price(),
                    });
                }
            }
        }

        Self {
            id: build.id.get(),
            name: build.name.as_str().to_string(),
            total_price: build.total_price.get(),
            created_at: build.created_at.format("%d-%m-%Y").to_string(),
            lines,
        }
    }
}
