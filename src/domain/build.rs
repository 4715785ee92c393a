use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::component::Component;
use crate::domain::types::{BuildId, BuildName, Category, ComponentPrice, ComponentSlug, UserId};

/// A saved, user-owned build snapshot.
///
/// `total_price` is the aggregator's value at save time; it is never
/// recomputed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    pub id: BuildId,
    pub user_id: UserId,
    pub name: BuildName,
    pub components: BTreeMap<Category, Vec<ComponentSlug>>,
    pub total_price: ComponentPrice,
    pub created_at: NaiveDateTime,
}

/// Information required to persist a new [`Build`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewBuild {
    pub user_id: UserId,
    pub name: BuildName,
    pub components: BTreeMap<Category, Vec<ComponentSlug>>,
    pub total_price: ComponentPrice,
    pub created_at: NaiveDateTime,
}

/// In-progress slot selection, kept in the visitor's session.
///
/// Holds slugs rather than whole components so the cookie session stays
/// small; resolution against the catalog happens per request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BuildSelection {
    selections: BTreeMap<Category, Vec<ComponentSlug>>,
}

impl BuildSelection {
    /// Picks a component for a slot.
    ///
    /// Single-select categories overwrite the previous pick; multi-select
    /// categories append, duplicates permitted.
    pub fn select(&mut self, category: Category, slug: ComponentSlug) {
        let entry = self.selections.entry(category).or_default();
        if category.allow_multiple() {
            entry.push(slug);
        } else {
            *entry = vec![slug];
        }
    }

    /// Removes the pick at `index` within a slot.
    ///
    /// Out-of-range indexes fall through the positional filter as a no-op;
    /// relative order of the remaining picks is preserved.
    pub fn remove(&mut self, category: Category, index: usize) {
        if let Some(entry) = self.selections.get_mut(&category) {
            *entry = entry
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, slug)| slug.clone())
                .collect();
        }
    }

    /// Drops every pick.
    pub fn clear(&mut self) {
        self.selections.clear();
    }

    /// Picks for one slot, in selection order.
    pub fn get(&self, category: Category) -> &[ComponentSlug] {
        self.selections
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All picked slugs flattened in registry order.
    pub fn slugs(&self) -> Vec<ComponentSlug> {
        Category::ALL
            .into_iter()
            .flat_map(|category| self.get(category).iter().cloned())
            .collect()
    }

    /// Total number of picks across all slots.
    pub fn count(&self) -> usize {
        self.selections.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// The category → slug-list map persisted with a saved build.
    pub fn into_components(self) -> BTreeMap<Category, Vec<ComponentSlug>> {
        self.selections
            .into_iter()
            .filter(|(_, slugs)| !slugs.is_empty())
            .collect()
    }
}

/// One selected component resolved against the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedLine {
    pub category: Category,
    /// Position within the slot, used by the remove control.
    pub index: usize,
    pub component: Component,
}

/// Per-slot selection summary shown next to the configurator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub label: &'static str,
    pub count: usize,
    pub text: String,
}

/// A selection resolved against the catalog, ready for totals and export.
///
/// Slugs that no longer resolve to a catalog component are skipped, the same
/// way the storefront skips map misses.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedBuild {
    lines: Vec<ResolvedLine>,
}

impl ResolvedBuild {
    pub fn resolve(
        selection: &BuildSelection,
        catalog: &HashMap<ComponentSlug, Component>,
    ) -> Self {
        let lines = Category::ALL
            .into_iter()
            .flat_map(|category| {
                selection
                    .get(category)
                    .iter()
                    .enumerate()
                    .filter_map(move |(index, slug)| {
                        catalog.get(slug).map(|component| ResolvedLine {
                            category,
                            index,
                            component: component.clone(),
                        })
                    })
            })
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[ResolvedLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of every resolved component's minimum advertised price.
    pub fn total_price(&self) -> f64 {
        self.lines
            .iter()
            .map(|line| line.component.best_price())
            .sum()
    }

    /// Per-category selection counts with the storefront's wording.
    pub fn summary(&self) -> Vec<CategorySummary> {
        Category::ALL
            .into_iter()
            .map(|category| {
                let count = self
                    .lines
                    .iter()
                    .filter(|line| line.category == category)
                    .count();
                let text = match count {
                    0 => "No seleccionado".to_string(),
                    1 => "1x seleccionado".to_string(),
                    n => format!("{n}x seleccionados"),
                };
                CategorySummary {
                    category,
                    label: category.label(),
                    count,
                    text,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::component::PriceEntry;
    use crate::domain::types::{
        BrandName, ComponentId, ComponentName, ComponentSku, ImageUrl, OfferUrl, StockCount,
        StoreId,
    };
    use chrono::DateTime;

    fn slug(value: &str) -> ComponentSlug {
        ComponentSlug::new(value).unwrap()
    }

    fn component(slug_value: &str, category: Category, prices: &[(f64, &str)]) -> Component {
        let now = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        Component {
            id: ComponentId::new(1).unwrap(),
            slug: slug(slug_value),
            name: ComponentName::new(slug_value).unwrap(),
            sku: ComponentSku::new("SKU1").unwrap(),
            brand: BrandName::new("Marca").unwrap(),
            category,
            description: None,
            image_url: ImageUrl::new("https://example.com/img.jpg").unwrap(),
            price: ComponentPrice::new(0.0).unwrap(),
            stock: StockCount::new(5).unwrap(),
            specs: Default::default(),
            prices: prices
                .iter()
                .enumerate()
                .map(|(i, (price, url))| PriceEntry {
                    store_id: StoreId::new(format!("store-{}", i + 1)).unwrap(),
                    price: ComponentPrice::new(*price).unwrap(),
                    url: OfferUrl::new(*url).unwrap(),
                })
                .collect(),
            price_history: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn catalog(components: Vec<Component>) -> HashMap<ComponentSlug, Component> {
        components
            .into_iter()
            .map(|c| (c.slug.clone(), c))
            .collect()
    }

    #[test]
    fn single_select_category_overwrites_previous_pick() {
        let mut selection = BuildSelection::default();
        selection.select(Category::Cpu, slug("cpu-a"));
        selection.select(Category::Cpu, slug("cpu-b"));

        assert_eq!(selection.get(Category::Cpu), &[slug("cpu-b")]);
    }

    #[test]
    fn multi_select_category_appends_including_duplicates() {
        let mut selection = BuildSelection::default();
        selection.select(Category::Ram, slug("ram-a"));
        selection.select(Category::Ram, slug("ram-a"));
        selection.select(Category::Ram, slug("ram-b"));

        assert_eq!(selection.get(Category::Ram).len(), 3);
    }

    #[test]
    fn remove_drops_exactly_the_indexed_pick_and_keeps_order() {
        let mut selection = BuildSelection::default();
        selection.select(Category::Storage, slug("ssd-a"));
        selection.select(Category::Storage, slug("ssd-b"));
        selection.select(Category::Storage, slug("ssd-c"));

        selection.remove(Category::Storage, 1);

        assert_eq!(
            selection.get(Category::Storage),
            &[slug("ssd-a"), slug("ssd-c")]
        );
    }

    #[test]
    fn remove_out_of_range_is_a_no_op() {
        let mut selection = BuildSelection::default();
        selection.select(Category::Cpu, slug("cpu-a"));

        selection.remove(Category::Cpu, 5);
        selection.remove(Category::Gpu, 0);

        assert_eq!(selection.count(), 1);
    }

    #[test]
    fn empty_selection_totals_zero() {
        let resolved = ResolvedBuild::resolve(&BuildSelection::default(), &HashMap::new());
        assert!(resolved.is_empty());
        assert_eq!(resolved.total_price(), 0.0);
    }

    #[test]
    fn total_price_sums_best_prices_across_categories() {
        let mut selection = BuildSelection::default();
        selection.select(Category::Cpu, slug("intel-core-i9-13900k"));
        selection.select(Category::Gpu, slug("nvidia-geforce-rtx-4090"));

        let catalog = catalog(vec![
            component(
                "intel-core-i9-13900k",
                Category::Cpu,
                &[
                    (589_990.0, "https://store-1.example.com/i9"),
                    (599_990.0, "https://store-2.example.com/i9"),
                ],
            ),
            component(
                "nvidia-geforce-rtx-4090",
                Category::Gpu,
                &[
                    (1_599_990.0, "https://store-1.example.com/4090"),
                    (1_649_990.0, "https://store-2.example.com/4090"),
                ],
            ),
        ]);

        let resolved = ResolvedBuild::resolve(&selection, &catalog);
        assert_eq!(resolved.total_price(), 2_189_980.0);
    }

    #[test]
    fn unresolvable_slugs_are_skipped() {
        let mut selection = BuildSelection::default();
        selection.select(Category::Cpu, slug("gone-from-catalog"));
        selection.select(Category::Ram, slug("ram-a"));

        let catalog = catalog(vec![component(
            "ram-a",
            Category::Ram,
            &[(10_000.0, "https://store-1.example.com/ram")],
        )]);

        let resolved = ResolvedBuild::resolve(&selection, &catalog);
        assert_eq!(resolved.lines().len(), 1);
        assert_eq!(resolved.total_price(), 10_000.0);
    }

    #[test]
    fn summary_reports_counts_with_storefront_wording() {
        let mut selection = BuildSelection::default();
        selection.select(Category::Ram, slug("ram-a"));
        selection.select(Category::Ram, slug("ram-b"));
        selection.select(Category::Cpu, slug("cpu-a"));

        let catalog = catalog(vec![
            component("ram-a", Category::Ram, &[]),
            component("ram-b", Category::Ram, &[]),
            component("cpu-a", Category::Cpu, &[]),
        ]);

        let resolved = ResolvedBuild::resolve(&selection, &catalog);
        let summary = resolved.summary();

        assert_eq!(summary.len(), 7);
        assert_eq!(summary[0].text, "1x seleccionado");
        assert_eq!(summary[2].text, "2x seleccionados");
        assert_eq!(summary[6].text, "No seleccionado");
    }

    #[test]
    fn into_components_drops_emptied_slots() {
        let mut selection = BuildSelection::default();
        selection.select(Category::Cpu, slug("cpu-a"));
        selection.remove(Category::Cpu, 0);
        selection.select(Category::Gpu, slug("gpu-a"));

        let components = selection.into_components();
        assert_eq!(components.len(), 1);
        assert!(components.contains_key(&Category::Gpu));
    }
}
