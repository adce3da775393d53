use rand::rngs::StdRng;
use rand_distr::Distribution;

/// Item categories used for catalog presentation and generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Art,
    Electronics,
    Jewelry,
    Books,
    Collectibles,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Category::Art => "Art",
            Category::Electronics => "Electronics",
            Category::Jewelry => "Jewelry",
            Category::Books => "Books",
            Category::Collectibles => "Collectibles",
        }
    }

    /// All categories, in the order randomized catalogs cycle through them
    pub fn all() -> [Category; 5] {
        [
            Category::Art,
            Category::Electronics,
            Category::Jewelry,
            Category::Books,
            Category::Collectibles,
        ]
    }
}

/// Template for an auctionable item, supplied in configuration before start
#[derive(Debug, Clone)]
pub struct ItemTemplate {
    pub name: String,
    pub category: Category,
    pub estimated_value: f64,
    pub starting_price: f64,
}

impl ItemTemplate {
    pub fn new(name: &str, category: Category, estimated_value: f64, starting_price: f64) -> Self {
        Self {
            name: name.to_string(),
            category,
            estimated_value,
            starting_price,
        }
    }
}

/// Live auction item owned by the engine
/// `current_price` moves only when the engine accepts a bid; the sold fields
/// are written exactly once at settlement and survive until the next restart
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub item_id: usize,
    pub name: String,
    pub category: Category,
    pub estimated_value: f64,
    pub starting_price: f64,
    pub current_price: f64,
    pub sold: bool,
    pub winner_id: Option<usize>,
    pub final_price: Option<f64>,
}

impl Item {
    /// Create a fresh unsold item from its template
    pub fn from_template(item_id: usize, template: &ItemTemplate) -> Self {
        Self {
            item_id,
            name: template.name.clone(),
            category: template.category,
            estimated_value: template.estimated_value,
            starting_price: template.starting_price,
            current_price: template.starting_price,
            sold: false,
            winner_id: None,
            final_price: None,
        }
    }
}

/// Object-safe wrapper for Distribution<f64> that works with StdRng
/// This is needed because Distribution<f64> cannot be made into a trait object
/// due to its generic sample method
pub trait DistributionF64 {
    fn sample(&self, rng: &mut StdRng) -> f64;
}

impl<D: Distribution<f64>> DistributionF64 for D {
    fn sample(&self, rng: &mut StdRng) -> f64 {
        Distribution::sample(self, rng)
    }
}

/// Distribution parameters for randomized catalog generation
/// Contains pre-initialized distribution boxes
pub struct CatalogParam {
    pub estimated_value_dist: Box<dyn DistributionF64>,
    /// Starting price as a fraction of estimated value, typically well below 1.0
    pub starting_fraction_dist: Box<dyn DistributionF64>,
}

impl CatalogParam {
    /// Create a new CatalogParam with Distribution<f64> types
    /// The distributions will be boxed internally
    pub fn new<D1, D2>(estimated_value_dist: D1, starting_fraction_dist: D2) -> Self
    where
        D1: Distribution<f64> + 'static,
        D2: Distribution<f64> + 'static,
    {
        Self {
            estimated_value_dist: Box::new(estimated_value_dist),
            starting_fraction_dist: Box::new(starting_fraction_dist),
        }
    }
}

/// Generate a randomized catalog of `count` item templates
/// Values are drawn from the supplied distributions; categories cycle so a
/// generated catalog always spans several of them
pub fn generate_catalog(params: &CatalogParam, count: usize, rng: &mut StdRng) -> Vec<ItemTemplate> {
    let categories = Category::all();
    let mut templates = Vec::with_capacity(count);
    for index in 0..count {
        let estimated_value = params.estimated_value_dist.sample(rng).max(10.0).round();
        let fraction = params.starting_fraction_dist.sample(rng).clamp(0.05, 0.8);
        let starting_price = (estimated_value * fraction).round().max(1.0);
        let category = categories[index % categories.len()];
        templates.push(ItemTemplate {
            name: format!("Lot {}", index + 1),
            category,
            estimated_value,
            starting_price,
        });
    }
    templates
}

/// The fixed five-lot showcase catalog used by the default simulation
pub fn standard_catalog() -> Vec<ItemTemplate> {
    vec![
        ItemTemplate::new("Vintage Painting", Category::Art, 300.0, 50.0),
        ItemTemplate::new("Gaming Laptop", Category::Electronics, 500.0, 200.0),
        ItemTemplate::new("Antique Watch", Category::Jewelry, 400.0, 150.0),
        ItemTemplate::new("Rare Book Set", Category::Books, 250.0, 80.0),
        ItemTemplate::new("Designer Camera", Category::Electronics, 600.0, 300.0),
    ]
}

/// Percentage of estimated value left on the table by a charge
/// Used by stats and batch reporting
pub fn savings_pct(estimated_value: f64, charge: f64) -> f64 {
    if estimated_value <= 0.0 {
        return 0.0;
    }
    (estimated_value - charge) / estimated_value * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::lognormal_dist;
    use rand::SeedableRng;
    use rand_distr::Uniform;

    #[test]
    fn test_item_from_template_starts_unsold() {
        let template = ItemTemplate::new("Vintage Painting", Category::Art, 300.0, 50.0);
        let item = Item::from_template(0, &template);
        assert!(!item.sold);
        assert_eq!(item.current_price, 50.0);
        assert_eq!(item.winner_id, None);
        assert_eq!(item.final_price, None);
    }

    #[test]
    fn test_generate_catalog_is_deterministic_for_seed() {
        let params = CatalogParam::new(lognormal_dist(500.0, 250.0), Uniform::new(0.2, 0.5));
        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);
        let catalog_a = generate_catalog(&params, 8, &mut rng_a);
        let catalog_b = generate_catalog(&params, 8, &mut rng_b);
        for (a, b) in catalog_a.iter().zip(catalog_b.iter()) {
            assert_eq!(a.estimated_value, b.estimated_value);
            assert_eq!(a.starting_price, b.starting_price);
        }
    }

    #[test]
    fn test_generated_starting_price_below_value() {
        let params = CatalogParam::new(lognormal_dist(500.0, 250.0), Uniform::new(0.2, 0.5));
        let mut rng = StdRng::seed_from_u64(4);
        for template in generate_catalog(&params, 20, &mut rng) {
            assert!(template.starting_price < template.estimated_value);
            assert!(template.starting_price >= 1.0);
        }
    }

    #[test]
    fn test_savings_pct() {
        assert_eq!(savings_pct(400.0, 300.0), 25.0);
        assert_eq!(savings_pct(0.0, 300.0), 0.0);
    }
}
