//! # Catalog Query Pipeline
//!
//! The client-side half of product querying. The storage layer handles
//! category equality and single-field ordering; everything the document
//! store cannot do (substring search, offset pagination over the searched
//! set) happens here as pure, single-pass transformations.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Query Pipeline                               │
//! │                                                                         │
//! │  backend read (category filter + ORDER BY sort field)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  apply_search(items, "macbook")   ← case-insensitive substring,         │
//! │       │                             OR across name/description/brand    │
//! │       ▼                                                                 │
//! │  paginate(items, page, size)      ← offset slice (page-1)·size ..       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductPage { items, total_count, current_page, total_pages }          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Category, Product, SortKey};
use crate::{ITEMS_PER_PAGE, MAX_PAGE_SIZE};

// =============================================================================
// Query & Page Types
// =============================================================================

/// Parameters for one catalog page fetch.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    /// `None` means "all categories" (no filter).
    pub category: Option<Category>,

    /// Single active ordering field.
    pub sort: SortKey,

    /// Free-text search, applied client-side after the backend read.
    pub search: Option<String>,

    /// 1-based page number.
    pub page: u32,

    /// Page size; clamped into [1, 100].
    pub page_size: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        ProductQuery {
            category: None,
            sort: SortKey::default(),
            search: None,
            page: 1,
            page_size: ITEMS_PER_PAGE,
        }
    }
}

impl ProductQuery {
    /// The effective page size, clamped into [1, MAX_PAGE_SIZE].
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// The effective 1-based page number.
    pub fn effective_page(&self) -> u32 {
        self.page.max(1)
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub items: Vec<Product>,

    /// Matching products across all pages (after search).
    pub total_count: usize,

    pub current_page: u32,

    /// `ceil(total_count / page_size)`; 0 when nothing matched.
    pub total_pages: u32,
}

// =============================================================================
// Search
// =============================================================================

/// Checks one product against a search term.
///
/// Case-insensitive substring match, OR across name, description and brand.
/// Absent fields are treated as empty strings, so missing data never fails
/// a query.
pub fn matches_search(product: &Product, term: &str) -> bool {
    let term = term.to_lowercase();
    if term.is_empty() {
        return true;
    }

    let name = product.name.to_lowercase();
    let description = product.description.as_deref().unwrap_or("").to_lowercase();
    let brand = product.brand.as_deref().unwrap_or("").to_lowercase();

    name.contains(&term) || description.contains(&term) || brand.contains(&term)
}

/// Filters products by a search term, preserving order.
pub fn apply_search(products: Vec<Product>, term: &str) -> Vec<Product> {
    let term = term.trim();
    if term.is_empty() {
        return products;
    }
    products
        .into_iter()
        .filter(|p| matches_search(p, term))
        .collect()
}

// =============================================================================
// Sort
// =============================================================================

/// Sorts products by a single key.
///
/// The storage layer normally orders results; this pure version backs the
/// same contract for in-memory collections (and documents the ordering
/// semantics for each key).
pub fn sort_products(products: &mut [Product], key: SortKey) {
    match key {
        SortKey::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::NameAsc => products.sort_by(|a, b| a.name.cmp(&b.name)),
        SortKey::NameDesc => products.sort_by(|a, b| b.name.cmp(&a.name)),
        SortKey::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortKey::Popular => products.sort_by(|a, b| b.sale_count.cmp(&a.sale_count)),
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Slices one page out of the (already filtered/sorted) result set.
///
/// A page past the end yields an empty item list, not an error.
pub fn paginate(products: Vec<Product>, page: u32, page_size: u32) -> ProductPage {
    let page = page.max(1);
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

    let total_count = products.len();
    let total_pages = total_count.div_ceil(page_size as usize) as u32;

    let start = (page as usize - 1).saturating_mul(page_size as usize);
    let items: Vec<Product> = products
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();

    ProductPage {
        items,
        total_count,
        current_page: page,
        total_pages,
    }
}

/// Runs the full client-side pipeline over an in-memory collection:
/// category filter, sort, search, then pagination.
pub fn run_query(mut products: Vec<Product>, query: &ProductQuery) -> ProductPage {
    if let Some(category) = query.category {
        products.retain(|p| p.category == category);
    }
    sort_products(&mut products, query.sort);
    if let Some(term) = query.search.as_deref() {
        products = apply_search(products, term);
    }
    paginate(products, query.effective_page(), query.effective_page_size())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::{Duration, Utc};

    fn product(id: &str, name: &str, category: Category, price: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            brand: None,
            category,
            price: Money::from_minor(price),
            discount_price: None,
            images: vec![],
            stock: 10,
            rating: 0.0,
            sale_count: 0,
            featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_search_is_case_insensitive_or_across_fields() {
        let mut p = product("1", "MacBook Pro", Category::Laptop, 1);
        p.description = Some("Apple silicon".to_string());
        p.brand = Some("Apple".to_string());

        assert!(matches_search(&p, "macbook"));
        assert!(matches_search(&p, "SILICON"));
        assert!(matches_search(&p, "apple"));
        assert!(!matches_search(&p, "thinkpad"));
    }

    #[test]
    fn test_search_tolerates_missing_fields() {
        let p = product("1", "Keychron K2", Category::Keyboard, 1);
        // description and brand are None; must not match but must not fail
        assert!(!matches_search(&p, "apple"));
        assert!(matches_search(&p, "keychron"));
    }

    #[test]
    fn test_spec_pagination_example() {
        // 20 laptops, price_asc, page 1, size 12 → 12 items, non-decreasing
        // by price, totalPages = 2.
        let products: Vec<Product> = (0..20)
            .map(|i| {
                product(
                    &format!("p-{}", i),
                    &format!("Laptop {}", i),
                    Category::Laptop,
                    ((20 - i) * 10_000) as i64,
                )
            })
            .collect();

        let query = ProductQuery {
            category: Some(Category::Laptop),
            sort: SortKey::PriceAsc,
            page: 1,
            page_size: 12,
            ..ProductQuery::default()
        };
        let page = run_query(products, &query);

        assert_eq!(page.items.len(), 12);
        assert_eq!(page.total_count, 20);
        assert_eq!(page.total_pages, 2);
        assert!(page
            .items
            .windows(2)
            .all(|w| w[0].price <= w[1].price));
    }

    #[test]
    fn test_pagination_past_end_is_empty() {
        let products = vec![product("1", "A", Category::Mouse, 1)];
        let page = paginate(products, 5, 12);
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 5);
    }

    #[test]
    fn test_category_filter_exact_match() {
        let products = vec![
            product("1", "A", Category::Laptop, 1),
            product("2", "B", Category::Mouse, 1),
        ];
        let query = ProductQuery {
            category: Some(Category::Mouse),
            ..ProductQuery::default()
        };
        let page = run_query(products, &query);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "2");
    }

    #[test]
    fn test_newest_sort_is_creation_desc() {
        let now = Utc::now();
        let mut old = product("old", "Old", Category::Gpu, 1);
        old.created_at = now - Duration::days(2);
        let mut new = product("new", "New", Category::Gpu, 1);
        new.created_at = now;

        let mut products = vec![old, new];
        sort_products(&mut products, SortKey::Newest);
        assert_eq!(products[0].id, "new");
    }

    #[test]
    fn test_rating_and_popular_sorts() {
        let mut a = product("a", "A", Category::Cpu, 1);
        a.rating = 4.5;
        a.sale_count = 3;
        let mut b = product("b", "B", Category::Cpu, 1);
        b.rating = 3.0;
        b.sale_count = 9;

        let mut by_rating = vec![a.clone(), b.clone()];
        sort_products(&mut by_rating, SortKey::Rating);
        assert_eq!(by_rating[0].id, "a");

        let mut by_sales = vec![a, b];
        sort_products(&mut by_sales, SortKey::Popular);
        assert_eq!(by_sales[0].id, "b");
    }

    #[test]
    fn test_page_size_clamped() {
        let query = ProductQuery {
            page_size: 5000,
            page: 0,
            ..ProductQuery::default()
        };
        assert_eq!(query.effective_page_size(), MAX_PAGE_SIZE);
        assert_eq!(query.effective_page(), 1);
    }
}
