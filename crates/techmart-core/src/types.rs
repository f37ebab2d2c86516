//! # Domain Types
//!
//! Core domain types used throughout the TechMart storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Order       │   │   UserProfile   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  uid (UUID)     │       │
//! │  │  category       │   │  order_number   │   │  email          │       │
//! │  │  price          │   │  status         │   │  role           │       │
//! │  │  stock          │   │  items[]        │   │  wishlist[]     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │   SortKey       │   │  OrderStatus    │       │
//! │  │  laptop, gpu,…  │   │  newest, price… │   │  pending, …     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Cart lines and order items copy product data (name, price, image) at the
//! moment of the mutation. A later product edit never rewrites history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10% (Mongolian VAT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate(crate::VAT_RATE_BPS)
    }
}

// =============================================================================
// Category
// =============================================================================

/// The fixed product category set.
///
/// Category filtering is an exact equality match against this enumeration;
/// there are no free-form categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Laptop,
    Desktop,
    Monitor,
    Keyboard,
    Mouse,
    Headphone,
    Storage,
    Ram,
    Gpu,
    Cpu,
    Accessories,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 11] = [
        Category::Laptop,
        Category::Desktop,
        Category::Monitor,
        Category::Keyboard,
        Category::Mouse,
        Category::Headphone,
        Category::Storage,
        Category::Ram,
        Category::Gpu,
        Category::Cpu,
        Category::Accessories,
    ];

    /// Returns the stored/query string for this category.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Laptop => "laptop",
            Category::Desktop => "desktop",
            Category::Monitor => "monitor",
            Category::Keyboard => "keyboard",
            Category::Mouse => "mouse",
            Category::Headphone => "headphone",
            Category::Storage => "storage",
            Category::Ram => "ram",
            Category::Gpu => "gpu",
            Category::Cpu => "cpu",
            Category::Accessories => "accessories",
        }
    }

    /// Parses a stored category string. `None` for anything outside the set.
    pub fn parse(s: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

// =============================================================================
// Sort Key
// =============================================================================

/// Catalog ordering. Exactly one ordering field is active at a time;
/// there is no multi-key sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Creation time descending (the catalog default).
    #[default]
    Newest,
    /// Price ascending.
    PriceAsc,
    /// Price descending.
    PriceDesc,
    /// Name A→Z.
    NameAsc,
    /// Name Z→A.
    NameDesc,
    /// Rating descending.
    Rating,
    /// Sale count descending.
    Popular,
}

impl SortKey {
    /// Returns the wire string for this sort key.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
            SortKey::NameAsc => "name_asc",
            SortKey::NameDesc => "name_desc",
            SortKey::Rating => "rating",
            SortKey::Popular => "popular",
        }
    }

    /// Parses a wire string; unknown keys fall back to the default ordering.
    pub fn parse(s: &str) -> SortKey {
        match s {
            "price_asc" => SortKey::PriceAsc,
            "price_desc" => SortKey::PriceDesc,
            "name_asc" => SortKey::NameAsc,
            "name_desc" => SortKey::NameDesc,
            "rating" => SortKey::Rating,
            "popular" => SortKey::Popular,
            _ => SortKey::Newest,
        }
    }

    /// The single ordering column and direction this key maps to.
    ///
    /// Used by the storage layer to build `ORDER BY`.
    pub const fn order_field(&self) -> (&'static str, bool) {
        match self {
            SortKey::Newest => ("created_at", false),
            SortKey::PriceAsc => ("price", true),
            SortKey::PriceDesc => ("price", false),
            SortKey::NameAsc => ("name", true),
            SortKey::NameDesc => ("name", false),
            SortKey::Rating => ("rating", false),
            SortKey::Popular => ("sale_count", false),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product document in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Optional long description.
    pub description: Option<String>,

    /// Manufacturer/brand, searched together with name and description.
    pub brand: Option<String>,

    /// Category from the fixed set.
    pub category: Category,

    /// Regular price.
    pub price: Money,

    /// Discounted price, if a discount is running.
    pub discount_price: Option<Money>,

    /// Image references (URLs/paths); the first one is the thumbnail.
    pub images: Vec<String>,

    /// Purchasable stock. Mirrored into cart lines as the stock cap.
    pub stock: i64,

    /// Average review rating (0.0 - 5.0).
    pub rating: f64,

    /// Units sold; drives the "popular" sort.
    pub sale_count: i64,

    /// Whether the product is featured on the home page.
    pub featured: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The price a buyer actually pays: the discount price when present,
    /// the regular price otherwise.
    #[inline]
    pub fn effective_price(&self) -> Money {
        self.discount_price.unwrap_or(self.price)
    }

    /// Whether any stock is left to sell.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// The thumbnail image, if any image was uploaded.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed, not yet picked up by staff.
    #[default]
    Pending,
    /// Staff is preparing the order.
    Processing,
    /// Handed to the courier.
    Shipped,
    /// Delivered to the customer.
    Delivered,
    /// Cancelled before delivery.
    Cancelled,
}

impl OrderStatus {
    /// Returns the stored status string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parses a stored status string.
    pub fn parse(s: &str) -> Option<OrderStatus> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Localized label shown to the customer.
    pub const fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Хүлээгдэж байна",
            OrderStatus::Processing => "Боловсруулж байна",
            OrderStatus::Shipped => "Хүргэгдэж байна",
            OrderStatus::Delivered => "Хүргэгдсэн",
            OrderStatus::Cancelled => "Цуцлагдсан",
        }
    }
}

// =============================================================================
// Payment
// =============================================================================

/// Settlement status of an order's payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Returns the stored status string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }

    /// Parses a stored status string.
    pub fn parse(s: &str) -> Option<PaymentStatus> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "completed" => Some(PaymentStatus::Completed),
            "failed" => Some(PaymentStatus::Failed),
            "refunded" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }
}

/// How an order was paid. Card checkout only for now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
}

/// Payment summary stored on an order.
///
/// Only the last four card digits survive checkout; full card data is never
/// persisted or cached anywhere in this system.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub method: PaymentMethod,
    pub card_last4: String,
}

// =============================================================================
// Orders
// =============================================================================

/// Delivery details captured at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub district: String,
    pub apartment: Option<String>,
}

/// A line item in an order.
/// Uses the snapshot pattern: product data is frozen at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    /// Product name at checkout (frozen).
    pub name: String,
    /// Unit price at checkout (frozen).
    pub price: Money,
    pub quantity: i64,
    pub image: Option<String>,
}

impl OrderItem {
    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

/// An order document.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Human-readable order number shown to the customer.
    pub order_number: String,
    pub user_id: String,
    pub user_email: String,
    pub shipping: ShippingInfo,
    pub items: Vec<OrderItem>,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub payment: PaymentInfo,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Users
// =============================================================================

/// Role attached to a user document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    /// Returns the stored role string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    /// Parses a stored role string; unknown roles default to `User`.
    pub fn parse(s: &str) -> UserRole {
        match s {
            "admin" => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

/// A user document (profile + wishlist), keyed by the identity uid.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Wishlisted product ids. Unordered, no duplicates.
    pub wishlist: Vec<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Whether this user can reach the admin back-office.
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
