//! Purchase and sales reports.
//!
//! Both reports are single-pass folds over a list of orders. Revenue figures
//! count delivered orders only; the weekday charts count every order.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use ipufood_core::{OrderId, OrderStatus, PaymentMethod, Price};

use crate::models::order::Order;

/// Number of entries in the top categories / top products lists.
pub const TOP_N: usize = 4;

/// Number of orders in the sales report's recent list.
pub const RECENT_ORDERS: usize = 5;

/// Weekday labels starting on Sunday.
const SUNDAY_FIRST: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

/// Weekday labels starting on Monday.
const MONDAY_FIRST: [&str; 7] = ["Seg", "Ter", "Qua", "Qui", "Sex", "Sáb", "Dom"];

/// Time window a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    /// Last 7 days.
    Week,
    /// Last 30 days.
    Month,
    /// Last 365 days.
    Year,
    /// Every order.
    #[default]
    All,
}

impl ReportPeriod {
    /// Earliest `created_at` included, or `None` for no limit.
    #[must_use]
    pub fn since(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let days = match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
            Self::All => return None,
        };
        Some(now - Duration::days(days))
    }

    /// Keep only orders inside the period.
    #[must_use]
    pub fn filter(self, orders: Vec<Order>, now: DateTime<Utc>) -> Vec<Order> {
        match self.since(now) {
            Some(since) => orders
                .into_iter()
                .filter(|o| o.created_at >= since)
                .collect(),
            None => orders,
        }
    }
}

/// Spending in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySpend {
    pub category: String,
    /// Units bought.
    pub count: u32,
    pub total: Price,
}

/// Amount for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayAmount {
    pub day: &'static str,
    pub total: Price,
}

/// A customer's purchase history summary.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseReport {
    pub period: ReportPeriod,
    pub completed_orders: usize,
    pub pending_orders: usize,
    pub total_spent: Price,
    pub average_order_value: Price,
    pub top_categories: Vec<CategorySpend>,
    /// Dom..Sáb, always seven entries.
    pub spending_by_day: Vec<DayAmount>,
    pub orders: Vec<Order>,
}

/// Sales of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSales {
    pub name: String,
    /// Units sold.
    pub sales: u32,
    pub revenue: Price,
}

/// Order summary shown in the sales report.
#[derive(Debug, Clone, Serialize)]
pub struct RecentOrder {
    pub id: OrderId,
    pub user_name: String,
    pub total: Price,
    pub status: OrderStatus,
    pub status_label: &'static str,
    pub payment_method: PaymentMethod,
    pub payment_label: &'static str,
    pub item_count: u32,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for RecentOrder {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            user_name: order.user_name.clone(),
            total: order.total,
            status: order.status,
            status_label: order.status.label(),
            payment_method: order.payment_method,
            payment_label: order.payment_method.label(),
            item_count: order.item_count(),
            created_at: order.created_at,
        }
    }
}

/// Store-wide sales summary.
#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    pub period: ReportPeriod,
    pub completed_orders: usize,
    pub pending_orders: usize,
    pub total_revenue: Price,
    pub average_order_value: Price,
    pub top_products: Vec<ProductSales>,
    /// Seg..Dom, always seven entries.
    pub revenue_by_day: Vec<DayAmount>,
    pub recent_orders: Vec<RecentOrder>,
}

/// Category of an order line whose item carries none, guessed from the name.
#[must_use]
pub fn infer_category(product_name: &str) -> &'static str {
    let name = product_name.to_lowercase();
    if name.contains("burger") || name.contains("x-") {
        "Lanches"
    } else if name.contains("pizza") {
        "Pizzas"
    } else if name.contains("batata") || name.contains("frita") {
        "Acompanhamentos"
    } else if name.contains("refrigerante") || name.contains("bebida") {
        "Bebidas"
    } else if name.contains("sorvete") || name.contains("sobremesa") {
        "Sobremesas"
    } else {
        "Outros"
    }
}

/// Completed count, pending count and delivered revenue.
fn status_totals(orders: &[Order]) -> (usize, usize, Price) {
    orders
        .iter()
        .fold((0, 0, Price::zero()), |(done, pending, revenue), o| match o.status {
            OrderStatus::Delivered => (done + 1, pending, revenue + o.total),
            OrderStatus::Pending => (done, pending + 1, revenue),
            _ => (done, pending, revenue),
        })
}

/// Sum order totals into weekday buckets.
///
/// `monday_first` picks the label order; the offset decides which local day an
/// order falls on.
fn by_weekday(orders: &[Order], offset: FixedOffset, monday_first: bool) -> Vec<DayAmount> {
    let labels = if monday_first { MONDAY_FIRST } else { SUNDAY_FIRST };
    let mut totals = [Price::zero(); 7];

    for order in orders {
        let weekday = order.created_at.with_timezone(&offset).weekday();
        let idx = if monday_first {
            weekday.num_days_from_monday()
        } else {
            weekday.num_days_from_sunday()
        };
        if let Some(slot) = usize::try_from(idx).ok().and_then(|i| totals.get_mut(i)) {
            *slot = *slot + order.total;
        }
    }

    labels
        .into_iter()
        .zip(totals)
        .map(|(day, total)| DayAmount { day, total })
        .collect()
}

/// Sort by amount descending (name ascending on ties) and keep the first `TOP_N`.
fn top_by<T>(mut entries: Vec<T>, amount: impl Fn(&T) -> Price, name: impl Fn(&T) -> &str) -> Vec<T> {
    entries.sort_by(|a, b| amount(b).cmp(&amount(a)).then_with(|| name(a).cmp(name(b))));
    entries.truncate(TOP_N);
    entries
}

/// Build a customer's purchase report.
///
/// `orders` must already be restricted to the customer and the period.
#[must_use]
pub fn purchase_report(
    orders: Vec<Order>,
    period: ReportPeriod,
    offset: FixedOffset,
) -> PurchaseReport {
    let (completed_orders, pending_orders, total_spent) = status_totals(&orders);

    let mut categories: HashMap<String, CategorySpend> = HashMap::new();
    for item in orders.iter().flat_map(|o| &o.items) {
        let category = item
            .category
            .clone()
            .unwrap_or_else(|| infer_category(&item.product_name).to_owned());
        let entry = categories
            .entry(category.clone())
            .or_insert_with(|| CategorySpend {
                category,
                count: 0,
                total: Price::zero(),
            });
        entry.count = entry.count.saturating_add(item.quantity);
        entry.total = entry.total + item.total;
    }

    PurchaseReport {
        period,
        completed_orders,
        pending_orders,
        total_spent,
        average_order_value: total_spent.average_over(completed_orders),
        top_categories: top_by(
            categories.into_values().collect(),
            |c| c.total,
            |c| &c.category,
        ),
        spending_by_day: by_weekday(&orders, offset, false),
        orders,
    }
}

/// Build the store-wide sales report.
///
/// `orders` must already be restricted to the period and sorted newest first.
#[must_use]
pub fn sales_report(orders: &[Order], period: ReportPeriod, offset: FixedOffset) -> SalesReport {
    let (completed_orders, pending_orders, total_revenue) = status_totals(orders);

    let mut products: HashMap<&str, ProductSales> = HashMap::new();
    for item in orders.iter().flat_map(|o| &o.items) {
        let entry = products
            .entry(item.product_name.as_str())
            .or_insert_with(|| ProductSales {
                name: item.product_name.clone(),
                sales: 0,
                revenue: Price::zero(),
            });
        entry.sales = entry.sales.saturating_add(item.quantity);
        entry.revenue = entry.revenue + item.total;
    }

    SalesReport {
        period,
        completed_orders,
        pending_orders,
        total_revenue,
        average_order_value: total_revenue.average_over(completed_orders),
        top_products: top_by(products.into_values().collect(), |p| p.revenue, |p| &p.name),
        revenue_by_day: by_weekday(orders, offset, true),
        recent_orders: orders
            .iter()
            .take(RECENT_ORDERS)
            .map(RecentOrder::from)
            .collect(),
    }
}
