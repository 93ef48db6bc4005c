use crate::models::{Order, OrderStatus};
use serde::{Deserialize, Serialize};

/// Hard cap on search results, matching the read path's pagination ceiling.
pub const MAX_SEARCH_RESULTS: usize = 1000;

/// Optional order-search predicates: status equality and member-name partial
/// match. A blank name counts as absent. Results are always capped at
/// [`MAX_SEARCH_RESULTS`] and ordered by `order_date DESC, id ASC` so repeated
/// runs are deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderSearch {
    pub status: Option<OrderStatus>,
    pub member_name: Option<String>,
}

impl OrderSearch {
    pub fn with_status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_member_name(name: impl Into<String>) -> Self {
        Self {
            member_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// The name predicate, with blank input treated as no filter.
    pub fn member_name_filter(&self) -> Option<&str> {
        self.member_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn matches(&self, order: &Order) -> bool {
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }
        if let Some(name) = self.member_name_filter() {
            if !order.member_name.contains(name) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Delivery, Order};
    use plaza_core::{Address, Member};

    fn order_for(name: &str) -> Order {
        let member = Member::new(name, Address::new("Seoul", "Teheran-ro", "06234"));
        Order::place(&member, Delivery::new(member.address.clone()), Vec::new())
    }

    #[test]
    fn test_empty_search_matches_everything() {
        assert!(OrderSearch::default().matches(&order_for("Hong")));
    }

    #[test]
    fn test_blank_member_name_is_ignored() {
        let search = OrderSearch::with_member_name("   ");
        assert!(search.member_name_filter().is_none());
        assert!(search.matches(&order_for("Hong")));
    }

    #[test]
    fn test_partial_name_match() {
        let search = OrderSearch::with_member_name("on");
        assert!(search.matches(&order_for("Hong")));
        assert!(!search.matches(&order_for("Kim")));
    }

    #[test]
    fn test_status_filter() {
        let mut order = order_for("Hong");
        let search = OrderSearch::with_status(OrderStatus::Canceled);
        assert!(!search.matches(&order));
        order.mark_canceled();
        assert!(search.matches(&order));
    }
}
