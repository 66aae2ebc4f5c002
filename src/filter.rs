use crate::models::{Buyer, PaymentStatus, Record};

pub trait Searchable {
    fn search_key(&self) -> &str;
}

impl Searchable for Record {
    fn search_key(&self) -> &str {
        &self.name
    }
}

impl Searchable for Buyer {
    fn search_key(&self) -> &str {
        &self.name
    }
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || haystack.to_lowercase().contains(needle_lower)
}

pub fn filter_by_query<T: Searchable + Clone>(items: &[T], query: &str) -> Vec<T> {
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| contains_ignore_case(item.search_key(), &needle))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    query: String,
    category: Option<PaymentStatus>,
}

impl FilterState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> Option<PaymentStatus> {
        self.category
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn toggle_category(&mut self, status: PaymentStatus) -> Option<PaymentStatus> {
        self.category = if self.category == Some(status) { None } else { Some(status) };
        self.category
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.matches_lowered(record, &self.query.to_lowercase())
    }

    pub fn view_set(&self, records: &[Record]) -> Vec<Record> {
        let needle = self.query.to_lowercase();
        records
            .iter()
            .filter(|record| self.matches_lowered(record, &needle))
            .cloned()
            .collect()
    }

    fn matches_lowered(&self, record: &Record, needle: &str) -> bool {
        let category_ok = self
            .category
            .map_or(true, |status| record.payment_status == status);
        category_ok && contains_ignore_case(record.search_key(), needle)
    }
}

#[cfg(test)]
mod tests {
    use super::{filter_by_query, FilterState};
    use crate::models::{Buyer, PaymentStatus};
    use crate::store::tests::record;

    fn dataset() -> Vec<crate::models::Record> {
        vec![
            record("1", "Ana", PaymentStatus::Completed, false),
            record("2", "Bea", PaymentStatus::Pending, false),
            record("3", "Mariana", PaymentStatus::Free, true),
            record("4", "ÂNGELA", PaymentStatus::Completed, true),
        ]
    }

    fn ids(records: &[crate::models::Record]) -> Vec<&str> {
        records.iter().map(|record| record.id.as_str()).collect()
    }

    #[test]
    fn empty_query_matches_everything() {
        let filter = FilterState::default();
        assert_eq!(filter.view_set(&dataset()).len(), 4);
    }

    #[test]
    fn query_is_case_insensitive_substring_on_name() {
        let mut filter = FilterState::default();
        filter.set_query("AN");
        assert_eq!(ids(&filter.view_set(&dataset())), vec!["1", "3"]);

        filter.set_query("ângela");
        assert_eq!(ids(&filter.view_set(&dataset())), vec!["4"]);
    }

    #[test]
    fn query_does_not_match_email_or_badge() {
        let mut filter = FilterState::default();
        filter.set_query("example.com");
        assert!(filter.view_set(&dataset()).is_empty());
    }

    #[test]
    fn category_toggle_is_single_select_with_deselect() {
        let mut filter = FilterState::default();
        assert_eq!(filter.toggle_category(PaymentStatus::Completed), Some(PaymentStatus::Completed));
        assert_eq!(filter.toggle_category(PaymentStatus::Free), Some(PaymentStatus::Free));
        assert_eq!(filter.toggle_category(PaymentStatus::Free), None);
        assert_eq!(filter.category(), None);
    }

    #[test]
    fn query_and_category_compose_with_and() {
        let mut filter = FilterState::default();
        filter.set_query("an");
        filter.toggle_category(PaymentStatus::Completed);
        assert_eq!(ids(&filter.view_set(&dataset())), vec!["1"]);
        assert!(filter.matches(&dataset()[0]));
        assert!(!filter.matches(&dataset()[2]));
    }

    #[test]
    fn buyers_are_searchable_by_name() {
        let buyers = vec![
            Buyer {
                user_id: "a".to_string(),
                name: "Joana".to_string(),
                email: "joana@example.com".to_string(),
            },
            Buyer {
                user_id: "b".to_string(),
                name: "Pedro".to_string(),
                email: "pedro@example.com".to_string(),
            },
        ];
        let found = filter_by_query(&buyers, "JO");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].user_id, "a");
    }
}
