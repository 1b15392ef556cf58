// Ordenação e paginação em memória para as páginas de listagem.
// As collections são buscadas uma vez; sort + slice acontecem aqui.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::str::FromStr;

use crate::utils::AppError;
use crate::views::{JobCard, MentorCard, MentorshipCard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    SalaryAsc,
    SalaryDesc,
    Title,
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "date" => Ok(SortKey::Date),
            "salary-asc" => Ok(SortKey::SalaryAsc),
            "salary-desc" => Ok(SortKey::SalaryDesc),
            "title" => Ok(SortKey::Title),
            other => Err(AppError::InvalidRequest(format!(
                "unknown sort '{}' (expected date, salary-asc, salary-desc or title)",
                other
            ))),
        }
    }
}

/// Card fields the comparators look at
pub trait Sortable {
    fn sort_date(&self) -> Option<DateTime<Utc>>;
    fn sort_title(&self) -> &str;
    fn sort_salary(&self) -> f64 {
        0.0
    }
}

impl Sortable for JobCard {
    fn sort_date(&self) -> Option<DateTime<Utc>> {
        self.posted_at
    }
    fn sort_title(&self) -> &str {
        &self.title
    }
    fn sort_salary(&self) -> f64 {
        self.salary
    }
}

impl Sortable for MentorshipCard {
    fn sort_date(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
    fn sort_title(&self) -> &str {
        &self.title
    }
}

impl Sortable for MentorCard {
    fn sort_date(&self) -> Option<DateTime<Utc>> {
        None
    }
    fn sort_title(&self) -> &str {
        &self.name
    }
}

/// Stable sort, so ties keep the order the gateway returned.
pub fn sort_items<T: Sortable>(items: &mut [T], key: SortKey) {
    match key {
        SortKey::Date => items.sort_by(|a, b| match (a.sort_date(), b.sort_date()) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
        SortKey::SalaryAsc => items.sort_by(|a, b| a.sort_salary().total_cmp(&b.sort_salary())),
        SortKey::SalaryDesc => items.sort_by(|a, b| b.sort_salary().total_cmp(&a.sort_salary())),
        SortKey::Title => items.sort_by_cached_key(|item| item.sort_title().to_lowercase()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_next: bool,
}

/// 1-based pagination; page 0 counts as page 1 and pages past the end are empty.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);

    let start = (page - 1).saturating_mul(page_size);
    let items: Vec<T> = items.into_iter().skip(start).take(page_size).collect();

    Page {
        items,
        page,
        page_size,
        total_items,
        total_pages,
        has_next: page < total_pages,
    }
}

pub fn sort_and_paginate<T: Sortable>(
    mut items: Vec<T>,
    key: SortKey,
    page: usize,
    page_size: usize,
) -> Page<T> {
    sort_items(&mut items, key);
    paginate(items, page, page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Clone)]
    struct Card {
        title: &'static str,
        salary: f64,
        date: Option<DateTime<Utc>>,
    }

    impl Sortable for Card {
        fn sort_date(&self) -> Option<DateTime<Utc>> {
            self.date
        }
        fn sort_title(&self) -> &str {
            self.title
        }
        fn sort_salary(&self) -> f64 {
            self.salary
        }
    }

    fn card(title: &'static str, salary: f64, day: Option<u32>) -> Card {
        Card {
            title,
            salary,
            date: day.map(|d| Utc.with_ymd_and_hms(2024, 6, d, 0, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_salary_desc() {
        let mut cards = vec![card("a", 0.0, None), card("b", 50000.0, None), card("c", 20000.0, None)];
        sort_items(&mut cards, "salary-desc".parse().unwrap());
        let salaries: Vec<f64> = cards.iter().map(|c| c.salary).collect();
        assert_eq!(salaries, vec![50000.0, 20000.0, 0.0]);
    }

    #[test]
    fn test_date_newest_first_undated_last() {
        let mut cards = vec![card("old", 0.0, Some(1)), card("none", 0.0, None), card("new", 0.0, Some(20))];
        sort_items(&mut cards, SortKey::Date);
        let titles: Vec<&str> = cards.iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["new", "old", "none"]);
    }

    #[test]
    fn test_title_is_case_insensitive() {
        let mut cards = vec![card("beta", 0.0, None), card("Alpha", 0.0, None), card("gamma", 0.0, None)];
        sort_items(&mut cards, SortKey::Title);
        let titles: Vec<&str> = cards.iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_unknown_sort_rejected() {
        assert!(matches!("price".parse::<SortKey>(), Err(AppError::InvalidRequest(_))));
        assert_eq!("".parse::<SortKey>().unwrap(), SortKey::Date);
    }

    #[test]
    fn test_pages_of_thirteen() {
        let items: Vec<u32> = (1..=13).collect();
        let sizes: Vec<usize> = (1..=3).map(|p| paginate(items.clone(), p, 6).items.len()).collect();
        assert_eq!(sizes, vec![6, 6, 1]);

        let last = paginate(items.clone(), 3, 6);
        assert_eq!(last.total_pages, 3);
        assert!(!last.has_next);
        assert_eq!(last.items, vec![13]);

        assert_eq!(paginate(items.clone(), 0, 6).page, 1);
        assert!(paginate(items, 9, 6).items.is_empty());
    }
}
