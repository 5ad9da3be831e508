use crate::core::CatalogEntry;
use std::collections::BTreeSet;

pub const DEFAULT_PAGE_SIZE: usize = 9;

/// Member filter value that selects every member.
pub const ALL_MEMBERS: &str = "todos";

/// Search and member filter over a fetched catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub member: Option<String>,
}

impl CatalogQuery {
    pub fn new(search: Option<String>, member: Option<String>) -> Self {
        Self { search, member }
    }

    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        self.matches_search(entry) && self.matches_member(entry)
    }

    fn matches_search(&self, entry: &CatalogEntry) -> bool {
        let term = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => term.to_lowercase(),
            _ => return true,
        };

        [&entry.service_code, &entry.descripcion, &entry.member_name]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }

    fn matches_member(&self, entry: &CatalogEntry) -> bool {
        match self.member.as_deref() {
            None | Some(ALL_MEMBERS) => true,
            Some(member) => entry.member_name == member,
        }
    }

    /// Matching entries, in catalog order.
    pub fn apply<'a>(&self, entries: &'a [CatalogEntry]) -> Vec<&'a CatalogEntry> {
        entries.iter().filter(|entry| self.matches(entry)).collect()
    }
}

/// Distinct member names, sorted.
pub fn member_names(entries: &[CatalogEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| entry.member_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn published_count(entries: &[CatalogEntry]) -> usize {
    entries.iter().filter(|entry| entry.is_published()).count()
}

pub fn find_by_id(entries: &[CatalogEntry], id: i64) -> Option<&CatalogEntry> {
    entries.iter().find(|entry| entry.id_servicio == id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page number after clamping.
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// 1-based position of the first item shown, 0 when there are none.
    pub first_shown: usize,
    pub last_shown: usize,
}

/// Slice out one page. There is always at least one page and `page` is
/// clamped into `1..=total_pages`.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let number = page.clamp(1, total_pages);

    let start = ((number - 1) * page_size).min(total_items);
    let end = (number * page_size).min(total_items);

    Page {
        items: &items[start..end],
        number,
        total_pages,
        total_items,
        first_shown: if start < end { start + 1 } else { 0 },
        last_shown: end,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Gap,
}

/// First page, last page, the current page and its neighbours, with a gap
/// marker wherever numbers are skipped.
pub fn page_window(current: usize, total: usize) -> Vec<PageMarker> {
    let mut markers = Vec::new();
    let mut previous: Option<usize> = None;

    for page in 1..=total {
        if page != 1 && page != total && page.abs_diff(current) > 1 {
            continue;
        }
        if let Some(prev) = previous {
            if page - prev > 1 {
                markers.push(PageMarker::Gap);
            }
        }
        markers.push(PageMarker::Page(page));
        previous = Some(page);
    }

    markers
}
