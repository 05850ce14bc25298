use serde::Serialize;
use tracing::trace;

/// Where the user is in a paginated listing, and which neighbouring pages exist.
///
/// `current` is always the page that was requested. The other fields are only
/// set when the API's `Link` header advertised that page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageDescriptor {
    pub current: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<u32>,
}

/// A pagination control the user can activate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTarget {
    First,
    Prev,
    Next,
    Last,
    Page(u32),
}

impl PageDescriptor {
    pub fn new(current: u32) -> Self {
        Self {
            current,
            ..Default::default()
        }
    }

    /// Page to fetch for `target`, or `None` when that control isn't offered.
    pub fn resolve(&self, target: PageTarget) -> Option<u32> {
        match target {
            PageTarget::First => self.first,
            PageTarget::Prev => self.prev,
            PageTarget::Next => self.next,
            PageTarget::Last => self.last,
            PageTarget::Page(0) => None,
            PageTarget::Page(page) => Some(page),
        }
    }

    fn set(&mut self, relation: Relation, page: u32) {
        match relation {
            Relation::First => self.first = Some(page),
            Relation::Prev => self.prev = Some(page),
            Relation::Next => self.next = Some(page),
            Relation::Last => self.last = Some(page),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    First,
    Prev,
    Next,
    Last,
}

impl Relation {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "first" => Some(Relation::First),
            "prev" | "previous" => Some(Relation::Prev),
            "next" => Some(Relation::Next),
            "last" => Some(Relation::Last),
            _ => None,
        }
    }
}

/// Parse a GitHub `Link` header into a [`PageDescriptor`] for `current`.
///
/// The header looks like:
///
/// ```text
/// <https://api.github.com/search/repositories?q=octo&page=2>; rel="next",
/// <https://api.github.com/search/repositories?q=octo&page=5>; rel="last"
/// ```
///
/// Entries without a recognised `rel` or without a `page` query parameter are
/// skipped. If a relation appears twice, the later entry wins. Never fails:
/// an empty or garbled header yields a descriptor holding only `current`.
pub fn parse_link_header(header: &str, current: u32) -> PageDescriptor {
    let mut descriptor = PageDescriptor::new(current);

    for fragment in header.split(',') {
        match parse_fragment(fragment) {
            Some((relations, page)) => {
                for relation in relations {
                    descriptor.set(relation, page);
                }
            }
            None => trace!(fragment = fragment.trim(), "skipping link entry"),
        }
    }

    descriptor
}

fn parse_fragment(fragment: &str) -> Option<(Vec<Relation>, u32)> {
    let mut params = fragment.split(';');
    let target = params
        .next()?
        .trim()
        .strip_prefix('<')?
        .strip_suffix('>')?;
    let page = page_number(target)?;

    let relations: Vec<Relation> = params
        .filter_map(|param| {
            let (key, value) = param.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("rel")
                .then(|| value.trim().trim_matches('"'))
        })
        .flat_map(|value| value.split_whitespace())
        .filter_map(Relation::from_keyword)
        .collect();

    if relations.is_empty() {
        return None;
    }
    Some((relations, page))
}

/// Trailing `page=N` query parameter of a link target.
fn page_number(target: &str) -> Option<u32> {
    reqwest::Url::parse(target)
        .ok()?
        .query_pairs()
        .filter(|(key, _)| key == "page")
        .filter_map(|(_, value)| value.parse::<u32>().ok())
        .last()
        .filter(|page| *page > 0)
}
