use crate::http_handler::http_response::{launch::Launch, launch_page::LaunchPage};

/// A page type carrying a cursor to its successor.
pub trait Paginated {
    /// Number of the following page, `None` on the last page.
    fn next_page(&self) -> Option<u32>;
}

impl Paginated for LaunchPage {
    fn next_page(&self) -> Option<u32> { LaunchPage::next_page(self) }
}

/// All pages fetched so far for one paginated query, in fetch order.
#[derive(Debug, Clone, PartialEq)]
pub struct InfiniteData<P> {
    pages: Vec<P>,
    page_params: Vec<u32>,
}

impl<P: Paginated + Clone> InfiniteData<P> {
    /// Page number every paginated query starts with.
    pub const FIRST_PAGE: u32 = 1;

    pub fn first(page: P) -> Self {
        Self { pages: vec![page], page_params: vec![Self::FIRST_PAGE] }
    }

    pub fn pages(&self) -> &[P] { &self.pages }
    /// Page numbers the pages were requested with, parallel to [`Self::pages`].
    pub fn page_params(&self) -> &[u32] { &self.page_params }
    pub fn page_count(&self) -> usize { self.pages.len() }

    /// Cursor of the last fetched page.
    pub fn next_page_param(&self) -> Option<u32> { self.pages.last().and_then(P::next_page) }

    pub fn has_next_page(&self) -> bool { self.next_page_param().is_some() }

    /// A copy with `page` appended as page number `param`.
    #[must_use]
    pub fn with_page(&self, page: P, param: u32) -> Self {
        let mut next = self.clone();
        next.pages.push(page);
        next.page_params.push(param);
        next
    }
}

impl InfiniteData<LaunchPage> {
    /// All launches across the fetched pages, flattened in fetch order.
    pub fn launches(&self) -> impl Iterator<Item = &Launch> {
        self.pages.iter().flat_map(|page| page.docs().iter())
    }
}
