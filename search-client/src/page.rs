use serde::Deserialize;

/// One page of search results as seen by the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    /// Result titles in the order the backend returned them.
    pub items: Vec<String>,
    /// Total number of matches the backend reports for the query, if known.
    pub total_hits: Option<u64>,
}

impl SearchPage {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items,
            total_hits: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Wire shape of a `search.json` response.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
    #[serde(rename = "numFound", default)]
    num_found: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    #[serde(default)]
    title: Option<String>,
}

impl From<SearchResponse> for SearchPage {
    fn from(response: SearchResponse) -> Self {
        let items = response
            .docs
            .into_iter()
            .filter_map(|doc| doc.title)
            .collect();
        Self {
            items,
            total_hits: response.num_found,
        }
    }
}
