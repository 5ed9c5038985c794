use crate::builder::Indexer;
use crate::index::PostingList;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: u32,
}

/// A ranked document with the count of every matched query term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub document: String,
    pub score: u64,
    pub counts: Vec<TermCount>,
}

impl SearchHit {
    pub fn count(&self, term: &str) -> Option<u32> {
        self.counts.iter().find(|c| c.term == term).map(|c| c.count)
    }
}

impl Indexer {
    /// Documents ranked by the summed counts of the query's distinct terms.
    /// Terms never indexed are ignored; zero-score documents are dropped;
    /// equal scores keep ingestion order.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let matched: Vec<(String, &PostingList)> = self
            .analyzer
            .unique_terms(query)
            .into_iter()
            .filter_map(|term| self.index.postings(&term).map(|plist| (term, plist)))
            .collect();
        if matched.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit> = self
            .documents
            .iter()
            .filter_map(|(doc, key)| {
                let counts: Vec<TermCount> = matched
                    .iter()
                    .map(|(term, plist)| TermCount { term: term.clone(), count: plist.count(doc) })
                    .collect();
                let score: u64 = counts.iter().map(|c| u64::from(c.count)).sum();
                (score > 0).then(|| SearchHit { document: key.to_owned(), score, counts })
            })
            .collect();
        // stable sort: ties stay in ingestion order
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        hits
    }

    pub fn search_keys(&self, query: &str) -> Vec<String> {
        self.search(query).into_iter().map(|hit| hit.document).collect()
    }
}
