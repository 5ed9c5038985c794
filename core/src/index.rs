use std::collections::HashMap;

/// Position of a document in ingestion order; doubles as the tie-break key.
pub type DocId = u32;

/// Occurrence counts of one term, keyed by document.
#[derive(Debug, Clone, Default)]
pub struct PostingList {
    counts: HashMap<DocId, u32>,
}

impl PostingList {
    /// Occurrences in `doc`; 0 when the document never contained the term.
    pub fn count(&self, doc: DocId) -> u32 { self.counts.get(&doc).copied().unwrap_or(0) }

    pub fn iter(&self) -> impl Iterator<Item = (DocId, u32)> + '_ {
        self.counts.iter().map(|(d, c)| (*d, *c))
    }

    /// Number of documents containing the term.
    pub fn len(&self) -> usize { self.counts.len() }

    pub fn is_empty(&self) -> bool { self.counts.is_empty() }
}

#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, PostingList>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    pub fn add_occurrence(&mut self, term: &str, doc: DocId) {
        if let Some(plist) = self.postings.get_mut(term) {
            *plist.counts.entry(doc).or_insert(0) += 1;
            return;
        }
        let mut plist = PostingList::default();
        plist.counts.insert(doc, 1);
        self.postings.insert(term.to_owned(), plist);
    }

    /// `None` means the term never occurred during the build.
    pub fn postings(&self, term: &str) -> Option<&PostingList> { self.postings.get(term) }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ { self.postings.keys().map(String::as_str) }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn clear(&mut self) { self.postings.clear(); }
}

/// Document keys in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct DocumentSet {
    keys: Vec<String>,
    ids: HashMap<String, DocId>,
}

impl DocumentSet {
    pub fn new() -> Self { Self::default() }

    /// Id of `key`, registering it at the end if unseen.
    pub fn insert(&mut self, key: &str) -> DocId {
        if let Some(&id) = self.ids.get(key) {
            return id;
        }
        let id = self.keys.len() as DocId;
        self.keys.push(key.to_owned());
        self.ids.insert(key.to_owned(), id);
        id
    }

    pub fn id(&self, key: &str) -> Option<DocId> { self.ids.get(key).copied() }

    pub fn key(&self, id: DocId) -> Option<&str> { self.keys.get(id as usize).map(String::as_str) }

    pub fn contains(&self, key: &str) -> bool { self.ids.contains_key(key) }

    /// Ids and keys in ingestion order.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, &str)> + '_ {
        self.keys.iter().enumerate().map(|(i, k)| (i as DocId, k.as_str()))
    }

    pub fn len(&self) -> usize { self.keys.len() }

    pub fn is_empty(&self) -> bool { self.keys.is_empty() }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_accumulate_per_document() {
        let mut index = InvertedIndex::new();
        index.add_occurrence("ana", 0);
        index.add_occurrence("ana", 1);
        index.add_occurrence("ana", 1);
        let plist = index.postings("ana").unwrap();
        assert_eq!(plist.count(0), 1);
        assert_eq!(plist.count(1), 2);
        assert_eq!(plist.count(7), 0);
        assert_eq!(plist.len(), 2);
    }

    #[test]
    fn unknown_term_is_absent() {
        let mut index = InvertedIndex::new();
        index.add_occurrence("mere", 0);
        assert!(index.postings("pere").is_none());
        index.clear();
        assert!(index.postings("mere").is_none());
        assert_eq!(index.num_terms(), 0);
    }

    #[test]
    fn document_set_keeps_first_seen_order() {
        let mut docs = DocumentSet::new();
        assert_eq!(docs.insert("b.txt"), 0);
        assert_eq!(docs.insert("a.txt"), 1);
        assert_eq!(docs.insert("b.txt"), 0);
        let keys: Vec<&str> = docs.iter().map(|(_, k)| k).collect();
        assert_eq!(keys, vec!["b.txt", "a.txt"]);
        assert_eq!(docs.key(1), Some("a.txt"));
        assert_eq!(docs.id("c.txt"), None);
    }
}
