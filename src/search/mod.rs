//! Tantivy-based search index module.
//!
//! Provides full-text search over published terms with field boosting.

use std::path::Path;
use std::sync::Arc;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, BoostQuery, Occur, QueryParser};
use tantivy::schema::{Field, Schema, Value, STORED, STRING, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::Term;

/// Field boost values.
const BOOST_TITLE_KO: f32 = 10.0;
const BOOST_TITLE_EN: f32 = 10.0;
const BOOST_KEYWORDS: f32 = 8.5;
const BOOST_SHORT: f32 = 6.0;
const BOOST_TAGS: f32 = 4.0;
const BOOST_FULL: f32 = 3.0;

/// Search result with term id and relevance score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub term_id: i64,
    pub score: f32,
}

/// Search index schema fields.
struct SearchFields {
    term_id: Field,
    title_ko: Field,
    title_en: Field,
    keywords: Field,
    short: Field,
    full: Field,
    tags: Field,
}

/// Tantivy search index for terms.
pub struct SearchIndex {
    index: Index,
    reader: IndexReader,
    writer: Arc<RwLock<IndexWriter>>,
    fields: SearchFields,
}

impl SearchIndex {
    /// Create or open a search index at the specified path.
    pub fn open(index_path: &Path) -> Result<Self, AppError> {
        std::fs::create_dir_all(index_path)
            .map_err(|e| AppError::Search(format!("Failed to create index directory: {}", e)))?;

        let mut schema_builder = Schema::builder();
        let term_id = schema_builder.add_text_field("term_id", STRING | STORED);
        let title_ko = schema_builder.add_text_field("title_ko", TEXT);
        let title_en = schema_builder.add_text_field("title_en", TEXT);
        let keywords = schema_builder.add_text_field("keywords", TEXT);
        let short = schema_builder.add_text_field("short", TEXT);
        let full = schema_builder.add_text_field("full", TEXT);
        let tags = schema_builder.add_text_field("tags", TEXT);
        let schema = schema_builder.build();

        let fields = SearchFields {
            term_id,
            title_ko,
            title_en,
            keywords,
            short,
            full,
            tags,
        };

        // Try to open existing index or create new one
        let index = Index::open_in_dir(index_path)
            .or_else(|_| Index::create_in_dir(index_path, schema.clone()))
            .map_err(|e| AppError::Search(format!("Failed to open/create index: {}", e)))?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .map_err(|e| AppError::Search(format!("Failed to create reader: {}", e)))?;

        let writer = index
            .writer(50_000_000) // 50MB buffer
            .map_err(|e| AppError::Search(format!("Failed to create writer: {}", e)))?;

        Ok(Self {
            index,
            reader,
            writer: Arc::new(RwLock::new(writer)),
            fields,
        })
    }

    /// Rebuild the entire index from terms.
    pub async fn rebuild(&self, terms: &[Term]) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        writer.delete_all_documents()?;
        for term in terms {
            writer.add_document(self.create_document(term))?;
        }
        writer.commit()?;

        self.reader.reload()?;

        tracing::info!("Search index rebuilt with {} terms", terms.len());
        Ok(())
    }

    /// Search for terms matching the query.
    pub fn search(
        &self,
        query_str: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SearchResult>, AppError> {
        if query_str.trim().is_empty() {
            return Ok(Vec::new());
        }

        let searcher = self.reader.searcher();

        let field_queries = [
            (self.fields.title_ko, BOOST_TITLE_KO),
            (self.fields.title_en, BOOST_TITLE_EN),
            (self.fields.keywords, BOOST_KEYWORDS),
            (self.fields.short, BOOST_SHORT),
            (self.fields.tags, BOOST_TAGS),
            (self.fields.full, BOOST_FULL),
        ];

        let mut subqueries: Vec<(Occur, Box<dyn tantivy::query::Query>)> = Vec::new();
        for (field, boost) in field_queries {
            let mut parser = QueryParser::for_index(&self.index, vec![field]);
            parser.set_conjunction_by_default();
            let (field_query, _errors) = parser.parse_query_lenient(query_str);
            subqueries.push((Occur::Should, Box::new(BoostQuery::new(field_query, boost))));
        }
        let combined_query = BooleanQuery::new(subqueries);

        let top_docs = searcher
            .search(&combined_query, &TopDocs::with_limit(limit + offset))
            .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;

        let results: Vec<SearchResult> = top_docs
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|(score, doc_address)| {
                let doc: TantivyDocument = searcher.doc(doc_address).ok()?;
                let term_id = doc.get_first(self.fields.term_id)?.as_str()?.parse().ok()?;
                Some(SearchResult { term_id, score })
            })
            .collect();

        Ok(results)
    }

    /// Create a Tantivy document from a term.
    fn create_document(&self, term: &Term) -> TantivyDocument {
        let tag_names: Vec<&str> = term.tags.iter().map(|t| t.name.as_str()).collect();

        doc!(
            self.fields.term_id => term.id.to_string(),
            self.fields.title_ko => term.title.ko.clone(),
            self.fields.title_en => term.title.en.clone().unwrap_or_default(),
            self.fields.keywords => term.title.etc.join(" "),
            self.fields.short => term.description.short.clone(),
            self.fields.full => term.description.full.clone(),
            self.fields.tags => tag_names.join(" ")
        )
    }
}
