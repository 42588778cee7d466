//! Knowledge-base orchestration
//!
//! Every article write keeps the article row and its single embedding
//! chunk consistent: create and import embed title plus content, update
//! replaces the chunk with one embedded from the new content, and
//! deletion removes embedding rows before the article row so no
//! embedding is left pointing at a missing article.

use tracing::info;
use uuid::Uuid;

use crate::ai::EmbeddingGateway;
use crate::db::{ArticleStore, EmbeddingStore};
use crate::domain::{KnowledgeArticle, KnowledgeEmbedding, SourceType};
use crate::note::{NoteArticleSummary, NoteScraper};
use crate::types::{AppError, AppResult};

pub struct CreateArticleInput {
    pub title: String,
    pub content: String,
    pub source_type: SourceType,
    pub source_url: Option<String>,
    pub created_by: Uuid,
}

pub async fn create_article(
    articles: &dyn ArticleStore,
    chunks: &dyn EmbeddingStore,
    embeddings: &dyn EmbeddingGateway,
    input: CreateArticleInput,
) -> AppResult<KnowledgeArticle> {
    let article = KnowledgeArticle::create(
        Uuid::new_v4(),
        &input.title,
        &input.content,
        input.source_type,
        input.source_url,
        input.created_by,
    )?;

    articles.save(&article).await?;
    save_embedding_chunk(
        chunks,
        embeddings,
        article.id,
        format!("{}\n{}", article.title, article.content),
    )
    .await?;

    info!(article_id = %article.id, source_type = %article.source_type, "Knowledge article created");
    Ok(article)
}

pub async fn update_article(
    articles: &dyn ArticleStore,
    chunks: &dyn EmbeddingStore,
    embeddings: &dyn EmbeddingGateway,
    id: Uuid,
    title: &str,
    content: &str,
) -> AppResult<KnowledgeArticle> {
    let existing = articles
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("KnowledgeArticle not found: {id}")))?;

    let updated = existing.update(title, content)?;
    articles.save(&updated).await?;

    chunks.delete_by_article(updated.id).await?;
    save_embedding_chunk(chunks, embeddings, updated.id, updated.content.clone()).await?;

    info!(article_id = %updated.id, "Knowledge article updated");
    Ok(updated)
}

pub async fn delete_article(
    articles: &dyn ArticleStore,
    chunks: &dyn EmbeddingStore,
    id: Uuid,
) -> AppResult<()> {
    let existing = articles.find_by_id(id).await?;
    if existing.is_none() {
        return Err(AppError::NotFound(format!("KnowledgeArticle not found: {id}")));
    }

    // Embeddings reference the article; remove them first.
    chunks.delete_by_article(id).await?;
    articles.delete(id).await?;

    info!(article_id = %id, "Knowledge article deleted");
    Ok(())
}

pub async fn list_articles(articles: &dyn ArticleStore) -> AppResult<Vec<KnowledgeArticle>> {
    Ok(articles.list().await?)
}

pub async fn fetch_note_article_list(
    scraper: &dyn NoteScraper,
    account: &str,
) -> AppResult<Vec<NoteArticleSummary>> {
    Ok(scraper.fetch_article_list(account).await?)
}

/// Scrape and store the selected note articles one by one. The first
/// failure aborts the remainder; already-imported articles stay.
pub async fn import_note_articles(
    articles: &dyn ArticleStore,
    chunks: &dyn EmbeddingStore,
    scraper: &dyn NoteScraper,
    embeddings: &dyn EmbeddingGateway,
    urls: &[String],
    created_by: Uuid,
) -> AppResult<Vec<KnowledgeArticle>> {
    let mut imported = Vec::with_capacity(urls.len());

    for url in urls {
        let scraped = scraper.fetch_article_content(url).await?;

        let article = KnowledgeArticle::create(
            Uuid::new_v4(),
            &scraped.title,
            &scraped.content,
            SourceType::Note,
            Some(url.clone()),
            created_by,
        )?;

        articles.save(&article).await?;
        save_embedding_chunk(
            chunks,
            embeddings,
            article.id,
            format!("{}\n{}", article.title, article.content),
        )
        .await?;

        info!(article_id = %article.id, %url, "Note article imported");
        imported.push(article);
    }

    Ok(imported)
}

pub async fn search(
    chunks: &dyn EmbeddingStore,
    embeddings: &dyn EmbeddingGateway,
    query: &str,
    limit: i64,
) -> AppResult<Vec<KnowledgeEmbedding>> {
    if query.trim().is_empty() {
        return Err(AppError::InvalidRequest("Query cannot be empty".to_string()));
    }
    if limit < 1 {
        return Err(AppError::InvalidRequest("Limit must be at least 1".to_string()));
    }

    let vector = embeddings.generate_embedding(query).await?;
    Ok(chunks.search_similar(&vector, limit).await?)
}

async fn save_embedding_chunk(
    chunks: &dyn EmbeddingStore,
    embeddings: &dyn EmbeddingGateway,
    article_id: Uuid,
    chunk_text: String,
) -> AppResult<()> {
    let vector = embeddings.generate_embedding(&chunk_text).await?;

    let embedding =
        KnowledgeEmbedding::create(Uuid::new_v4(), article_id, 0, chunk_text, vector)?;
    chunks.save_many(&[embedding]).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::ai::EmbeddingError;
    use crate::note::{ScrapeError, ScrapedArticle};

    /// In-memory article and embedding storage that records the order
    /// of write operations.
    #[derive(Default)]
    struct FakeStore {
        log: Mutex<Vec<&'static str>>,
        articles: Mutex<Vec<KnowledgeArticle>>,
        chunks: Mutex<Vec<KnowledgeEmbedding>>,
    }

    impl FakeStore {
        fn take_log(&self) -> Vec<&'static str> {
            std::mem::take(&mut *self.log.lock().unwrap())
        }
    }

    #[async_trait]
    impl ArticleStore for FakeStore {
        async fn save(&self, article: &KnowledgeArticle) -> Result<(), sqlx::Error> {
            self.log.lock().unwrap().push("save_article");
            let mut articles = self.articles.lock().unwrap();
            articles.retain(|a| a.id != article.id);
            articles.push(article.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<KnowledgeArticle>, sqlx::Error> {
            Ok(self.articles.lock().unwrap().iter().find(|a| a.id == id).cloned())
        }

        async fn list(&self) -> Result<Vec<KnowledgeArticle>, sqlx::Error> {
            Ok(self.articles.lock().unwrap().clone())
        }

        async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
            self.log.lock().unwrap().push("delete_article");
            self.articles.lock().unwrap().retain(|a| a.id != id);
            Ok(())
        }
    }

    #[async_trait]
    impl EmbeddingStore for FakeStore {
        async fn save_many(&self, embeddings: &[KnowledgeEmbedding]) -> Result<(), sqlx::Error> {
            self.log.lock().unwrap().push("save_embeddings");
            self.chunks.lock().unwrap().extend_from_slice(embeddings);
            Ok(())
        }

        async fn delete_by_article(&self, article_id: Uuid) -> Result<(), sqlx::Error> {
            self.log.lock().unwrap().push("delete_embeddings");
            self.chunks
                .lock()
                .unwrap()
                .retain(|c| c.knowledge_article_id != article_id);
            Ok(())
        }

        async fn search_similar(
            &self,
            _embedding: &[f32],
            limit: i64,
        ) -> Result<Vec<KnowledgeEmbedding>, sqlx::Error> {
            let chunks = self.chunks.lock().unwrap();
            Ok(chunks.iter().take(limit as usize).cloned().collect())
        }
    }

    /// Fixed-vector gateway that records what it was asked to embed.
    #[derive(Default)]
    struct FakeEmbeddings {
        inputs: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EmbeddingGateway for FakeEmbeddings {
        async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            self.inputs.lock().unwrap().push(text.to_string());
            Ok(vec![0.1, 0.2, 0.3])
        }
    }

    /// Scraper that fails on one configured URL.
    struct FakeScraper {
        fail_on: Option<String>,
    }

    #[async_trait]
    impl NoteScraper for FakeScraper {
        async fn fetch_article_list(
            &self,
            _account: &str,
        ) -> Result<Vec<NoteArticleSummary>, ScrapeError> {
            Ok(vec![])
        }

        async fn fetch_article_content(&self, url: &str) -> Result<ScrapedArticle, ScrapeError> {
            if self.fail_on.as_deref() == Some(url) {
                return Err(ScrapeError::Status { url: url.to_string(), status: 500 });
            }
            Ok(ScrapedArticle {
                title: format!("記事 {url}"),
                content: "本文テキスト".to_string(),
            })
        }
    }

    fn manual_input(title: &str, content: &str) -> CreateArticleInput {
        CreateArticleInput {
            title: title.to_string(),
            content: content.to_string(),
            source_type: SourceType::Manual,
            source_url: None,
            created_by: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn create_article_writes_one_chunk_embedded_from_title_and_content() {
        let store = FakeStore::default();
        let embeddings = FakeEmbeddings::default();

        let article = create_article(&store, &store, &embeddings, manual_input("タイトル", "本文"))
            .await
            .unwrap();

        let chunks = store.chunks.lock().unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].knowledge_article_id, article.id);
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[0].chunk_text, "タイトル\n本文");
        assert_eq!(
            *embeddings.inputs.lock().unwrap(),
            vec!["タイトル\n本文".to_string()]
        );
    }

    #[tokio::test]
    async fn update_article_replaces_chunks_and_embeds_content_only() {
        let store = FakeStore::default();
        let embeddings = FakeEmbeddings::default();
        let article = create_article(&store, &store, &embeddings, manual_input("旧タイトル", "旧本文"))
            .await
            .unwrap();
        store.take_log();

        let updated = update_article(&store, &store, &embeddings, article.id, "新タイトル", "新本文")
            .await
            .unwrap();

        assert_eq!(updated.title, "新タイトル");
        assert_eq!(
            store.take_log(),
            vec!["save_article", "delete_embeddings", "save_embeddings"]
        );
        let chunks = store.chunks.lock().unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chunk_text, "新本文");
        assert_eq!(embeddings.inputs.lock().unwrap().last().unwrap(), "新本文");
    }

    #[tokio::test]
    async fn update_article_returns_not_found_for_unknown_id() {
        let store = FakeStore::default();
        let embeddings = FakeEmbeddings::default();

        let err = update_article(&store, &store, &embeddings, Uuid::new_v4(), "t", "c")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(store.take_log().is_empty());
    }

    #[tokio::test]
    async fn delete_article_removes_embeddings_before_the_article() {
        let store = FakeStore::default();
        let embeddings = FakeEmbeddings::default();
        let article = create_article(&store, &store, &embeddings, manual_input("タイトル", "本文"))
            .await
            .unwrap();
        store.take_log();

        delete_article(&store, &store, article.id).await.unwrap();

        assert_eq!(store.take_log(), vec!["delete_embeddings", "delete_article"]);
        assert!(store.articles.lock().unwrap().is_empty());
        assert!(store.chunks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_article_returns_not_found_for_unknown_id() {
        let store = FakeStore::default();

        let err = delete_article(&store, &store, Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(store.take_log().is_empty());
    }

    #[tokio::test]
    async fn import_stores_every_scraped_article_with_its_chunk() {
        let store = FakeStore::default();
        let embeddings = FakeEmbeddings::default();
        let scraper = FakeScraper { fail_on: None };
        let urls = vec![
            "https://note.com/u/n/n001".to_string(),
            "https://note.com/u/n/n002".to_string(),
        ];

        let imported = import_note_articles(
            &store,
            &store,
            &scraper,
            &embeddings,
            &urls,
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].source_type, SourceType::Note);
        assert_eq!(imported[0].source_url.as_deref(), Some("https://note.com/u/n/n001"));
        assert_eq!(store.articles.lock().unwrap().len(), 2);
        assert_eq!(store.chunks.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn import_aborts_on_first_failure_keeping_prior_imports() {
        let store = FakeStore::default();
        let embeddings = FakeEmbeddings::default();
        let scraper = FakeScraper {
            fail_on: Some("https://note.com/u/n/n002".to_string()),
        };
        let urls = vec![
            "https://note.com/u/n/n001".to_string(),
            "https://note.com/u/n/n002".to_string(),
            "https://note.com/u/n/n003".to_string(),
        ];

        let err = import_note_articles(
            &store,
            &store,
            &scraper,
            &embeddings,
            &urls,
            Uuid::new_v4(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Scrape(_)));
        let articles = store.articles.lock().unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].source_url.as_deref(), Some("https://note.com/u/n/n001"));
        assert_eq!(store.chunks.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn search_returns_nearest_chunks() {
        let store = FakeStore::default();
        let embeddings = FakeEmbeddings::default();
        create_article(&store, &store, &embeddings, manual_input("タイトル", "本文"))
            .await
            .unwrap();

        let hits = search(&store, &embeddings, "検索クエリ", 5).await.unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].chunk_text, "タイトル\n本文");
    }

    #[tokio::test]
    async fn search_rejects_a_blank_query() {
        let store = FakeStore::default();
        let embeddings = FakeEmbeddings::default();

        let err = search(&store, &embeddings, "   ", 5).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidRequest(_)));
        assert!(embeddings.inputs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_rejects_a_non_positive_limit() {
        let store = FakeStore::default();
        let embeddings = FakeEmbeddings::default();

        for limit in [0, -1] {
            let err = search(&store, &embeddings, "クエリ", limit).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidRequest(_)));
        }
        assert!(embeddings.inputs.lock().unwrap().is_empty());
    }
}
