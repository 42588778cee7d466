use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use uuid::Uuid;

use crate::db::{KnowledgeArticleRepo, KnowledgeEmbeddingRepo};
use crate::domain::SourceType;
use crate::knowledge::{self, CreateArticleInput};
use crate::middleware::AuthUser;
use crate::models::{
    AppState, ArticleResponse, CreateArticleRequest, ImportNoteArticlesRequest,
    NoteArticleSummaryResponse, SearchHitResponse, SearchKnowledgeRequest, UpdateArticleRequest,
};
use crate::types::AppResult;

const DEFAULT_SEARCH_LIMIT: i64 = 5;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/knowledge", get(list_articles).post(create_article))
        .route("/api/knowledge/{id}", put(update_article).delete(delete_article))
        .route("/api/knowledge/note/{account}", get(list_note_articles))
        .route("/api/knowledge/import", post(import_note_articles))
        .route("/api/knowledge/search", post(search_knowledge))
        .with_state(state)
}

async fn list_articles(State(state): State<AppState>) -> AppResult<Json<Vec<ArticleResponse>>> {
    let articles = KnowledgeArticleRepo::new(state.pool.clone());
    let articles = knowledge::list_articles(&articles).await?;
    Ok(Json(articles.into_iter().map(ArticleResponse::from).collect()))
}

async fn create_article(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateArticleRequest>,
) -> AppResult<(StatusCode, Json<ArticleResponse>)> {
    let articles = KnowledgeArticleRepo::new(state.pool.clone());
    let chunks = KnowledgeEmbeddingRepo::new(state.pool.clone());

    let article = knowledge::create_article(
        &articles,
        &chunks,
        state.embeddings.as_ref(),
        CreateArticleInput {
            title: request.title,
            content: request.content,
            source_type: SourceType::Manual,
            source_url: request.source_url,
            created_by: user.id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(article.into())))
}

async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateArticleRequest>,
) -> AppResult<Json<ArticleResponse>> {
    let articles = KnowledgeArticleRepo::new(state.pool.clone());
    let chunks = KnowledgeEmbeddingRepo::new(state.pool.clone());

    let article = knowledge::update_article(
        &articles,
        &chunks,
        state.embeddings.as_ref(),
        id,
        &request.title,
        &request.content,
    )
    .await?;

    Ok(Json(article.into()))
}

async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let articles = KnowledgeArticleRepo::new(state.pool.clone());
    let chunks = KnowledgeEmbeddingRepo::new(state.pool.clone());

    knowledge::delete_article(&articles, &chunks, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_note_articles(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> AppResult<Json<Vec<NoteArticleSummaryResponse>>> {
    let summaries = knowledge::fetch_note_article_list(state.scraper.as_ref(), &account).await?;
    Ok(Json(
        summaries
            .into_iter()
            .map(NoteArticleSummaryResponse::from)
            .collect(),
    ))
}

async fn import_note_articles(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<ImportNoteArticlesRequest>,
) -> AppResult<(StatusCode, Json<Vec<ArticleResponse>>)> {
    let articles = KnowledgeArticleRepo::new(state.pool.clone());
    let chunks = KnowledgeEmbeddingRepo::new(state.pool.clone());

    let imported = knowledge::import_note_articles(
        &articles,
        &chunks,
        state.scraper.as_ref(),
        state.embeddings.as_ref(),
        &request.urls,
        user.id,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(imported.into_iter().map(ArticleResponse::from).collect()),
    ))
}

async fn search_knowledge(
    State(state): State<AppState>,
    Json(request): Json<SearchKnowledgeRequest>,
) -> AppResult<Json<Vec<SearchHitResponse>>> {
    let chunks = KnowledgeEmbeddingRepo::new(state.pool.clone());

    let hits = knowledge::search(
        &chunks,
        state.embeddings.as_ref(),
        &request.query,
        request.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
    )
    .await?;

    Ok(Json(hits.into_iter().map(SearchHitResponse::from).collect()))
}
