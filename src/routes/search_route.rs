use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    dal::website_store::WebsiteStore,
    domain::keyword::KeywordSet,
    services::{ProductScraper, SearchError, SearchResults},
};

#[derive(Deserialize)]
pub struct SearchBody {
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Serialize)]
struct SearchResponse {
    success: bool,
    #[serde(flatten)]
    results: SearchResults,
}

#[post("/search")]
pub async fn search(
    body: web::Json<SearchBody>,
    store: web::Data<WebsiteStore>,
    scraper: web::Data<ProductScraper>,
) -> HttpResponse {
    let keywords = KeywordSet::new(&body.keywords);

    match run_search(keywords, &store, &scraper).await {
        Ok(results) => HttpResponse::Ok().json(SearchResponse {
            success: true,
            results,
        }),
        Err(e) => search_error(e),
    }
}

async fn run_search(
    keywords: KeywordSet,
    store: &WebsiteStore,
    scraper: &ProductScraper,
) -> Result<SearchResults, SearchError> {
    if keywords.is_empty() {
        return Err(SearchError::NoKeywords);
    }

    let sources: Vec<String> = store.list().await?.into_iter().map(|w| w.url).collect();
    scraper.search(keywords, sources).await
}

fn search_error(e: SearchError) -> HttpResponse {
    let body = json!({ "error": e.to_string() });
    match e {
        SearchError::NoKeywords | SearchError::NoSources => HttpResponse::BadRequest().json(body),
        SearchError::Store(_) => {
            log::error!("Failed to load websites: {:?}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}
