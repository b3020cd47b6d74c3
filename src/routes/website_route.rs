use actix_web::{delete, get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::dal::website_store::{StoreError, WebsiteStore};

#[derive(Deserialize)]
pub struct AddWebsiteBody {
    #[serde(default)]
    url: String,
}

#[get("/websites")]
pub async fn get_websites(store: web::Data<WebsiteStore>) -> HttpResponse {
    match store.list().await {
        Ok(websites) => HttpResponse::Ok().json(json!({ "websites": websites })),
        Err(e) => store_error(e),
    }
}

#[post("/websites")]
pub async fn add_website(
    store: web::Data<WebsiteStore>,
    body: web::Json<AddWebsiteBody>,
) -> HttpResponse {
    match store.add(&body.url).await {
        Ok(website) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": format!("Added {}", website.url),
        })),
        Err(e) => store_error(e),
    }
}

#[delete("/websites/{index}")]
pub async fn remove_website(
    store: web::Data<WebsiteStore>,
    index: web::Path<usize>,
) -> HttpResponse {
    match store.remove(index.into_inner()).await {
        Ok(website) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": format!("Removed {}", website.url),
        })),
        Err(e) => store_error(e),
    }
}

fn store_error(e: StoreError) -> HttpResponse {
    let body = json!({ "error": e.to_string() });
    match e {
        StoreError::EmptyUrl | StoreError::InvalidUrl(_) | StoreError::Duplicate(_) => {
            HttpResponse::BadRequest().json(body)
        }
        StoreError::NotFound(_) => HttpResponse::NotFound().json(body),
        StoreError::Io(_) | StoreError::Json(_) => {
            log::error!("Website store failed: {:?}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App};
    use serde_json::{json, Value};

    use crate::dal::website_store::WebsiteStore;

    use super::{add_website, get_websites, remove_website};

    #[actix_web::test]
    async fn websites_add_list_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = web::Data::new(WebsiteStore::new(dir.path().join("websites.json")));
        let app = test::init_service(
            App::new()
                .app_data(store.clone())
                .service(
                    web::scope("/api")
                        .service(get_websites)
                        .service(add_website)
                        .service(remove_website),
                ),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/websites")
            .set_json(json!({ "url": "https://shop.vn" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);

        let req = test::TestRequest::post()
            .uri("/api/websites")
            .set_json(json!({ "url": "https://shop.vn" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status().as_u16(), 400);

        let req = test::TestRequest::post()
            .uri("/api/websites")
            .set_json(json!({ "url": "shop.vn" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status().as_u16(), 400);

        let req = test::TestRequest::get().uri("/api/websites").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "websites": [{ "url": "https://shop.vn" }] }));

        let req = test::TestRequest::delete().uri("/api/websites/3").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status().as_u16(), 404);

        let req = test::TestRequest::delete().uri("/api/websites/0").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert!(store.list().await.unwrap().is_empty());
    }
}
