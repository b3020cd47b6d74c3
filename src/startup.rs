use std::net::TcpListener;

use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};

use crate::{
    dal::website_store::WebsiteStore,
    routes::{default_route, search_route, website_route},
    services::ProductScraper,
};

pub fn run(
    listener: TcpListener,
    store: WebsiteStore,
    scraper: ProductScraper,
) -> Result<Server, std::io::Error> {
    let store = web::Data::new(store);
    let scraper = web::Data::new(scraper);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(default_route::default)
            .service(
                web::scope("/api")
                    .service(search_route::search)
                    .service(website_route::get_websites)
                    .service(website_route::add_website)
                    .service(website_route::remove_website),
            )
            .app_data(store.clone())
            .app_data(scraper.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
