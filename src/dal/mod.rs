pub mod website_store;
