pub mod api;
pub mod export;
pub mod models;
pub mod query;
pub mod store;
pub mod sync;

mod time;
