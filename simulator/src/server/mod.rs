pub mod routes;
pub mod scene;
