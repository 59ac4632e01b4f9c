/*
 * Responsibility
 * - HTTP surface: DTOs, extractors, handlers, route groups
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod headers;
mod routes;

pub use routes::routes;
