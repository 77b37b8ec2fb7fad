pub mod auth;
pub mod borewells;
pub mod middleware;
pub mod predict;
