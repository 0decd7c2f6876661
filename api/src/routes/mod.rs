pub mod chat;
pub mod review;
pub mod status_route;
