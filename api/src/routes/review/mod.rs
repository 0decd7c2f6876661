pub mod export_review_route;
pub mod review_request;
pub mod review_route;
