pub mod chat_completions_route;
pub mod chat_request;
pub mod chat_response;
pub mod models_route;
