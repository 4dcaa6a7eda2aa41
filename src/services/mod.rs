pub mod analysis_service;
pub mod chat_service;
pub mod llm_service;
pub mod resolver_service;
pub mod series_service;
