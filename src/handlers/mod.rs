pub mod health_handlers;
pub mod information_handlers;
pub mod person_handlers;
pub mod upload_handlers;
