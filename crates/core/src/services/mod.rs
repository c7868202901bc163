pub mod allocation_service;
pub mod category_service;
pub mod summary_service;
pub mod transaction_service;
pub mod validation_service;
