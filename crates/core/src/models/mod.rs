pub mod allocation;
pub mod category;
pub mod ledger;
pub mod settings;
pub mod summary;
pub mod transaction;
pub mod validation;
