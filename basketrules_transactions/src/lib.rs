pub mod api;

pub mod transaction_source;

pub mod transaction_store;
