pub mod service_account;
pub mod static_token;
