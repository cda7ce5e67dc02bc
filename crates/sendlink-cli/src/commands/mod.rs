pub mod create;
pub mod delete;
pub mod edit;
pub mod get;
pub mod list;
pub mod receive;
pub mod remove_password;
