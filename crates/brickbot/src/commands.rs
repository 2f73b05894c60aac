pub mod admin;
pub mod meta;
pub mod publish;
pub mod upload;
