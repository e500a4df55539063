pub mod init;
pub mod query;
