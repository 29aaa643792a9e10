pub mod init;
pub mod project;
pub mod records;
pub mod serve;
pub mod skill;
