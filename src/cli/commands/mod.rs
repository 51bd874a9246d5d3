pub mod check;
mod command_result;
pub mod helper;
pub mod init;
pub mod report;
pub mod suppress;

pub use command_result::*;
