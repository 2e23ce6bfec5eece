//! External collaborators: `openssl` and `git`

pub mod command;
pub mod git;
pub mod openssl;

pub use command::{run_tool, ToolOutput};
pub use git::Git;
pub use openssl::OpenSsl;
