mod convert_command;
pub use convert_command::*;

mod info_command;
pub use info_command::*;
