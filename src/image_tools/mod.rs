mod compositor;
pub use compositor::*;

mod format_writer;
pub use format_writer::*;
