pub mod census;
pub mod merge;
pub mod reader;
pub mod table;
pub mod writer;

pub use census::*;
pub use merge::*;
pub use reader::*;
pub use table::*;
pub use writer::*;
