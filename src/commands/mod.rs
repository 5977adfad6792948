pub mod build;
pub mod console;
pub mod pipeline;
pub mod publish;
pub mod status;

pub use build::*;
pub use console::*;
pub use pipeline::*;
pub use publish::*;
pub use status::*;
