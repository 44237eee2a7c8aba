pub mod comment;
pub mod error;
pub mod identity;
pub mod transition;
pub mod video;

pub use comment::*;
pub use error::*;
pub use identity::*;
pub use transition::*;
pub use video::*;
