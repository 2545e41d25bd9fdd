pub mod approval;
pub mod candidate;
pub mod item;
pub mod plan;
pub mod time;

pub use approval::*;
pub use candidate::*;
pub use item::*;
pub use plan::*;
pub use time::*;
