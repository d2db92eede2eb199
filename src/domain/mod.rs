pub mod delivery;
pub mod money;
pub mod order;
pub mod product;

pub use delivery::*;
pub use order::*;
pub use product::*;
