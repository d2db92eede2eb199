//! The order page controller and the models it renders.

pub mod order_list;
pub mod order_view;
pub mod view;

pub use order_list::*;
pub use order_view::*;
pub use view::*;
