//! Order dispatch and composite execution strategies.

mod dispatcher;
mod oco;
mod twap;

pub use dispatcher::OrderDispatcher;
pub use oco::OcoStrategy;
pub use twap::{TwapPolicy, TwapStrategy};
