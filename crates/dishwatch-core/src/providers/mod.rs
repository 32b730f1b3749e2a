//! Concrete [`DishProvider`](crate::provider::DishProvider) implementations.

pub mod command;
pub mod demo;
pub mod fake;

pub use command::CommandProvider;
pub use demo::DemoProvider;
pub use fake::FakeProvider;
