pub mod cart;
pub mod item;
pub mod service;
pub mod state;
