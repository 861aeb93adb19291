pub mod console;
pub mod error;
pub mod model;
pub mod ops;
pub mod output;
pub mod paths;
pub mod store;
pub mod validate;
pub mod web;
