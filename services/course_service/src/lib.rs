pub mod access;
pub mod catalog;
pub mod context;
pub mod enrollment;
pub mod notification;
pub mod operations;
pub mod pb;
pub mod utils;
