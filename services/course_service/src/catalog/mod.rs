pub mod ddb_repository;
pub mod mem_repository;
pub mod repository;
pub mod types;

pub use ddb_repository::{CatalogTables, DdbCatalogRepository};
pub use mem_repository::MemCatalogRepository;
pub use repository::CatalogRepository;
pub use types::{Course, CourseLevel, CourseStatus, CourseUpdate, Module, ModuleUpdate, Video, VideoUpdate};
