pub mod json_file;

pub use self::json_file::JsonFileStore;
