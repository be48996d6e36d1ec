mod file;

pub use file::FileSessionStore;
