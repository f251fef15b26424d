mod walk;

pub use walk::find_matching_files;
