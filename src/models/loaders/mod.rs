pub mod folder_loader;

pub use folder_loader::load_documents_from_folder;
