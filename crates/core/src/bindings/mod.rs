pub mod roles2_library;
pub mod roles2_library_adapter;
pub mod storage_manager;
