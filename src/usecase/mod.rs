pub mod birth_add_usecase;
pub mod birth_import_usecase;
pub mod birth_list_usecase;
pub mod birth_next_usecase;
pub mod birth_notify_usecase;
pub mod birth_remove_usecase;
pub mod command_router;
