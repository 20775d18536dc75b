pub mod completion_handlers;
