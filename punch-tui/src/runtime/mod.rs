mod completion_queue;
mod dev_backend;
mod driver;
mod event_loop;
#[cfg(test)]
mod mock;

pub use dev_backend::DevBackend;
pub use driver::Driver;
pub use event_loop::run_app;
