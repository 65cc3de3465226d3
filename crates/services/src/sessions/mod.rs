mod service;
mod store;

// Public API of the session subsystem.
pub use service::QuizService;
pub use store::SessionStore;
