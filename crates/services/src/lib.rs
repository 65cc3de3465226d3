#![forbid(unsafe_code)]

pub mod app_services;
pub mod directive;
pub mod error;
pub mod report;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::{AppServices, ResultBackend};
pub use directive::{Directive, ErrorNotice, Intro, NoticeKind, Welcome};
pub use error::{AppServicesError, ServiceError};
pub use report::Report;
pub use sessions::{QuizService, SessionStore};
