// Library surface for the terminal front end, headless drivers and tests.
// Nothing in here touches the terminal except `runtime`.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod error;
pub mod language;
pub mod logging;
pub mod metrics;
pub mod report;
pub mod runtime;
pub mod session;
pub mod time_series;
pub mod typing_policy;
pub mod typing_session;
pub mod typing_test;
pub mod word_source;

pub use error::ConfigurationError;
pub use session::{SessionConfig, SessionState};
pub use typing_test::TypingTest;
