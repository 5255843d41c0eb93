pub mod catalog;
pub mod mailer;

pub use catalog::load_catalog;
pub use mailer::SimulatedMailAdapter;
