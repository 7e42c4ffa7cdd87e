pub mod preprocess;
pub mod session;
pub mod state;
