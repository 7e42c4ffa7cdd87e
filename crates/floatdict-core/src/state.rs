use floatdict_config::Config;
use tokio::sync::{Mutex, RwLock};

use crate::session::CaptureSession;

#[derive(Default)]
pub struct AppState {
    pub config: RwLock<Config>,
    pub session: Mutex<CaptureSession>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            session: Mutex::new(CaptureSession::new()),
        }
    }
}
