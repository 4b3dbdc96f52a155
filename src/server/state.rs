use crate::config::ServerConfig;
use crate::history::store::HistoryStore;
use crate::notify::dispatch::Dispatcher;
use crate::server::rate_limit::RateLimiter;
use crate::uploads::UploadStore;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub history: HistoryStore,
    pub uploads: UploadStore,
    pub instance_id: Option<String>,
    pub rate_limiter: Option<RateLimiter>,
    pub server_config: Option<ServerConfig>,
}
