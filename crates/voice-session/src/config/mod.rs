mod logging_config;
#[allow(clippy::module_inception)]
mod config;
mod session_config;
mod simulation_config;

pub(crate) use {
    config::Config, logging_config::LoggingConfig, session_config::SessionConfig,
    simulation_config::SimulationConfig,
};

pub(crate) const DEFAULT_SETTLE_DELAY_MS: u64 = 1000;
pub(crate) const MAX_SETTLE_DELAY_MS: u64 = 60_000;
pub(crate) const DEFAULT_CAPTURE_MS: u64 = 200;
pub(crate) const DEFAULT_RESPONSE_DELAY_MS: u64 = 800;
pub(crate) const DEFAULT_PLAYBACK_MS: u64 = 3000;
pub(crate) const DEFAULT_LOG_FILTER: &str = "voice_session=info,voice_session_core=info";

pub(crate) fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

pub(crate) fn default_capture_ms() -> u64 {
    DEFAULT_CAPTURE_MS
}

pub(crate) fn default_response_delay_ms() -> u64 {
    DEFAULT_RESPONSE_DELAY_MS
}

pub(crate) fn default_playback_ms() -> u64 {
    DEFAULT_PLAYBACK_MS
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}
