pub(crate) mod host;
pub(crate) mod recording;
pub(crate) mod scenario;
pub(crate) mod timers;
