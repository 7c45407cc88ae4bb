pub mod logger;
pub mod mask;
pub mod throttle;
