// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3030;
pub const WS_PATH: &str = "ws";
pub const HEALTH_PATH: &str = "health";

// Fallback CORS origin when none are configured
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
