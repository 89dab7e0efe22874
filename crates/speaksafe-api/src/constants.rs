/// Relay endpoint.
pub const SEND_EMAIL_PATH: &str = "/api/send-email";

/// Path used by existing front ends that posted to a serverless function.
pub const LEGACY_SEND_EMAIL_PATH: &str = "/.netlify/functions/sendEmail";

pub const HEALTH_PATH: &str = "/health";

/// Default cap on in-flight requests (override with HTTP_CONCURRENCY_LIMIT).
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 1024;
