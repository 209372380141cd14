// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

// Token configuration constants
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
pub const MAX_TOKEN_TTL_HOURS: i64 = 720;
pub const MAX_TOKEN_LENGTH: usize = 4096;

// Password hashing cost (Argon2id, OWASP baseline)
pub const DEFAULT_ARGON2_MEMORY_KIB: u32 = 19 * 1024;
pub const DEFAULT_ARGON2_ITERATIONS: u32 = 2;

// Request handling
pub const DEFAULT_MAX_BODY_BYTES: u64 = 16 * 1024;
pub const DEFAULT_LOGIN_MIN_DURATION_MS: u64 = 100;

// Pagination
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const MAX_PAGE_SIZE: usize = 100;

// Field bounds
pub const NAME_MAX_LEN: usize = 50;
pub const EMAIL_MAX_LEN: usize = 100;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 100;
