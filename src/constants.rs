pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 9000;

/// Token lifetimes (minutes)
pub const DEFAULT_ACCESS_TOKEN_TTL_MIN: u64 = 60;
pub const DEFAULT_REFRESH_TOKEN_TTL_MIN: u64 = 90;

/// Single origin allowed by the CORS layer unless overridden
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:4200";
/// Where successful logins land
pub const DEFAULT_DASHBOARD_URL: &str = "http://localhost:4200/dashboard";

/// Claim names embedded in access tokens. The frontend and the other token
/// consumers match on these exact strings.
pub const CLAIM_AUTHORITY: &str = "authority";
pub const CLAIM_EMAIL: &str = "email";
pub const CLAIM_NAME: &str = "nome";
pub const CLAIM_ROLE: &str = "funcao";
pub const CLAIM_STATUS: &str = "statusUsuario";

/// Job-function label given to auto-provisioned federated accounts
pub const DEFAULT_FEDERATED_ROLE: &str = "N/A";
