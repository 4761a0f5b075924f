// src/config/consts.rs

// Net config
pub const API_URL: &str = "https://zzatem.com/api/get-user-data";
pub const USER_AGENT: &str = concat!("api_downloader/", env!("CARGO_PKG_VERSION"));
pub const TIMEOUT_SECS: u64 = 30;
pub const MAX_RETRIES: u32 = 3;
pub const BACKOFF_FACTOR: f64 = 0.5;
pub const MAX_BACKOFF_SECS: f64 = 120.0;
pub const RETRY_STATUSES: &[u16] = &[429, 500, 502, 503, 504];

// Fields the API knows about; anything else passes through untouched
pub const KNOWN_FIELDS: &[&str] = &[
    "user_data",
    "followers",
    "following",
    "liked_pages",
    "joined_groups",
];
pub const DEFAULT_FIELD: &str = "user_data";

// Local files
pub const LOG_FILE: &str = ".store/debug.log";
pub const CONFIG_FILE: &str = "api_downloader.toml";

// Env
pub const ENV_PREFIX: &str = "USERDATA_";
pub const LOG_ENV: &str = "USERDATA_LOG";
pub const TOKEN_ENV: &str = "USERDATA_TOKEN";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const ALL_DATA_STEM: &str = "all_data";
pub const SHEET_NAME_MAX: usize = 31;
