// API endpoints
pub const DEFAULT_REST_URL: &str = "https://api.github.com";
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";
// Web origin repository pages live under
pub const GITHUB_WEB_URL: &str = "https://github.com/";
pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";

// Storage keys shared with the extension's options page
pub const TOKEN_KEY: &str = "grs_gh_token";
pub const AUTO_ASK_KEY: &str = "grs_auto_ask";

// Page contract
pub const REPO_SIZE_ID: &str = "addon-repo-size";
pub const REPO_STATS_QUERY: &str = "div.d-flex.flex-shrink-0.gap-2";
pub const CODE_TAB_QUERY: &str = "#code-tab.selected";
pub const PRIVATE_LABEL_QUERY: &str = "#repository-container-header .Label.Label--secondary";
pub const PRIVATE_LABEL_TEXT: &str = "Private";
pub const MODAL_ID: &str = "grs_token_modal";
pub const TOKEN_INPUT_ID: &str = "grs_token_input";

// Size formatting
pub const SIZE_KILO: u128 = 1024;
pub const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];

// Indicator texts
pub const UNAUTHORIZED_TEXT: &str = "Unauthorized Token!";
pub const UNKNOWN_ERROR_TEXT: &str = "Unknown Error!";
pub const MISSING_TOKEN_TEXT: &str = "Missing token!";

// Default time a pass waits for a late-rendering stats row
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5000;
