/// Token lifetime requested from the login endpoint, in seconds.
pub const ACCESS_TOKEN_DEFAULT_TTL: u64 = 3600; // 1 hour

/// Reauthenticate proactively when the access token has less than this
/// many seconds remaining.
pub const ACCESS_TOKEN_REAUTHENTICATE_WITHIN: i64 = 10;

pub const REGION_URL_EUROPE: &str = "https://piranha.eu-central-1.prod.kappa.plumenet.io/api";

/// Homepass cloud region an account is served from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Region {
    #[default]
    Europe,
}

impl Region {
    pub fn base_url(&self) -> &'static str {
        match self {
            Region::Europe => REGION_URL_EUROPE,
        }
    }
}
