use crate::error::SettingsError;

const DEFAULT_FPS: u64 = 60;
const DEFAULT_HOLD_MS: u64 = 160;

pub const FPS_VAR: &str = "BANGGUCHA_FPS";
pub const SEED_VAR: &str = "BANGGUCHA_SEED";
pub const HOLD_VAR: &str = "BANGGUCHA_HOLD_MS";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Frames (and simulation steps) per second.
    pub fps: u64,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// How long a key counts as held after its last press or repeat, for
    /// terminals that never report releases.
    pub hold_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            seed: None,
            hold_ms: DEFAULT_HOLD_MS,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads each variable through `lookup`. Bad values are logged and
    /// replaced by the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            fps: or_default(parse_positive(FPS_VAR, lookup(FPS_VAR)), defaults.fps),
            seed: parse_u64(SEED_VAR, lookup(SEED_VAR)).unwrap_or_else(|err| {
                log::warn!("ignoring {err}");
                None
            }),
            hold_ms: or_default(parse_positive(HOLD_VAR, lookup(HOLD_VAR)), defaults.hold_ms),
        }
    }
}

fn or_default(parsed: Result<Option<u64>, SettingsError>, default: u64) -> u64 {
    match parsed {
        Ok(value) => value.unwrap_or(default),
        Err(err) => {
            log::warn!("ignoring {err}");
            default
        }
    }
}

fn parse_u64(var: &'static str, raw: Option<String>) -> Result<Option<u64>, SettingsError> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| SettingsError::Invalid { var, value }),
    }
}

fn parse_positive(var: &'static str, raw: Option<String>) -> Result<Option<u64>, SettingsError> {
    match parse_u64(var, raw)? {
        Some(0) => Err(SettingsError::NotPositive { var }),
        other => Ok(other),
    }
}
