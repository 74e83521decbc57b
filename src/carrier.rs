use lazy_static::lazy_static;
use regex::Regex;

/// Carrier patterns in priority order.
///
/// Several carriers share the `7` + 11..15 digit numeric form; the first
/// entry that matches wins, so the order of this list is the tie-break.
pub const CARRIER_PATTERNS: &[(&str, &str)] = &[
    ("中通", r"^(ZTO|6)[0-9]{10,15}$|^7[0-9]{11,15}$"),
    ("圆通", r"^(YT|D|1)[0-9]{11,15}$|^7[0-9]{11,15}$"),
    ("申通", r"^(STO|268)[0-9]{10,15}$|^7[0-9]{11,15}$"),
    ("韵达", r"^(YD|19|1)[0-9]{11,15}$|^7[0-9]{11,15}$"),
    ("顺丰", r"^(SF)[0-9]{10,15}$|^[89][0-9]{11,15}$"),
    ("德邦", r"^(DP|3)[0-9]{11,15}$"),
    ("邮政EMS", r"^(E[A-Z])[0-9]{9}[A-Z]{2}$|^(JD|JT)[0-9]{11,15}$"),
    ("京东", r"^(JD|VA|JT)[0-9]{11,15}$"),
    ("天天", r"^(TT|88)[0-9]{11,15}$"),
    ("百世", r"^(HT|A)[0-9]{11,15}$"),
];

lazy_static! {
    static ref COMPILED_PATTERNS: Vec<(&'static str, Regex)> = CARRIER_PATTERNS
        .iter()
        .map(|(name, pattern)| (*name, Regex::new(pattern).unwrap()))
        .collect();
}

/// Guess the carrier of a tracking number.
///
/// The token is trimmed and upper-cased, then tested against
/// [`CARRIER_PATTERNS`] in order. Returns the empty string when nothing
/// matches; an unrecognized number is not an error.
///
/// # Examples
/// ```
/// use parcel_triage::carrier::classify;
///
/// assert_eq!(classify("75761365043766"), "中通");
/// assert_eq!(classify(" yt894185215852 "), "圆通");
/// assert_eq!(classify("98574940403"), "");
/// ```
pub fn classify(token: &str) -> String {
    let normalized = token.trim().to_uppercase();
    if normalized.is_empty() {
        return String::new();
    }

    COMPILED_PATTERNS
        .iter()
        .find(|(_, regex)| regex.is_match(&normalized))
        .map(|(name, _)| name.to_string())
        .unwrap_or_default()
}

/// Carrier names in table order.
pub fn carrier_names() -> Vec<&'static str> {
    CARRIER_PATTERNS.iter().map(|(name, _)| *name).collect()
}
