//! Provider option merging.

use std::collections::BTreeMap;

/// Combine configured extras with per-send extras; per-send values win.
///
/// Never returns `None`: with nothing configured the result is empty.
///
/// ```
/// use std::collections::BTreeMap;
/// use courier::providers::merge_extras;
///
/// let configured = BTreeMap::from([("o:campaign".to_string(), "marketing".to_string())]);
/// let per_send = BTreeMap::from([("o:campaign".to_string(), "sales".to_string())]);
///
/// assert_eq!(merge_extras(&configured, Some(&per_send)), per_send);
/// ```
pub fn merge_extras(
    configured: &BTreeMap<String, String>,
    per_send: Option<&BTreeMap<String, String>>,
) -> BTreeMap<String, String> {
    let mut merged = configured.clone();
    if let Some(per_send) = per_send {
        merged.extend(per_send.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
}
