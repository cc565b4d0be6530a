//! Route persistence
//!
//! Routes are kept in a flat, human-editable key-value text block, one key
//! per route:
//!
//! ```text
//! route.home=WP1:0:0:0;WP2:12.5:3:0;gate:20:-4.25:0
//! ```
//!
//! Each entry is `label:x:y:z`, entries separated by `;`. The storage
//! medium is abstracted behind [`KeyValueStore`]; [`MemoryStore`] keeps the
//! block in RAM and can render or parse it as `key=value` lines.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::fmt::Write;

use heapless::Vec;
use nalgebra::Vector3;
use rover_assist_core::navigation::Waypoint;
use rover_assist_core::vehicle::MAX_WAYPOINTS;

/// Key prefix for stored routes
pub const ROUTE_KEY_PREFIX: &str = "route.";

/// Maximum route name length
pub const MAX_ROUTE_NAME_LEN: usize = 32;

const ENTRY_SEPARATOR: char = ';';
const FIELD_SEPARATOR: char = ':';

/// Route encoding and storage errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    #[error("No route named {0}")]
    NotFound(String),

    #[error("Invalid route name: {0:?}")]
    InvalidName(String),

    #[error("Invalid waypoint label: {0:?}")]
    InvalidLabel(String),

    #[error("Non-finite coordinate in waypoint {0}")]
    NonFinite(String),

    #[error("Malformed route entry: {0:?}")]
    MalformedEntry(String),

    #[error("Route exceeds the waypoint limit")]
    TooManyWaypoints,

    #[error("Malformed line {0} in store")]
    MalformedLine(usize),
}

/// Flat string key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<&str>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), RouteError>;

    /// Remove a key, returning whether it existed
    fn remove(&mut self, key: &str) -> bool;
}

/// In-memory key-value block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `key=value` block
    ///
    /// Blank lines and lines starting with `#` are skipped. Later duplicates
    /// win.
    pub fn parse(text: &str) -> Result<Self, RouteError> {
        let mut store = Self::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .ok_or(RouteError::MalformedLine(index + 1))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(RouteError::MalformedLine(index + 1));
            }
            store.entries.insert(key.to_string(), value.trim().to_string());
        }
        Ok(store)
    }

    /// Render the block as sorted `key=value` lines
    pub fn render(&self) -> String {
        let mut text = String::new();
        for (key, value) in &self.entries {
            let _ = writeln!(text, "{}={}", key, value);
        }
        text
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), RouteError> {
        if value.contains('\n') {
            return Err(RouteError::MalformedEntry(value.to_string()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }
}

/// Storage key for a route name
pub fn route_key(name: &str) -> Result<String, RouteError> {
    let valid = !name.is_empty()
        && name.len() <= MAX_ROUTE_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(RouteError::InvalidName(name.to_string()));
    }
    let mut key = String::from(ROUTE_KEY_PREFIX);
    key.push_str(name);
    Ok(key)
}

/// Encode waypoints as `label:x:y:z;...`
pub fn encode_route(waypoints: &[Waypoint]) -> Result<String, RouteError> {
    let mut text = String::new();
    for (index, waypoint) in waypoints.iter().enumerate() {
        let label = waypoint.name.as_str();
        if label.is_empty() || label.contains(is_reserved) {
            return Err(RouteError::InvalidLabel(label.to_string()));
        }
        let p = &waypoint.position;
        if !p.iter().all(|c| c.is_finite()) {
            return Err(RouteError::NonFinite(label.to_string()));
        }
        if index > 0 {
            text.push(ENTRY_SEPARATOR);
        }
        let _ = write!(text, "{}:{}:{}:{}", label, p.x, p.y, p.z);
    }
    Ok(text)
}

/// Decode a `label:x:y:z;...` value
///
/// Empty entries (a trailing `;`) are skipped. The z coordinate may be
/// omitted and defaults to 0.
pub fn decode_route(text: &str) -> Result<Vec<Waypoint, MAX_WAYPOINTS>, RouteError> {
    let mut route = Vec::new();
    for entry in text.split(ENTRY_SEPARATOR) {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let waypoint = decode_entry(entry)?;
        route
            .push(waypoint)
            .map_err(|_| RouteError::TooManyWaypoints)?;
    }
    Ok(route)
}

fn decode_entry(entry: &str) -> Result<Waypoint, RouteError> {
    let malformed = || RouteError::MalformedEntry(entry.to_string());

    let mut fields = entry.split(FIELD_SEPARATOR).map(str::trim);
    let label = fields.next().filter(|l| !l.is_empty()).ok_or_else(malformed)?;

    let mut coordinates = [0.0f32; 3];
    let mut count = 0;
    for field in fields {
        if count == coordinates.len() {
            return Err(malformed());
        }
        coordinates[count] = field.parse::<f32>().map_err(|_| malformed())?;
        count += 1;
    }
    if count < 2 {
        return Err(malformed());
    }
    if !coordinates.iter().all(|c| c.is_finite()) {
        return Err(RouteError::NonFinite(label.to_string()));
    }

    let [x, y, z] = coordinates;
    Ok(Waypoint::new(label, Vector3::new(x, y, z), 0.0))
}

fn is_reserved(c: char) -> bool {
    c == ENTRY_SEPARATOR || c == FIELD_SEPARATOR || c == '=' || c.is_control()
}

/// Store `waypoints` under `name`
pub fn save_route<S: KeyValueStore + ?Sized>(
    store: &mut S,
    name: &str,
    waypoints: &[Waypoint],
) -> Result<(), RouteError> {
    let key = route_key(name)?;
    let value = encode_route(waypoints)?;
    store.set(&key, &value)
}

/// Load the route stored under `name`
pub fn load_route<S: KeyValueStore + ?Sized>(
    store: &S,
    name: &str,
) -> Result<Vec<Waypoint, MAX_WAYPOINTS>, RouteError> {
    let key = route_key(name)?;
    let value = store
        .get(&key)
        .ok_or_else(|| RouteError::NotFound(name.to_string()))?;
    decode_route(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> [Waypoint; 3] {
        [
            Waypoint::new("WP1", Vector3::new(0.0, 0.0, 0.0), 1.0),
            Waypoint::new("WP2", Vector3::new(12.5, 3.0, 0.0), 2.0),
            Waypoint::new("gate", Vector3::new(20.0, -4.25, 1.5), 3.0),
        ]
    }

    #[test]
    fn test_encode_format() {
        let text = encode_route(&route()).unwrap();
        assert_eq!(text, "WP1:0:0:0;WP2:12.5:3:0;gate:20:-4.25:1.5");
    }

    #[test]
    fn test_save_then_load_through_rendered_block() {
        let mut store = MemoryStore::new();
        save_route(&mut store, "home", &route()).unwrap();

        let reparsed = MemoryStore::parse(&store.render()).unwrap();
        let loaded = load_route(&reparsed, "home").unwrap();

        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[2].name.as_str(), "gate");
        assert!((loaded[2].position - Vector3::new(20.0, -4.25, 1.5)).norm() < 1e-6);
    }

    #[test]
    fn test_missing_route() {
        let store = MemoryStore::new();
        assert_eq!(
            load_route(&store, "nowhere"),
            Err(RouteError::NotFound("nowhere".to_string()))
        );
    }

    #[test]
    fn test_invalid_names_rejected() {
        assert!(matches!(route_key(""), Err(RouteError::InvalidName(_))));
        assert!(matches!(route_key("a b"), Err(RouteError::InvalidName(_))));
        assert!(matches!(route_key("x=y"), Err(RouteError::InvalidName(_))));
        assert_eq!(route_key("back_yard-2").unwrap(), "route.back_yard-2");
    }

    #[test]
    fn test_label_with_separator_rejected() {
        let bad = [Waypoint::new("a;b", Vector3::zeros(), 0.0)];
        assert!(matches!(encode_route(&bad), Err(RouteError::InvalidLabel(_))));
    }

    #[test]
    fn test_decode_tolerates_whitespace_and_missing_z() {
        let loaded = decode_route(" A:1:2 ; B : 3 : 4 : 5 ;").unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].position, Vector3::new(1.0, 2.0, 0.0));
        assert_eq!(loaded[1].name.as_str(), "B");
        assert_eq!(loaded[1].position, Vector3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_decode_rejects_malformed_entries() {
        assert!(matches!(decode_route("A:1"), Err(RouteError::MalformedEntry(_))));
        assert!(matches!(decode_route("A:1:x:0"), Err(RouteError::MalformedEntry(_))));
        assert!(matches!(decode_route(":1:2:3"), Err(RouteError::MalformedEntry(_))));
        assert!(matches!(decode_route("A:1:2:3:4"), Err(RouteError::MalformedEntry(_))));
        assert!(matches!(decode_route("A:inf:0:0"), Err(RouteError::NonFinite(_))));
    }

    #[test]
    fn test_decode_rejects_oversized_route() {
        let text: std::vec::Vec<_> = (0..=MAX_WAYPOINTS).map(|i| format!("P{}:{}:0:0", i, i)).collect();
        assert_eq!(decode_route(&text.join(";")), Err(RouteError::TooManyWaypoints));
    }

    #[test]
    fn test_parse_skips_comments_and_reports_bad_lines() {
        let store = MemoryStore::parse("# routes\n\nroute.a=A:0:0:0\n").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("route.a"), Some("A:0:0:0"));

        assert_eq!(
            MemoryStore::parse("route.a=A:0:0:0\nbroken\n"),
            Err(RouteError::MalformedLine(2))
        );
    }

    #[test]
    fn test_remove() {
        let mut store = MemoryStore::new();
        store.set("route.a", "A:0:0:0").unwrap();
        assert!(store.remove("route.a"));
        assert!(!store.remove("route.a"));
        assert!(store.is_empty());
    }
}
