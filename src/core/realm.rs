use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::task::Color;

pub const GREAT_HALL: &str = "Great Hall";
pub const WAR_ROOM: &str = "War Room";
pub const THY_STRATEGY: &str = "Thy Strategy";

/// Realms that can never be deleted and are re-added on load.
pub const PROTECTED_REALMS: [&str; 3] = [GREAT_HALL, WAR_ROOM, THY_STRATEGY];

/// Name the calendar realm carried before it was renamed.
pub const LEGACY_ARCHIVES: &str = "Archives";

pub const DEFAULT_ICON: &str = "🏷️";
pub const STRATEGY_ICON: &str = "📜";

/// Realms keyed by name, in display order.
pub type Realms = IndexMap<String, Realm>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Realm {
    pub color: Color,
    pub icon: String,
    /// Hue in degrees, as a decimal string.
    pub hsl: String,
}

impl Realm {
    pub fn new(color: Color, icon: impl Into<String>) -> Self {
        Self {
            color,
            icon: icon.into(),
            hsl: color.hue().to_string(),
        }
    }

    pub fn recolor(&mut self, color: Color) {
        self.color = color;
        self.hsl = color.hue().to_string();
    }
}

pub static DEFAULT_REALMS: Lazy<Realms> = Lazy::new(|| {
    let mut realms = Realms::new();
    realms.insert(GREAT_HALL.to_string(), Realm::new(Color::Yellow, "🏰"));
    realms.insert(WAR_ROOM.to_string(), Realm::new(Color::Orange, "⚔️"));
    realms.insert(THY_STRATEGY.to_string(), Realm::new(Color::Pink, STRATEGY_ICON));
    realms
});

pub fn is_protected(name: &str) -> bool {
    PROTECTED_REALMS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_protected_realms_in_order() {
        let names: Vec<&str> = DEFAULT_REALMS.keys().map(String::as_str).collect();
        assert_eq!(names, PROTECTED_REALMS);
        assert_eq!(DEFAULT_REALMS[GREAT_HALL].hsl, "60");
        assert_eq!(DEFAULT_REALMS[WAR_ROOM].hsl, "30");
        assert_eq!(DEFAULT_REALMS[THY_STRATEGY].hsl, "330");
    }

    #[test]
    fn recolor_updates_hue() {
        let mut realm = Realm::new(Color::Yellow, "👑");
        realm.recolor(Color::Purple);
        assert_eq!(realm.color, Color::Purple);
        assert_eq!(realm.hsl, "270");
    }

    #[test]
    fn only_builtin_realms_are_protected() {
        assert!(is_protected(GREAT_HALL));
        assert!(is_protected(THY_STRATEGY));
        assert!(!is_protected(LEGACY_ARCHIVES));
        assert!(!is_protected("Treasury"));
    }
}
