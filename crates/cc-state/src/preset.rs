//! Preset management
//!
//! Built-in and user-defined presets are kept in two typed collections.
//! The merged list shown to the user (Custom, built-ins, separator, user
//! presets) is a projection built on demand by [`PresetCatalog::entries`].

use cc_core::SliderValues;
use serde::{Deserialize, Serialize};

use crate::codec::PRESET_FIELD_SEPARATOR;
use crate::store::SettingsStore;

/// Name of the "no preset matches" entry
pub const CUSTOM_PRESET_NAME: &str = "Custom";

/// Label of the separator between built-in and user presets
pub const USER_PRESETS_SEPARATOR: &str = "─── User Presets ───";

/// Built-in presets: name, splice slider, crisp slider, offset slider, curve index
const BUILT_IN_PRESETS: [(&str, SliderValues); 3] = [
    ("Jario Style", SliderValues::new(50, 80, 20, 4)),
    ("Standard", SliderValues::new(40, 80, 10, 0)),
    ("Snappy", SliderValues::new(35, 67, 5, 1)),
];

/// Where a preset comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresetOrigin {
    /// Shipped, read-only
    BuiltIn,
    /// Created by the user, persisted in the user preset file
    User,
}

/// Named slider tuple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub values: SliderValues,
    pub origin: PresetOrigin,
}

impl Preset {
    pub fn built_in(name: &str, values: SliderValues) -> Self {
        Self {
            name: name.to_string(),
            values,
            origin: PresetOrigin::BuiltIn,
        }
    }

    pub fn user(name: &str, values: SliderValues) -> Self {
        Self {
            name: name.to_string(),
            values,
            origin: PresetOrigin::User,
        }
    }

    pub fn is_user(&self) -> bool {
        self.origin == PresetOrigin::User
    }
}

/// Shipped presets in display order
pub fn built_in_presets() -> Vec<Preset> {
    BUILT_IN_PRESETS
        .iter()
        .map(|(name, values)| Preset::built_in(name, *values))
        .collect()
}

/// Which catalog entry is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetSelection {
    /// No preset matches the current values
    Custom,
    /// Index into the built-in presets
    BuiltIn(usize),
    /// Index into the user presets
    User(usize),
}

/// One row of the merged display list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogEntry<'a> {
    Custom,
    Preset(&'a Preset),
    Separator(&'static str),
}

impl<'a> CatalogEntry<'a> {
    pub fn label(&self) -> &'a str {
        match self {
            CatalogEntry::Custom => CUSTOM_PRESET_NAME,
            CatalogEntry::Preset(p) => &p.name,
            CatalogEntry::Separator(label) => label,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, CatalogEntry::Separator(_))
    }
}

/// Preset save errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresetError {
    #[error("Please enter a preset name")]
    EmptyName,

    #[error("Preset name cannot contain the '{0}' character")]
    InvalidName(char),

    #[error("Preset name cannot contain line breaks or control characters")]
    ControlCharacter,

    #[error("Cannot overwrite built-in preset '{0}'")]
    BuiltInName(String),

    #[error("A preset named '{0}' already exists")]
    AlreadyExists(String),
}

/// Trim and check a user-entered preset name
pub fn validate_preset_name(name: &str) -> Result<String, PresetError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PresetError::EmptyName);
    }
    if name.contains(PRESET_FIELD_SEPARATOR) {
        return Err(PresetError::InvalidName(PRESET_FIELD_SEPARATOR));
    }
    // One record per line in the user preset file
    if name.chars().any(char::is_control) {
        return Err(PresetError::ControlCharacter);
    }
    Ok(name.to_string())
}

/// Built-in plus user-defined presets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetCatalog {
    built_ins: Vec<Preset>,
    user_defined: Vec<Preset>,
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PresetCatalog {
    /// Catalog with the shipped presets and the given user presets
    pub fn new(user_defined: Vec<Preset>) -> Self {
        let user_defined = user_defined
            .into_iter()
            .map(|p| Preset {
                origin: PresetOrigin::User,
                ..p
            })
            .collect();

        Self {
            built_ins: built_in_presets(),
            user_defined,
        }
    }

    /// Build from the user presets currently in `store`
    pub fn load(store: &dyn SettingsStore) -> Self {
        Self::new(store.load_user_presets())
    }

    /// Rebuild the user collection from `store`
    pub fn reload(&mut self, store: &dyn SettingsStore) {
        *self = Self::load(store);
        log::info!(
            "Preset catalog rebuilt: {} built-in, {} user",
            self.built_ins.len(),
            self.user_defined.len()
        );
    }

    pub fn built_ins(&self) -> &[Preset] {
        &self.built_ins
    }

    pub fn user_defined(&self) -> &[Preset] {
        &self.user_defined
    }

    /// Preset behind a selection (`None` for Custom or a stale index)
    pub fn get(&self, selection: PresetSelection) -> Option<&Preset> {
        match selection {
            PresetSelection::Custom => None,
            PresetSelection::BuiltIn(i) => self.built_ins.get(i),
            PresetSelection::User(i) => self.user_defined.get(i),
        }
    }

    pub fn name_of(&self, selection: PresetSelection) -> &str {
        self.get(selection)
            .map(|p| p.name.as_str())
            .unwrap_or(CUSTOM_PRESET_NAME)
    }

    /// First preset (built-ins first, then user presets) whose four values
    /// equal `values` exactly; Custom if none does.
    pub fn matching_preset(&self, values: &SliderValues) -> PresetSelection {
        if let Some(i) = self.built_ins.iter().position(|p| p.values == *values) {
            return PresetSelection::BuiltIn(i);
        }
        if let Some(i) = self.user_defined.iter().position(|p| p.values == *values) {
            return PresetSelection::User(i);
        }
        PresetSelection::Custom
    }

    /// Merged display list: Custom, built-ins, separator (only when user
    /// presets exist), user presets
    pub fn entries(&self) -> Vec<CatalogEntry<'_>> {
        let mut entries = Vec::with_capacity(self.built_ins.len() + self.user_defined.len() + 2);
        entries.push(CatalogEntry::Custom);
        entries.extend(self.built_ins.iter().map(CatalogEntry::Preset));
        if !self.user_defined.is_empty() {
            entries.push(CatalogEntry::Separator(USER_PRESETS_SEPARATOR));
            entries.extend(self.user_defined.iter().map(CatalogEntry::Preset));
        }
        entries
    }

    /// Row of `selection` in [`entries`](Self::entries)
    pub fn display_index(&self, selection: PresetSelection) -> usize {
        match selection {
            PresetSelection::Custom => 0,
            PresetSelection::BuiltIn(i) => 1 + i,
            PresetSelection::User(i) => 1 + self.built_ins.len() + 1 + i,
        }
    }

    /// Selection for a display row; `None` for the separator or out of range
    pub fn selection_at(&self, display_index: usize) -> Option<PresetSelection> {
        let user_start = 1 + self.built_ins.len() + 1;
        match display_index {
            0 => Some(PresetSelection::Custom),
            i if i <= self.built_ins.len() => Some(PresetSelection::BuiltIn(i - 1)),
            i if i >= user_start && i - user_start < self.user_defined.len() => {
                Some(PresetSelection::User(i - user_start))
            }
            _ => None,
        }
    }

    /// Number of rows in the display list
    pub fn display_len(&self) -> usize {
        if self.user_defined.is_empty() {
            1 + self.built_ins.len()
        } else {
            1 + self.built_ins.len() + 1 + self.user_defined.len()
        }
    }

    /// User preset with exactly this name
    pub fn find_user(&self, name: &str) -> Option<PresetSelection> {
        self.user_defined
            .iter()
            .position(|p| p.name == name)
            .map(PresetSelection::User)
    }

    /// Any entry whose name equals `name` ignoring case, Custom included
    pub fn find_ignore_case(&self, name: &str) -> Option<PresetSelection> {
        if name.eq_ignore_ascii_case(CUSTOM_PRESET_NAME) {
            return Some(PresetSelection::Custom);
        }
        if let Some(i) = self
            .built_ins
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
        {
            return Some(PresetSelection::BuiltIn(i));
        }
        self.user_defined
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
            .map(PresetSelection::User)
    }

    /// Append `preset` to the stored user presets and rebuild. No collision check.
    pub fn add(&mut self, store: &dyn SettingsStore, preset: Preset) {
        let mut stored = store.load_user_presets();
        stored.push(Preset {
            origin: PresetOrigin::User,
            ..preset
        });
        store.save_user_presets(&stored);
        self.reload(store);
    }

    /// Remove every stored user preset named exactly `name` and rebuild
    pub fn delete(&mut self, store: &dyn SettingsStore, name: &str) {
        let mut stored = store.load_user_presets();
        let before = stored.len();
        stored.retain(|p| p.name != name);
        if stored.len() != before {
            log::info!("Deleting user preset '{}'", name);
        }
        store.save_user_presets(&stored);
        self.reload(store);
    }

    /// Save `values` as a user preset named `name`.
    ///
    /// Names are compared ignoring case. Built-in names (Custom included) are
    /// always rejected; an existing user preset is replaced only when
    /// `overwrite` is set. Returns the selection of the saved preset.
    pub fn save_user_preset(
        &mut self,
        store: &dyn SettingsStore,
        name: &str,
        values: SliderValues,
        overwrite: bool,
    ) -> Result<PresetSelection, PresetError> {
        let name = validate_preset_name(name)?;

        match self.find_ignore_case(&name) {
            Some(PresetSelection::Custom) => {
                return Err(PresetError::BuiltInName(CUSTOM_PRESET_NAME.to_string()));
            }
            Some(PresetSelection::BuiltIn(i)) => {
                return Err(PresetError::BuiltInName(self.built_ins[i].name.clone()));
            }
            Some(PresetSelection::User(i)) => {
                if !overwrite {
                    return Err(PresetError::AlreadyExists(self.user_defined[i].name.clone()));
                }
                let existing = self.user_defined[i].name.clone();
                self.delete(store, &existing);
            }
            None => {}
        }

        self.add(store, Preset::user(&name, values));
        log::info!("Saved user preset '{}' {:?}", name, values);

        // A failed write leaves the preset out of the rebuilt catalog
        Ok(self.find_user(&name).unwrap_or(PresetSelection::Custom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_built_in_table() {
        let catalog = PresetCatalog::default();
        let names: Vec<&str> = catalog.entries().iter().map(|e| e.label()).collect();
        assert_eq!(names, ["Custom", "Jario Style", "Standard", "Snappy"]);
        assert_eq!(catalog.display_len(), 4);
    }

    #[test]
    fn test_matching_standard() {
        let catalog = PresetCatalog::default();
        let standard = SliderValues::new(40, 80, 10, 0);

        let selection = catalog.matching_preset(&standard);
        assert_eq!(catalog.name_of(selection), "Standard");

        for changed in [
            SliderValues::new(41, 80, 10, 0),
            SliderValues::new(40, 79, 10, 0),
            SliderValues::new(40, 80, 11, 0),
            SliderValues::new(40, 80, 10, 1),
        ] {
            assert_eq!(catalog.matching_preset(&changed), PresetSelection::Custom);
        }
    }

    #[test]
    fn test_matching_copied_tuple_finds_entry() {
        let catalog = PresetCatalog::new(vec![Preset::user("Mine", SliderValues::new(1, 2, 3, 4))]);
        for entry in catalog.entries() {
            if let CatalogEntry::Preset(p) = entry {
                let selection = catalog.matching_preset(&p.values);
                assert_eq!(catalog.get(selection), Some(p));
            }
        }
        assert_eq!(catalog.matching_preset(&SliderValues::UNSET), PresetSelection::Custom);
    }

    #[test]
    fn test_matching_prefers_earlier_entry() {
        let catalog = PresetCatalog::new(vec![
            Preset::user("Copy of Snappy", SliderValues::new(35, 67, 5, 1)),
            Preset::user("A", SliderValues::new(1, 1, 1, 1)),
            Preset::user("B", SliderValues::new(1, 1, 1, 1)),
        ]);

        assert_eq!(
            catalog.matching_preset(&SliderValues::new(35, 67, 5, 1)),
            PresetSelection::BuiltIn(2)
        );
        assert_eq!(
            catalog.matching_preset(&SliderValues::new(1, 1, 1, 1)),
            PresetSelection::User(1)
        );
    }

    #[test]
    fn test_display_projection() {
        let catalog = PresetCatalog::new(vec![
            Preset::user("A", SliderValues::new(1, 1, 1, 1)),
            Preset::user("B", SliderValues::new(2, 2, 2, 2)),
        ]);

        let entries = catalog.entries();
        assert_eq!(entries.len(), catalog.display_len());
        assert!(entries[4].is_separator());
        assert_eq!(entries[4].label(), USER_PRESETS_SEPARATOR);

        assert_eq!(catalog.selection_at(0), Some(PresetSelection::Custom));
        assert_eq!(catalog.selection_at(2), Some(PresetSelection::BuiltIn(1)));
        assert_eq!(catalog.selection_at(4), None);
        assert_eq!(catalog.selection_at(6), Some(PresetSelection::User(1)));
        assert_eq!(catalog.selection_at(7), None);

        for selection in [
            PresetSelection::Custom,
            PresetSelection::BuiltIn(0),
            PresetSelection::User(0),
            PresetSelection::User(1),
        ] {
            assert_eq!(catalog.selection_at(catalog.display_index(selection)), Some(selection));
        }
    }

    #[test]
    fn test_add_and_delete_rebuild_from_store() {
        let store = MemoryStore::new();
        let mut catalog = PresetCatalog::load(&store);
        assert!(catalog.user_defined().is_empty());

        catalog.add(&store, Preset::user("Mine", SliderValues::new(45, 70, 15, 3)));
        assert_eq!(catalog.user_defined().len(), 1);
        assert_eq!(PresetCatalog::load(&store), catalog);

        catalog.delete(&store, "Mine");
        assert!(catalog.user_defined().is_empty());
        assert!(store.load_user_presets().is_empty());
    }

    #[test]
    fn test_save_collision_rules() {
        let store = MemoryStore::new();
        let mut catalog = PresetCatalog::load(&store);
        let values = SliderValues::new(45, 70, 15, 3);

        assert_eq!(
            catalog.save_user_preset(&store, "standard", values, true),
            Err(PresetError::BuiltInName("Standard".to_string()))
        );
        assert_eq!(
            catalog.save_user_preset(&store, "custom", values, true),
            Err(PresetError::BuiltInName("Custom".to_string()))
        );
        assert_eq!(
            catalog.save_user_preset(&store, "  ", values, false),
            Err(PresetError::EmptyName)
        );
        assert_eq!(
            catalog.save_user_preset(&store, "a|b", values, false),
            Err(PresetError::InvalidName('|'))
        );

        let saved = catalog.save_user_preset(&store, " Mine ", values, false);
        assert_eq!(saved, Ok(PresetSelection::User(0)));
        assert_eq!(catalog.user_defined()[0].name, "Mine");

        let other = SliderValues::new(10, 20, 30, 1);
        assert_eq!(
            catalog.save_user_preset(&store, "MINE", other, false),
            Err(PresetError::AlreadyExists("Mine".to_string()))
        );

        let replaced = catalog.save_user_preset(&store, "MINE", other, true);
        assert_eq!(replaced, Ok(PresetSelection::User(0)));
        assert_eq!(catalog.user_defined().len(), 1);
        assert_eq!(catalog.user_defined()[0].name, "MINE");
        assert_eq!(catalog.user_defined()[0].values, other);
    }

    #[test]
    fn test_save_rejects_line_breaks() {
        let store = MemoryStore::new();
        let mut catalog = PresetCatalog::load(&store);
        let values = SliderValues::new(45, 70, 15, 3);

        for name in ["x\nStandard", "Verse\nChorus", "Verse\rChorus", "tab\there"] {
            assert_eq!(
                catalog.save_user_preset(&store, name, values, true),
                Err(PresetError::ControlCharacter)
            );
        }
        assert!(store.load_user_presets().is_empty());
        assert!(catalog.user_defined().is_empty());

        // surrounding whitespace is still trimmed away
        assert_eq!(validate_preset_name("Verse\n").as_deref(), Ok("Verse"));
    }
}
