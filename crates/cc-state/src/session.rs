//! Parameter edit session
//!
//! Headless model of the parameter dialog: four slider fields, the preset
//! selection, and the preset/settings actions.
//!
//! Field changes made while loading a preset or the stored settings happen in
//! the [`EditState::ProgrammaticUpdate`] state and never trigger preset
//! matching, so a half-applied preset cannot select some other entry on the
//! way. Only [`EditState::UserEdit`] changes re-run the match.

use cc_core::{CURVE_INDEX_MAX, SLIDER_MAX, SLIDER_MIN, SliderValues, SpliceParams};

use crate::preset::{CatalogEntry, Preset, PresetCatalog, PresetError, PresetSelection};
use crate::store::SettingsStore;

/// Who is changing the fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
    /// Changes come from the user; each one re-runs preset matching
    #[default]
    UserEdit,
    /// Bulk assignment in progress; matching is suspended
    ProgrammaticUpdate,
}

/// One of the four edited fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Splice,
    Crisp,
    Offset,
    Curve,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    catalog: PresetCatalog,
    values: SliderValues,
    selection: PresetSelection,
    state: EditState,
}

impl EditSession {
    /// Load the catalog and the last-used settings from `store`
    pub fn open(store: &dyn SettingsStore) -> Self {
        Self::with_values(PresetCatalog::load(store), store.load_settings())
    }

    /// Start from `values` (clamped) and select the matching preset
    pub fn with_values(catalog: PresetCatalog, values: SliderValues) -> Self {
        let mut session = Self {
            catalog,
            values: SliderValues::default(),
            selection: PresetSelection::Custom,
            state: EditState::UserEdit,
        };
        session.assign_all(values);
        session.rematch();
        session
    }

    pub fn values(&self) -> SliderValues {
        self.values
    }

    pub fn selection(&self) -> PresetSelection {
        self.selection
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    pub fn selected_preset(&self) -> Option<&Preset> {
        self.catalog.get(self.selection)
    }

    pub fn selected_name(&self) -> &str {
        self.catalog.name_of(self.selection)
    }

    /// Row of the current selection in the display list
    pub fn selected_display_index(&self) -> usize {
        self.catalog.display_index(self.selection)
    }

    /// Physical parameters for the current values
    pub fn splice_params(&self) -> SpliceParams {
        self.values.to_splice_params()
    }

    pub fn set_splice(&mut self, value: i32) {
        self.field_changed(Field::Splice, value);
    }

    pub fn set_crisp(&mut self, value: i32) {
        self.field_changed(Field::Crisp, value);
    }

    pub fn set_offset(&mut self, value: i32) {
        self.field_changed(Field::Offset, value);
    }

    pub fn set_curve(&mut self, index: i32) {
        self.field_changed(Field::Curve, index);
    }

    fn field_changed(&mut self, field: Field, value: i32) {
        match field {
            Field::Splice => self.values.splice = value.clamp(SLIDER_MIN, SLIDER_MAX),
            Field::Crisp => self.values.crisp = value.clamp(SLIDER_MIN, SLIDER_MAX),
            Field::Offset => self.values.offset = value.clamp(SLIDER_MIN, SLIDER_MAX),
            Field::Curve => self.values.curve = value.clamp(0, CURVE_INDEX_MAX),
        }

        match self.state {
            EditState::UserEdit => self.rematch(),
            EditState::ProgrammaticUpdate => {}
        }
    }

    /// Assign every field with matching suspended
    fn assign_all(&mut self, values: SliderValues) {
        log::trace!("{:?} -> {:?}", self.state, EditState::ProgrammaticUpdate);
        self.state = EditState::ProgrammaticUpdate;

        self.field_changed(Field::Splice, values.splice);
        self.field_changed(Field::Crisp, values.crisp);
        self.field_changed(Field::Offset, values.offset);
        self.field_changed(Field::Curve, values.curve);

        log::trace!("{:?} -> {:?}", self.state, EditState::UserEdit);
        self.state = EditState::UserEdit;
    }

    fn rematch(&mut self) {
        self.selection = self.catalog.matching_preset(&self.values);
    }

    /// Select a catalog entry. Custom keeps the current values; any other
    /// entry loads its values.
    pub fn select(&mut self, selection: PresetSelection) {
        let Some(preset) = self.catalog.get(selection) else {
            self.selection = PresetSelection::Custom;
            return;
        };

        let values = preset.values;
        log::debug!("Loading preset '{}'", preset.name);
        self.assign_all(values);
        self.selection = selection;
    }

    /// Select a row of the display list. The separator row moves on to the
    /// next row, or back to Custom when it is the last one.
    pub fn select_display_index(&mut self, index: usize) -> PresetSelection {
        let entries = self.catalog.entries();
        let Some(entry) = entries.get(index) else {
            return self.selection;
        };

        let index = match entry {
            CatalogEntry::Separator(_) if index + 1 < entries.len() => index + 1,
            CatalogEntry::Separator(_) => 0,
            _ => index,
        };

        if let Some(selection) = self.catalog.selection_at(index) {
            self.select(selection);
        }
        self.selection
    }

    /// Only user presets can be deleted
    pub fn can_delete(&self) -> bool {
        matches!(self.selection, PresetSelection::User(_))
    }

    /// Save the current values as a user preset and select it
    pub fn save_preset(
        &mut self,
        store: &dyn SettingsStore,
        name: &str,
        overwrite: bool,
    ) -> Result<PresetSelection, PresetError> {
        let selection = self
            .catalog
            .save_user_preset(store, name, self.values, overwrite)?;
        self.selection = selection;
        Ok(selection)
    }

    /// Delete the selected user preset and fall back to Custom.
    /// Returns the deleted name, or `None` if the selection is not a user preset.
    pub fn delete_selected(&mut self, store: &dyn SettingsStore) -> Option<String> {
        if !self.can_delete() {
            return None;
        }

        let name = self.selected_preset()?.name.clone();
        self.catalog.delete(store, &name);
        self.selection = PresetSelection::Custom;
        Some(name)
    }

    /// Persist the current values as the last-used settings
    pub fn commit(&self, store: &dyn SettingsStore) {
        store.save_settings(&self.values);
    }
}
