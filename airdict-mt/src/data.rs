//! Translation tasks for meaning groups
//!
//! A [`MeaningGroup`] is flattened into an ordered list of
//! [`TranslationTask`]s, one per text field, and the translated strings are
//! scattered back by slot once the fan-out completes.
//!
//! # Example
//!
//! For a group with definitions `[("greeting", example "say hello"), ("hi", none)]`:
//!
//! ```ignore
//! [
//!     TranslationTask { source_text: "greeting",  slot: FieldSlot::Text(0) },
//!     TranslationTask { source_text: "say hello", slot: FieldSlot::Example(0) },
//!     TranslationTask { source_text: "hi",        slot: FieldSlot::Text(1) },
//! ]
//! ```

use airdict::{Definition, MeaningGroup};

use crate::error::{MtError, MtResult};

/// Which field of which definition a translated string belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSlot {
    /// `text` of the definition at this index
    Text(usize),
    /// `example` of the definition at this index
    Example(usize),
}

/// One field awaiting translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTask {
    pub source_text: String,
    pub slot: FieldSlot,
}

impl TranslationTask {
    pub fn new(source_text: impl Into<String>, slot: FieldSlot) -> Self {
        Self {
            source_text: source_text.into(),
            slot,
        }
    }
}

/// Flatten a group into tasks: for each definition in order, its `text`
/// then its `example` when present and not blank
pub fn flatten_group(group: &MeaningGroup) -> Vec<TranslationTask> {
    let mut tasks = Vec::with_capacity(group.definitions.len() * 2);
    for (index, definition) in group.definitions.iter().enumerate() {
        tasks.push(TranslationTask::new(
            definition.text.clone(),
            FieldSlot::Text(index),
        ));
        if let Some(example) = definition.example.as_ref().filter(|e| !e.trim().is_empty()) {
            tasks.push(TranslationTask::new(example.clone(), FieldSlot::Example(index)));
        }
    }
    tasks
}

/// Source texts of a task list, in order
pub fn source_texts(tasks: &[TranslationTask]) -> Vec<String> {
    tasks.iter().map(|t| t.source_text.clone()).collect()
}

/// Build a new group from `group` with translated fields filled in by slot
///
/// Source `text` and `example` values are copied unchanged. `translations`
/// must be in the same order as `tasks`.
///
/// # Errors
/// Returns `MtError::ReassemblyError` when the counts differ or a slot points
/// outside the group.
pub fn scatter_group(
    group: &MeaningGroup,
    tasks: &[TranslationTask],
    translations: Vec<String>,
) -> MtResult<MeaningGroup> {
    if tasks.len() != translations.len() {
        return Err(MtError::ReassemblyError(format!(
            "Expected {} translations, got {}",
            tasks.len(),
            translations.len()
        )));
    }

    let mut definitions: Vec<Definition> =
        group.definitions.iter().map(Definition::untranslated).collect();

    for (task, translated) in tasks.iter().zip(translations) {
        let (FieldSlot::Text(index) | FieldSlot::Example(index)) = task.slot;
        let definition = definitions.get_mut(index).ok_or_else(|| {
            MtError::ReassemblyError(format!("Slot {:?} is outside the group", task.slot))
        })?;
        match task.slot {
            FieldSlot::Text(_) => definition.text_translated = Some(translated),
            FieldSlot::Example(_) => definition.example_translated = Some(translated),
        }
    }

    Ok(MeaningGroup {
        part_of_speech: group.part_of_speech.clone(),
        definitions,
    })
}
