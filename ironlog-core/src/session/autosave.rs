use std::collections::HashMap;

use crate::db::models::{ExerciseSet, SetField, SetFieldKind};

/// Last value known to be stored for each set cell.
///
/// Lives for one screen activation and is never persisted.
#[derive(Debug, Default, Clone)]
pub struct AutoSaveCache {
    saved: HashMap<(i32, SetFieldKind), SetField>,
}

impl AutoSaveCache {
    pub fn seeded<'s, I>(sets: I) -> Self
    where
        I: IntoIterator<Item = &'s ExerciseSet>,
    {
        let mut cache = Self::default();
        for set in sets {
            for kind in SetFieldKind::ALL {
                cache.record(set.id, set.field(kind));
            }
        }
        cache
    }

    pub fn is_unchanged(&self, set_id: i32, field: SetField) -> bool {
        self.saved.get(&(set_id, field.kind())) == Some(&field)
    }

    pub fn record(&mut self, set_id: i32, field: SetField) {
        self.saved.insert((set_id, field.kind()), field);
    }
}
