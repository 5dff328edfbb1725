use std::sync::Arc;

use tracing::info;

use crate::builder::persistence::{LoadOrigin, PersistenceBridge};
use crate::builder::store::SectionStore;
use crate::builder::template::TemplateSelector;
use crate::storage::{KeyValueStore, StorageError};

/// One editing session: the section store and the template choice, both
/// persisted through the same storage collaborator.
pub struct Editor {
    pub sections: SectionStore,
    pub templates: TemplateSelector,
}

impl Editor {
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let backend = storage.backend();
        let (sections, origin) = SectionStore::open(PersistenceBridge::new(storage.clone()))?;
        let templates = TemplateSelector::load(storage)?;

        let origin = match origin {
            LoadOrigin::Restored => "restored",
            LoadOrigin::Repaired => "repaired",
            LoadOrigin::Seeded => "seeded",
        };
        info!(
            "Editor session {origin} from {backend} storage: {} sections, template {}",
            sections.sections().len(),
            templates.active()
        );
        Ok(Self {
            sections,
            templates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::kind::SectionKind;
    use crate::builder::template::TemplateId;
    use crate::storage::MemoryStore;

    #[test]
    fn test_template_change_leaves_sections_untouched() {
        let storage = Arc::new(MemoryStore::new());
        let mut editor = Editor::open(storage.clone()).unwrap();
        editor
            .sections
            .add_section(SectionKind::Footer, None)
            .unwrap();
        let before = editor.sections.document().clone();

        editor.templates.select(TemplateId::Creative).unwrap();
        assert_eq!(editor.sections.document(), &before);

        let reopened = Editor::open(storage).unwrap();
        assert_eq!(reopened.templates.active(), TemplateId::Creative);
        assert_eq!(reopened.sections.document(), &before);
    }
}
