use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::identifiedobject::ObjectInner;
use crate::objecttype::ObjectType;

/// Key of a wrapper obtained through an authority lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct RegistryKey {
    pub authority: String,
    pub code: String,
    pub kind: ObjectType,
}

/// The per context identity map of authority backed wrappers.
///
/// Looking up the same authority code twice through one context must hand out
/// the same wrapper, not a second one aliasing the same database object.
/// Entries are weak so the registry never keeps an object alive, dead entries
/// are swept on access.
pub(crate) struct WrapperRegistry {
    entries: RefCell<HashMap<RegistryKey, Weak<ObjectInner>>>,
}

impl WrapperRegistry {
    pub fn new() -> Self {
        WrapperRegistry {
            entries: RefCell::new(HashMap::new()),
        }
    }

    pub fn find(&self, key: &RegistryKey) -> Option<Rc<ObjectInner>> {
        let mut entries = self.entries.borrow_mut();
        match entries.get(key) {
            Some(weak) => match weak.upgrade() {
                Some(inner) => Some(inner),
                None => {
                    entries.remove(key);
                    None
                }
            },
            None => None,
        }
    }

    pub fn register(&self, key: RegistryKey, inner: &Rc<ObjectInner>) {
        let mut entries = self.entries.borrow_mut();
        entries.retain(|_, weak| weak.strong_count() > 0);
        entries.insert(key, Rc::downgrade(inner));
    }

    #[cfg(test)]
    pub fn live_count(&self) -> usize {
        self.entries
            .borrow()
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}
