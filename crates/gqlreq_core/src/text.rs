//! Name interning.
//!
//! Operation, field, variable and fragment names are interned once by the
//! lexer and compared as `Text` handles afterwards.

use rustc_hash::FxHashMap;
use std::cell::RefCell;

/// An interned name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Text(u32);

impl Text {
    #[must_use]
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

/// A string interner that deduplicates names.
#[derive(Debug)]
pub struct Interner {
    map: RefCell<FxHashMap<Box<str>, Text>>,
    strings: RefCell<Vec<Box<str>>>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    /// Creates a new interner with the built-in scalars and executable
    /// keywords pre-registered.
    #[must_use]
    pub fn new() -> Self {
        let interner = Self {
            map: RefCell::new(FxHashMap::default()),
            strings: RefCell::new(Vec::new()),
        };

        for keyword in [
            "Int",
            "Float",
            "String",
            "Boolean",
            "ID",
            "query",
            "mutation",
            "subscription",
            "fragment",
            "on",
            "true",
            "false",
            "null",
            "__typename",
        ] {
            interner.intern(keyword);
        }

        interner
    }

    /// Interns a string, returning its identifier.
    pub fn intern(&self, s: &str) -> Text {
        if let Some(&id) = self.map.borrow().get(s) {
            return id;
        }

        let mut strings = self.strings.borrow_mut();
        let id = Text(u32::try_from(strings.len()).unwrap_or(u32::MAX));
        strings.push(s.into());
        self.map.borrow_mut().insert(s.into(), id);
        id
    }

    /// Returns the identifier for `s` if it was interned before.
    #[must_use]
    pub fn lookup(&self, s: &str) -> Option<Text> {
        self.map.borrow().get(s).copied()
    }

    /// Gets the string for an identifier.
    #[must_use]
    pub fn get(&self, id: Text) -> String {
        self.strings
            .borrow()
            .get(id.0 as usize)
            .map(|s| s.to_string())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.borrow().is_empty()
    }
}
