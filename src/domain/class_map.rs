// ============================================================
// Layer 3 — Class Map
// ============================================================
// Maps class folder names ("aphids", "whitefly", ...) to dense,
// zero-based integer labels, in the order the classes were
// discovered.
//
// The map is written next to the model weights at the end of
// training and read back by the evaluator, so a prediction index
// always refers to the same class name it was trained on, no
// matter how the filesystem orders the test directory.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMap {
    /// Index i holds the name of class i
    names: Vec<String>,
}

impl ClassMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class and return its label.
    /// Registering a name twice returns the existing label.
    pub fn insert(&mut self, name: impl Into<String>) -> usize {
        let name = name.into();
        if let Some(idx) = self.index_of(&name) {
            return idx;
        }
        self.names.push(name);
        self.names.len() - 1
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl<S: Into<String>> FromIterator<S> for ClassMap {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut map = ClassMap::new();
        for name in iter {
            map.insert(name);
        }
        map
    }
}
