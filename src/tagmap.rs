use crate::key::CanonicalKey;
use crate::value::Coerced;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Ordered, append-only multi-map from canonical keys to string values.
///
/// Keys keep the order they were first inserted in and values keep the order they were appended in.
/// A key is never stored with an empty value list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap {
    entries: Vec<(CanonicalKey, Vec<String>)>,
    index: HashMap<CanonicalKey, usize>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_single(&mut self, key: CanonicalKey, value: impl Into<String>) {
        self.slot(key).push(value.into());
    }

    /// Appends every value to `key`. An empty list leaves the map untouched.
    pub fn add_list<I, S>(&mut self, key: CanonicalKey, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values = values.into_iter().map(Into::into).peekable();
        if values.peek().is_none() {
            return;
        }
        self.slot(key).extend(values);
    }

    pub fn add(&mut self, key: CanonicalKey, value: Coerced) {
        match value {
            Coerced::Single(s) => self.add_single(key, s),
            Coerced::List(l) => self.add_list(key, l),
        }
    }

    fn slot(&mut self, key: CanonicalKey) -> &mut Vec<String> {
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.index.insert(key.clone(), idx);
                self.entries.push((key, Vec::new()));
                idx
            }
        };
        &mut self.entries[idx].1
    }

    pub fn get(&self, key: &CanonicalKey) -> Option<&[String]> {
        self.index.get(key).map(|&idx| self.entries[idx].1.as_slice())
    }

    pub fn get_id(&self, id: &str) -> Option<&[String]> {
        self.get(&CanonicalKey::id(id))
    }

    pub fn get_combined(&self, id: &str, description: &str) -> Option<&[String]> {
        self.get(&CanonicalKey::combined(id, description))
    }

    /// Looks up a combined key whose description matches ignoring ASCII case. The first such key in
    /// insertion order wins.
    pub fn get_combined_ignore_case(&self, id: &str, description: &str) -> Option<&[String]> {
        self.entries.iter().find_map(|(key, values)| match key {
            CanonicalKey::Combined(i, d) if i == id && d.eq_ignore_ascii_case(description) => Some(values.as_slice()),
            _ => None,
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = (&CanonicalKey, &[String])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &CanonicalKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for TagMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(&key.to_string(), values)?;
        }
        map.end()
    }
}
