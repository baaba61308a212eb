//! Per-kind store.
//!
//! Mirrors `kube_runtime::reflector::store`'s `Writer`/`Store` split: a
//! single exclusive [`Writer`] is driven by one reflector, and any number of
//! cheap [`Store`] read handles may be cloned out of it. Entries here hold
//! *pre-rendered* exposition bytes for one object's full metric set, not the
//! typed object itself.

use crate::family::FamilyHeader;
use crate::generator::Composer;
use crate::key::ObjectKey;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;

type Entries = Arc<RwLock<HashMap<ObjectKey, Arc<[u8]>>>>;

/// The writable handle. Not `Clone` — only one reflector may drive a given
/// store; a second writer clobbering state during a `Restarted`-equivalent
/// relist would be a bug.
pub struct Writer<K> {
    composer: Arc<Composer<K>>,
    entries: Entries,
}

impl<K> Writer<K> {
    pub fn new(composer: Composer<K>) -> Self {
        Self {
            composer: Arc::new(composer),
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn as_reader(&self) -> Store<K> {
        Store {
            composer: Arc::clone(&self.composer),
            entries: Arc::clone(&self.entries),
        }
    }

    fn render_block(&self, obj: &K) -> Arc<[u8]> {
        let families = self.composer.compose(obj);
        let mut buf = Vec::new();
        for family in &families {
            // Intentionally no header here: headers are written once per
            // `writeAll` call, not per entry.
            for sample in &family.samples {
                sample.render_into(&mut buf).expect("writing to a Vec<u8> is infallible");
            }
        }
        buf.into()
    }

    /// `add`/`update`: runs every enabled generator and overwrites
    /// any prior entry under `key`. Idempotent: `add(x); add(x) == add(x)`.
    pub fn put(&self, key: ObjectKey, obj: &K) {
        let block = self.render_block(obj);
        self.entries.write().insert(key, block);
    }

    /// `delete`: removing an absent key is a no-op.
    pub fn delete(&self, key: &ObjectKey) {
        self.entries.write().remove(key);
    }

    /// Full-relist replacement, equivalent to `watcher::Event::Restarted`:
    /// entries for objects no longer present are dropped, everything else
    /// is (re)rendered. Cannot be done as a single atomic swap without a
    /// second allocation of the whole map, but no individual entry is ever
    /// observed half-written.
    pub fn replace_all<'a>(&self, items: impl IntoIterator<Item = (ObjectKey, &'a K)>)
    where
        K: 'a,
    {
        let rendered: HashMap<ObjectKey, Arc<[u8]>> =
            items.into_iter().map(|(k, obj)| (k, self.render_block(obj))).collect();
        *self.entries.write() = rendered;
    }

    pub fn headers(&self) -> Vec<FamilyHeader> {
        self.composer.headers()
    }
}

/// A readable, cheaply-`Clone`able handle onto the backing store.
#[derive(Clone)]
pub struct Store<K> {
    composer: Arc<Composer<K>>,
    entries: Entries,
}

impl<K> Store<K> {
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<ObjectKey> {
        self.entries.read().keys().cloned().collect()
    }

    pub fn headers(&self) -> Vec<FamilyHeader> {
        self.composer.headers()
    }

    /// Writes the header sequence once, then every entry's rendered block,
    /// in a stable (sorted-by-key) order, so the output is byte-stable for a
    /// given snapshot.
    ///
    /// The snapshot is taken by cloning the `Arc`-backed map under a single
    /// read-lock acquisition, so concurrent `put`/`delete` calls can neither
    /// tear an individual entry nor make it appear/disappear mid-write.
    pub fn write_all(&self, sink: &mut impl Write) -> io::Result<()> {
        for header in self.composer.headers() {
            header.render_into(sink)?;
        }
        let snapshot = self.entries.read().clone();
        let mut keys: Vec<&ObjectKey> = snapshot.keys().collect();
        keys.sort();
        for key in keys {
            sink.write_all(&snapshot[key])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::Stability;
    use crate::generator::{FamilyGenerator, FamilyGeneratorDescriptor};
    use crate::sample::Sample;
    use std::sync::Arc as StdArc;

    #[derive(Clone)]
    struct Obj {
        ns: String,
        name: String,
        ready: bool,
    }

    fn composer() -> Composer<Obj> {
        let gens = vec![FamilyGenerator::new(
            FamilyGeneratorDescriptor::gauge("kube_thing_info", "help", Stability::Stable),
            |o: &Obj| vec![Sample::new("", if o.ready { 1.0 } else { 0.0 })],
        )];
        Composer::new(
            gens,
            StdArc::new(|o: &Obj| vec![("namespace".to_string(), o.ns.clone()), ("thing".to_string(), o.name.clone())]),
        )
    }

    fn key(ns: &str, name: &str) -> ObjectKey {
        ObjectKey::new(Some(ns), name)
    }

    #[test]
    fn add_twice_is_idempotent() {
        let w = Writer::new(composer());
        let obj = Obj { ns: "ns1".into(), name: "a".into(), ready: true };
        w.put(key("ns1", "a"), &obj);
        let first = w.as_reader();
        w.put(key("ns1", "a"), &obj);
        let second = w.as_reader();
        assert_eq!(first.len(), second.len());
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn delete_after_add_restores_prior_state() {
        let w = Writer::new(composer());
        let obj = Obj { ns: "ns1".into(), name: "a".into(), ready: true };
        assert_eq!(w.as_reader().len(), 0);
        w.put(key("ns1", "a"), &obj);
        w.delete(&key("ns1", "a"));
        assert_eq!(w.as_reader().len(), 0);
    }

    #[test]
    fn deleting_absent_key_is_a_no_op() {
        let w = Writer::new(composer());
        w.delete(&key("ns1", "missing"));
        assert_eq!(w.as_reader().len(), 0);
    }

    #[test]
    fn write_all_emits_header_once_then_every_entry() {
        let w = Writer::new(composer());
        w.put(key("ns1", "a"), &Obj { ns: "ns1".into(), name: "a".into(), ready: true });
        w.put(key("ns1", "b"), &Obj { ns: "ns1".into(), name: "b".into(), ready: false });
        let store = w.as_reader();
        let mut buf = Vec::new();
        store.write_all(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.matches("# HELP").count(), 1);
        assert_eq!(text.matches("# TYPE").count(), 1);
        assert!(text.contains("thing=\"a\""));
        assert!(text.contains("thing=\"b\""));
    }

    #[test]
    fn write_all_is_byte_stable_across_repeated_calls() {
        let w = Writer::new(composer());
        w.put(key("ns1", "a"), &Obj { ns: "ns1".into(), name: "a".into(), ready: true });
        w.put(key("ns1", "b"), &Obj { ns: "ns1".into(), name: "b".into(), ready: false });
        let store = w.as_reader();
        let mut first = Vec::new();
        let mut second = Vec::new();
        store.write_all(&mut first).unwrap();
        store.write_all(&mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn replace_all_drops_entries_not_in_the_new_set() {
        let w = Writer::new(composer());
        w.put(key("ns1", "a"), &Obj { ns: "ns1".into(), name: "a".into(), ready: true });
        let keep = Obj { ns: "ns1".into(), name: "b".into(), ready: true };
        w.replace_all(vec![(key("ns1", "b"), &keep)]);
        let store = w.as_reader();
        assert_eq!(store.len(), 1);
        assert_eq!(store.keys(), vec![key("ns1", "b")]);
    }
}
