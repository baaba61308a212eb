//! Writer / Exposer.

use crate::store::Store;
use std::io::{self, Write};
use std::sync::Arc;

/// Type-erased per-kind writer, so the top-level [`Exposer`] can hold
/// writers for many distinct object kinds side by side.
pub trait ErasedKindWriter: Send + Sync {
    fn kind_name(&self) -> &str;
    /// Renders every owned store's header sequence and entries, in
    /// registration order. A [`KindWriter`] with more than one store (one
    /// per namespace) calls each store's own `write_all` in turn.
    fn render(&self) -> io::Result<Vec<u8>>;
}

/// A *metrics writer*: owns one or more stores for a single kind.
pub struct KindWriter<K> {
    kind_name: String,
    stores: Vec<Store<K>>,
}

impl<K> KindWriter<K> {
    pub fn new(kind_name: impl Into<String>, stores: Vec<Store<K>>) -> Self {
        Self {
            kind_name: kind_name.into(),
            stores,
        }
    }
}

impl<K: Send + Sync + 'static> ErasedKindWriter for KindWriter<K> {
    fn kind_name(&self) -> &str {
        &self.kind_name
    }

    fn render(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        for store in &self.stores {
            store.write_all(&mut buf)?;
        }
        Ok(buf)
    }
}

/// The top-level exposer: iterates all writers concurrently and writes the
/// union of their lines to a scrape sink in a stable (enabled-kinds) order.
#[derive(Clone)]
pub struct Exposer {
    writers: Vec<Arc<dyn ErasedKindWriter>>,
}

impl Exposer {
    /// `writers` must already be in enabled-kinds order; the exposer never
    /// reorders them.
    pub fn new(writers: Vec<Arc<dyn ErasedKindWriter>>) -> Self {
        Self { writers }
    }

    pub fn kind_names(&self) -> Vec<&str> {
        self.writers.iter().map(|w| w.kind_name()).collect()
    }

    /// Renders every writer's stores concurrently (one blocking task per
    /// writer, so a slow kind cannot stall the others), then performs one
    /// serialized write per writer into `sink`, preserving enabled-kinds
    /// order and line-level atomicity of the response.
    pub async fn write_all(&self, sink: &mut impl Write) -> io::Result<()> {
        let tasks: Vec<_> = self
            .writers
            .iter()
            .cloned()
            .map(|w| tokio::task::spawn_blocking(move || w.render()))
            .collect();

        let mut buffers = Vec::with_capacity(tasks.len());
        for task in tasks {
            let buf = task.await.map_err(|e| io::Error::other(e.to_string()))??;
            buffers.push(buf);
        }
        for buf in buffers {
            sink.write_all(&buf)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::Stability;
    use crate::generator::{Composer, FamilyGenerator, FamilyGeneratorDescriptor};
    use crate::key::ObjectKey;
    use crate::sample::Sample;
    use crate::store::Writer;

    #[derive(Clone)]
    struct A {
        n: String,
    }
    #[derive(Clone)]
    struct B {
        n: String,
    }

    fn writer_for<K: Clone>(
        name: &str,
        to_label: impl Fn(&K) -> String + Send + Sync + 'static,
    ) -> (Writer<K>, KindWriter<K>) {
        let gens = vec![FamilyGenerator::new(
            FamilyGeneratorDescriptor::gauge(format!("kube_{name}_info"), "help", Stability::Stable),
            |_: &K| vec![Sample::new("", 1.0)],
        )];
        let composer = Composer::new(gens, Arc::new(move |o: &K| vec![("name".to_string(), to_label(o))]));
        let w = Writer::new(composer);
        let kw = KindWriter::new(name, vec![w.as_reader()]);
        (w, kw)
    }

    #[tokio::test]
    async fn concatenates_writers_in_registration_order() {
        let (wa, kwa) = writer_for::<A>("a", |o| o.n.clone());
        let (wb, kwb) = writer_for::<B>("b", |o| o.n.clone());
        wa.put(ObjectKey::cluster_scoped("x"), &A { n: "x".into() });
        wb.put(ObjectKey::cluster_scoped("y"), &B { n: "y".into() });

        let exposer = Exposer::new(vec![Arc::new(kwa), Arc::new(kwb)]);
        let mut buf = Vec::new();
        exposer.write_all(&mut buf).await.unwrap();
        let text = String::from_utf8(buf).unwrap();
        let a_pos = text.find("kube_a_info").unwrap();
        let b_pos = text.find("kube_b_info").unwrap();
        assert!(a_pos < b_pos);
    }
}
