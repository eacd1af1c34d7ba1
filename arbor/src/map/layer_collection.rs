use std::ops::{Index, IndexMut};

use crate::layer::Layer;

/// Ordered set of the map layers. Layers are drawn from the first to the last one.
///
/// Hidden layers keep their place in the collection, but are skipped by
/// [`LayerCollection::iter_visible`]. Layers are stored as trait objects; use
/// [`Layer::as_any`] to get back the concrete type.
#[derive(Default)]
pub struct LayerCollection(Vec<LayerEntry>);

struct LayerEntry {
    layer: Box<dyn Layer>,
    is_hidden: bool,
}

impl std::fmt::Debug for LayerCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerCollection")
            .field("len", &self.0.len())
            .finish()
    }
}

impl LayerCollection {
    /// Appends a layer to the top of the collection.
    pub fn push(&mut self, layer: impl Layer + 'static) {
        self.0.push(layer.into());
    }

    /// Removes the top layer and returns it.
    pub fn pop(&mut self) -> Option<Box<dyn Layer>> {
        self.0.pop().map(|entry| entry.layer)
    }

    /// Removes the layer at `index`, shifting all layers after it down.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Box<dyn Layer> {
        self.0.remove(index).layer
    }

    /// Keeps only the layers for which `f` returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&dyn Layer) -> bool,
    {
        self.0.retain(|entry| f(&*entry.layer))
    }

    /// Number of layers, including the hidden ones.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no layers.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Layer at `index`.
    pub fn get(&self, index: usize) -> Option<&dyn Layer> {
        self.0.get(index).map(|entry| &*entry.layer)
    }

    /// Iterates over all layers, including the hidden ones.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Layer> + '_ {
        self.0.iter().map(|entry| &*entry.layer)
    }

    /// Iterates over the layers that are not hidden.
    pub fn iter_visible(&self) -> impl Iterator<Item = &dyn Layer> + '_ {
        self.0
            .iter()
            .filter(|entry| !entry.is_hidden)
            .map(|entry| &*entry.layer)
    }

    /// Hides the layer at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn hide(&mut self, index: usize) {
        self.0[index].is_hidden = true;
    }

    /// Shows a previously hidden layer.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn show(&mut self, index: usize) {
        self.0[index].is_hidden = false;
    }

    /// Returns false if the layer at `index` is hidden or does not exist.
    pub fn is_visible(&self, index: usize) -> bool {
        self.0.get(index).is_some_and(|entry| !entry.is_hidden)
    }
}

impl Index<usize> for LayerCollection {
    type Output = dyn Layer;

    fn index(&self, index: usize) -> &Self::Output {
        &*self.0[index].layer
    }
}

impl IndexMut<usize> for LayerCollection {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut *self.0[index].layer
    }
}

impl<L: Into<LayerEntry>, T: IntoIterator<Item = L>> From<T> for LayerCollection {
    fn from(value: T) -> Self {
        Self(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Layer + 'static> From<T> for LayerEntry {
    fn from(value: T) -> Self {
        Self {
            layer: Box::new(value),
            is_hidden: false,
        }
    }
}

impl From<Box<dyn Layer>> for LayerEntry {
    fn from(value: Box<dyn Layer>) -> Self {
        Self {
            layer: value,
            is_hidden: false,
        }
    }
}
