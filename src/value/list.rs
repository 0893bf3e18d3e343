//! Homogeneous list of object instances
//!
//! A list only holds instances built from its element schema. Index-based
//! operations fail instead of panicking.

use std::slice;

use crate::errors::{ObjError, ObjResult};
use crate::schema::{ObjectInstance, Schema};

/// List of object instances sharing one element schema
#[derive(Debug, Clone)]
pub struct ObjectList {
    element: Schema,
    items: Vec<ObjectInstance>,
}

impl ObjectList {
    /// Creates an empty list for instances of `element`
    pub fn new(element: &Schema) -> Self {
        Self {
            element: element.clone(),
            items: Vec::new(),
        }
    }

    /// Creates a list holding `items`.
    ///
    /// # Errors
    ///
    /// `ListElementMismatch` if any item was built from another schema.
    pub fn from_items(element: &Schema, items: Vec<ObjectInstance>) -> ObjResult<Self> {
        let list = Self::new(element);
        for item in &items {
            list.check_item(item)?;
        }
        Ok(Self { items, ..list })
    }

    /// The element schema
    pub fn element(&self) -> &Schema {
        &self.element
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ObjectInstance] {
        &self.items
    }

    pub fn iter(&self) -> slice::Iter<'_, ObjectInstance> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, ObjectInstance> {
        self.items.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&ObjectInstance> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ObjectInstance> {
        self.items.get_mut(index)
    }

    /// Appends an item
    pub fn push(&mut self, item: ObjectInstance) -> ObjResult<()> {
        self.check_item(&item)?;
        self.items.push(item);
        Ok(())
    }

    /// Inserts an item before position `index`, which must already exist.
    pub fn insert(&mut self, index: usize, item: ObjectInstance) -> ObjResult<()> {
        self.check_index(index)?;
        self.check_item(&item)?;
        self.items.insert(index, item);
        Ok(())
    }

    /// Replaces the item at `index`, returning the previous one
    pub fn set(&mut self, index: usize, item: ObjectInstance) -> ObjResult<ObjectInstance> {
        self.check_index(index)?;
        self.check_item(&item)?;
        Ok(std::mem::replace(&mut self.items[index], item))
    }

    /// Removes and returns the item at `index`
    pub fn remove(&mut self, index: usize) -> ObjResult<ObjectInstance> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Appends every item, or none if any of them has the wrong schema
    pub fn extend<I>(&mut self, items: I) -> ObjResult<()>
    where
        I: IntoIterator<Item = ObjectInstance>,
    {
        let items: Vec<ObjectInstance> = items.into_iter().collect();
        for item in &items {
            self.check_item(item)?;
        }
        self.items.extend(items);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn check_item(&self, item: &ObjectInstance) -> ObjResult<()> {
        if item.schema() != &self.element {
            return Err(ObjError::ListElementMismatch {
                expected: self.element.name(),
                found: item.schema().name(),
            });
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> ObjResult<()> {
        if index >= self.items.len() {
            return Err(ObjError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }
}

impl PartialEq for ObjectList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<'a> IntoIterator for &'a ObjectList {
    type Item = &'a ObjectInstance;
    type IntoIter = slice::Iter<'a, ObjectInstance>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
