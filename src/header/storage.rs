use super::{label, Error, Label, Parameter};

/// Caller owned, fixed capacity storage for decoded header parameters.
///
/// The header decoder never allocates. It fills the slots of the storage in
/// order and hands out [`ParameterList`] handles, which are index ranges into
/// the storage. Several headers, e.g. the body header and the header of a
/// recipient, can share one storage.
///
/// ```
/// # use cose_recipient::header::{Parameter, ParameterStorage};
/// let mut slots: [Option<Parameter<'_>>; 10] = [None; 10];
/// let storage = ParameterStorage::new(&mut slots);
/// assert_eq!(storage.capacity(), 10);
/// assert!(storage.is_empty());
/// ```
#[derive(Debug)]
pub struct ParameterStorage<'s, 'b> {
    slots: &'s mut [Option<Parameter<'b>>],
    used: usize,
}

impl<'s, 'b> ParameterStorage<'s, 'b> {
    /// Creates an empty storage on top of `slots`.
    ///
    /// Previous contents of the slots are discarded.
    pub fn new(slots: &'s mut [Option<Parameter<'b>>]) -> Self {
        slots.iter_mut().for_each(|slot| *slot = None);
        Self { slots, used: 0 }
    }

    /// The total number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The number of slots in use.
    pub const fn len(&self) -> usize {
        self.used
    }

    /// Returns `true` if no slot is in use.
    pub const fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Iterates over the parameters referenced by `list`.
    ///
    /// A list that was released, because the decode attempt that produced it
    /// failed, yields nothing.
    pub fn parameters(&self, list: ParameterList) -> impl Iterator<Item = &Parameter<'b>> + '_ {
        let end = list.end.min(self.used);
        let start = list.start.min(end);
        self.slots[start..end].iter().flatten()
    }

    /// Finds the parameter with `label` in `list`.
    pub fn find(&self, list: ParameterList, label: Label<'_>) -> Option<&Parameter<'b>> {
        self.parameters(list).find(|p| p.label == label)
    }

    /// The integer value of the `alg` parameter in `list`.
    ///
    /// Returns `None` if there is no `alg` parameter or if it is a text
    /// string.
    pub fn algorithm(&self, list: ParameterList) -> Option<i64> {
        self.find(list, Label::Int(label::ALGORITHM))
            .and_then(|p| p.value.as_int())
    }

    /// The value of the `kid` parameter in `list`.
    pub fn key_id(&self, list: ParameterList) -> Option<&'b [u8]> {
        self.find(list, Label::Int(label::KEY_ID))
            .and_then(|p| p.value.as_bytes())
    }

    pub(crate) fn push(&mut self, parameter: Parameter<'b>) -> Result<usize, Error> {
        let capacity = self.slots.len();
        let index = self.used;
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(Error::StorageExhausted { capacity })?;
        *slot = Some(parameter);
        self.used += 1;
        Ok(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Parameter<'b>> {
        self.slots[..self.used].get_mut(index)?.as_mut()
    }

    /// Releases every slot at or after `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        if len < self.used {
            self.slots[len..self.used]
                .iter_mut()
                .for_each(|slot| *slot = None);
            self.used = len;
        }
    }
}

/// A handle to the parameters of one header inside of a
/// [`ParameterStorage`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParameterList {
    start: usize,
    end: usize,
}

impl ParameterList {
    pub(crate) const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The number of parameters in this list.
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the header had no parameters.
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub(crate) const fn indices(&self) -> core::ops::Range<usize> {
        self.start..self.end
    }
}
