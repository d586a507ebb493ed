//! Module search over a `ModuleSource`
//!
//! Both iterators here pull from the source one record at a time. Nothing is
//! buffered, so a caller that stops early never touches the rest of the list.

use tracing::{debug, trace};

use super::error::{InspectError, InspectResult};
use super::module::{ModuleRecord, ModuleSource};
use super::Pid;

/// Finds the first module named exactly `name`.
pub fn find_module<S: ModuleSource>(source: &S, pid: Pid, name: &str) -> InspectResult<ModuleRecord> {
    let mut scanned = 0usize;
    for module in source.modules(pid)? {
        if module.name_is(name) {
            debug!(pid, module = %name, index = scanned, "module found");
            return Ok(module);
        }
        scanned += 1;
    }

    debug!(pid, module = %name, scanned, "module not found");
    Err(InspectError::module_not_found(name))
}

/// Lazy filter over a process's modules.
///
/// Each call to `next` advances the underlying listing until the predicate
/// accepts a record or the listing ends. Not restartable.
pub struct FilteredModules<I, F> {
    modules: I,
    predicate: F,
    index: usize,
}

impl<I, F> FilteredModules<I, F>
where
    I: Iterator<Item = ModuleRecord>,
    F: FnMut(&ModuleRecord) -> bool,
{
    pub(crate) fn new(modules: I, predicate: F) -> Self {
        Self { modules, predicate, index: 0 }
    }

    /// Number of source records examined so far.
    pub fn scanned(&self) -> usize {
        self.index
    }
}

impl<I, F> Iterator for FilteredModules<I, F>
where
    I: Iterator<Item = ModuleRecord>,
    F: FnMut(&ModuleRecord) -> bool,
{
    type Item = ModuleRecord;

    fn next(&mut self) -> Option<ModuleRecord> {
        for module in self.modules.by_ref() {
            self.index += 1;
            if (self.predicate)(&module) {
                trace!(index = self.index - 1, module = %module.name, "module matched");
                return Some(module);
            }
        }
        None
    }
}

/// Lazy filter whose predicate can fail.
///
/// Matches found before a failure are yielded normally, the failure is
/// yielded once as `Err`, and the iterator is exhausted from then on.
pub struct TryFilteredModules<I, F> {
    modules: Option<I>,
    predicate: F,
    index: usize,
}

impl<I, F, E> TryFilteredModules<I, F>
where
    I: Iterator<Item = ModuleRecord>,
    F: FnMut(&ModuleRecord) -> Result<bool, E>,
{
    pub(crate) fn new(modules: I, predicate: F) -> Self {
        Self { modules: Some(modules), predicate, index: 0 }
    }
}

impl<I, F, E> Iterator for TryFilteredModules<I, F>
where
    I: Iterator<Item = ModuleRecord>,
    F: FnMut(&ModuleRecord) -> Result<bool, E>,
{
    type Item = Result<ModuleRecord, E>;

    fn next(&mut self) -> Option<Self::Item> {
        let modules = self.modules.as_mut()?;
        while let Some(module) = modules.next() {
            self.index += 1;
            match (self.predicate)(&module) {
                Ok(true) => return Some(Ok(module)),
                Ok(false) => continue,
                Err(err) => {
                    debug!(index = self.index - 1, module = %module.name, "module predicate failed");
                    // Release the listing now rather than when the caller drops us.
                    self.modules = None;
                    return Some(Err(err));
                }
            }
        }
        self.modules = None;
        None
    }
}

impl<I, F, E> std::iter::FusedIterator for TryFilteredModules<I, F>
where
    I: Iterator<Item = ModuleRecord>,
    F: FnMut(&ModuleRecord) -> Result<bool, E>,
{
}
