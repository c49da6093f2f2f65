use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Trail;
use crate::containers::SparseSet;
use crate::engine::EmptyDomain;
use crate::engine::notifications::SetDomainEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SetChange {
    Enforce(usize),
    Remove(usize),
}

impl SetChange {
    pub(crate) fn event(&self) -> SetDomainEvent {
        match self {
            SetChange::Enforce(_) => SetDomainEvent::Enforce,
            SetChange::Remove(_) => SetDomainEvent::Remove,
        }
    }
}

/// The domain of a set variable over the universe `0..n`: every set `S` with
/// `kernel ⊆ S ⊆ envelope`.
#[derive(Debug, Clone)]
pub struct SetDomain {
    kernel: SparseSet,
    envelope: SparseSet,
    trail: Trail<SetChange>,
}

impl SetDomain {
    pub(crate) fn new(
        universe: usize,
        kernel: &[usize],
        envelope: &[usize],
        checkpoint: usize,
    ) -> Result<SetDomain, ConstraintOperationError> {
        let mut kernel_set = SparseSet::new_empty(universe);
        let mut envelope_set = SparseSet::new_empty(universe);
        for &value in envelope {
            if value >= universe {
                return Err(ConstraintOperationError::ValueOutsideUniverse(value));
            }
            let _ = envelope_set.insert(value);
        }
        for &value in kernel {
            if value >= universe {
                return Err(ConstraintOperationError::ValueOutsideUniverse(value));
            }
            if !envelope_set.contains(value) {
                return Err(ConstraintOperationError::KernelNotInEnvelope);
            }
            let _ = kernel_set.insert(value);
        }

        let mut trail = Trail::default();
        for _ in 0..checkpoint {
            trail.new_checkpoint();
        }

        Ok(SetDomain {
            kernel: kernel_set,
            envelope: envelope_set,
            trail,
        })
    }

    pub fn kernel(&self) -> &SparseSet {
        &self.kernel
    }

    pub fn envelope(&self) -> &SparseSet {
        &self.envelope
    }

    pub fn universe(&self) -> usize {
        self.envelope.capacity()
    }

    pub(crate) fn trail_len(&self) -> usize {
        self.trail.len()
    }

    pub(crate) fn trail_entry(&self, index: usize) -> SetChange {
        self.trail[index]
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint();
    }

    pub(crate) fn synchronise(&mut self, checkpoint: usize) {
        if checkpoint >= self.trail.get_checkpoint() {
            return;
        }
        let SetDomain {
            kernel,
            envelope,
            trail,
        } = self;
        for change in trail.synchronise(checkpoint) {
            match change {
                SetChange::Enforce(value) => {
                    let _ = kernel.remove(value);
                }
                SetChange::Remove(value) => {
                    let _ = envelope.insert(value);
                }
            }
        }
    }

    pub(crate) fn enforce(&mut self, value: usize) -> Result<bool, EmptyDomain> {
        if self.kernel.contains(value) {
            return Ok(false);
        }
        if !self.envelope.contains(value) {
            return Err(EmptyDomain);
        }
        let _ = self.kernel.insert(value);
        self.trail.push(SetChange::Enforce(value));
        Ok(true)
    }

    pub(crate) fn remove(&mut self, value: usize) -> Result<bool, EmptyDomain> {
        if !self.envelope.contains(value) {
            return Ok(false);
        }
        if self.kernel.contains(value) {
            return Err(EmptyDomain);
        }
        let _ = self.envelope.remove(value);
        self.trail.push(SetChange::Remove(value));
        Ok(true)
    }
}
