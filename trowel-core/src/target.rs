use indexmap::IndexMap;
use std::sync::{PoisonError, RwLock};

use crate::block::{Attachment, BlockState};
use crate::error::TargetError;
use crate::pos::BlockPos;

/// The mutable state that placement actions write into.
///
/// Targets operate on single positions and know nothing about stages,
/// payload encodings or requirements. All methods take `&self` so a target
/// can be shared behind an `Arc` by every action bound to it; implementations
/// provide their own interior mutability.
pub trait TargetState: Send + Sync {
    /// Returns the state at `pos`. Unset positions read as air.
    fn read(&self, pos: BlockPos) -> Result<BlockState, TargetError>;

    /// Writes `state` at `pos`. Writing an equal state must succeed.
    fn write(&self, pos: BlockPos, state: &BlockState) -> Result<(), TargetError>;

    /// Attaches data to the block already placed at `pos`.
    fn attach(&self, pos: BlockPos, attachment: &Attachment) -> Result<(), TargetError>;
}

#[derive(Debug, Clone)]
struct Slot {
    state: BlockState,
    attachment: Option<Attachment>,
}

/// An in-memory target backed by an ordered map.
///
/// Useful for testing and as a reference implementation. Air is never stored;
/// replacing a block with a different state drops its attachment.
#[derive(Debug, Default)]
pub struct MemoryTarget {
    bounds: Option<(BlockPos, BlockPos)>,
    slots: RwLock<IndexMap<BlockPos, Slot>>,
}

impl MemoryTarget {
    /// Creates an unbounded, empty target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty target accepting only positions inside the inclusive box.
    pub fn with_bounds(a: BlockPos, b: BlockPos) -> Self {
        MemoryTarget {
            bounds: Some((a.component_min(b), a.component_max(b))),
            slots: RwLock::default(),
        }
    }

    /// Returns true if `pos` lies inside this target's bounds.
    pub fn contains(&self, pos: BlockPos) -> bool {
        match self.bounds {
            None => true,
            Some((min, max)) => {
                (min.x..=max.x).contains(&pos.x)
                    && (min.y..=max.y).contains(&pos.y)
                    && (min.z..=max.z).contains(&pos.z)
            }
        }
    }

    /// Returns the attachment at `pos`, if any.
    pub fn attachment(&self, pos: BlockPos) -> Result<Option<Attachment>, TargetError> {
        self.check(pos)?;
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(&pos).and_then(|slot| slot.attachment.clone()))
    }

    /// Number of non-air positions.
    pub fn len(&self) -> usize {
        self.slots.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self, pos: BlockPos) -> Result<(), TargetError> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(TargetError::OutOfBounds(pos))
        }
    }
}

impl TargetState for MemoryTarget {
    fn read(&self, pos: BlockPos) -> Result<BlockState, TargetError> {
        self.check(pos)?;
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        Ok(slots
            .get(&pos)
            .map(|slot| slot.state.clone())
            .unwrap_or_else(BlockState::air))
    }

    fn write(&self, pos: BlockPos, state: &BlockState) -> Result<(), TargetError> {
        self.check(pos)?;
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        if state.is_air() {
            slots.shift_remove(&pos);
            return Ok(());
        }
        match slots.get_mut(&pos) {
            Some(slot) if slot.state == *state => {}
            Some(slot) => {
                slot.state = state.clone();
                slot.attachment = None;
            }
            None => {
                slots.insert(
                    pos,
                    Slot {
                        state: state.clone(),
                        attachment: None,
                    },
                );
            }
        }
        Ok(())
    }

    fn attach(&self, pos: BlockPos, attachment: &Attachment) -> Result<(), TargetError> {
        self.check(pos)?;
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        match slots.get_mut(&pos) {
            Some(slot) => {
                slot.attachment = Some(attachment.clone());
                Ok(())
            }
            None => Err(TargetError::NoContainer(pos)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceId;

    fn stone() -> BlockState {
        BlockState::parse("stone").unwrap()
    }

    fn chest() -> BlockState {
        BlockState::parse("chest").unwrap()
    }

    #[test]
    fn unset_reads_as_air() {
        let target = MemoryTarget::new();
        assert!(target.read(BlockPos::new(3, 4, 5)).unwrap().is_air());
        assert!(target.is_empty());
    }

    #[test]
    fn write_then_read() {
        let target = MemoryTarget::new();
        let pos = BlockPos::new(1, 2, 3);

        target.write(pos, &stone()).unwrap();

        assert_eq!(target.read(pos).unwrap(), stone());
        assert_eq!(target.len(), 1);
    }

    #[test]
    fn writing_equal_state_is_a_noop() {
        let target = MemoryTarget::new();
        let pos = BlockPos::ORIGIN;
        let attachment = Attachment::new(ResourceId::parse("chest").unwrap());

        target.write(pos, &chest()).unwrap();
        target.attach(pos, &attachment).unwrap();
        target.write(pos, &chest()).unwrap();

        assert_eq!(target.attachment(pos).unwrap(), Some(attachment));
    }

    #[test]
    fn replacing_state_drops_attachment() {
        let target = MemoryTarget::new();
        let pos = BlockPos::ORIGIN;

        target.write(pos, &chest()).unwrap();
        target
            .attach(pos, &Attachment::new(ResourceId::parse("chest").unwrap()))
            .unwrap();
        target.write(pos, &stone()).unwrap();

        assert_eq!(target.attachment(pos).unwrap(), None);
    }

    #[test]
    fn writing_air_clears_position() {
        let target = MemoryTarget::new();
        let pos = BlockPos::ORIGIN;

        target.write(pos, &stone()).unwrap();
        target.write(pos, &BlockState::air()).unwrap();

        assert!(target.read(pos).unwrap().is_air());
        assert!(target.is_empty());
    }

    #[test]
    fn attach_requires_a_block() {
        let target = MemoryTarget::new();
        let pos = BlockPos::new(0, 1, 0);
        let err = target
            .attach(pos, &Attachment::new(ResourceId::parse("chest").unwrap()))
            .unwrap_err();
        assert_eq!(err, TargetError::NoContainer(pos));
    }

    #[test]
    fn bounds_are_enforced() {
        let target = MemoryTarget::with_bounds(BlockPos::new(2, 2, 2), BlockPos::ORIGIN);
        let outside = BlockPos::new(3, 0, 0);

        assert!(target.contains(BlockPos::new(2, 0, 1)));
        assert_eq!(target.read(outside).unwrap_err(), TargetError::OutOfBounds(outside));
        assert_eq!(
            target.write(outside, &stone()).unwrap_err(),
            TargetError::OutOfBounds(outside)
        );
    }
}
