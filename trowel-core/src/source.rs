//! Raw structure entries and the standard clear-then-place pipeline.

use std::sync::Arc;

use crate::action::PlaceAction;
use crate::block::{BlockState, BlockStateWithAttachment};
use crate::composite::build_action;
use crate::error::PipelineError;
use crate::placer::{AttachmentPlacer, BlockStatePlacer};
use crate::pos::BlockPos;
use crate::stage::{ActionIterator, BoxedStage};
use crate::target::TargetState;

/// One position of a structure with its payload still encoded.
///
/// The payload is the CBOR encoding of a [`BlockStateWithAttachment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub pos: BlockPos,
    pub payload: Vec<u8>,
}

impl RawEntry {
    /// Encodes `value` as the payload for `pos`.
    pub fn encode(pos: BlockPos, value: &BlockStateWithAttachment) -> Result<Self, PipelineError> {
        let mut payload = Vec::new();
        ciborium::into_writer(value, &mut payload).map_err(|e| PipelineError::Encode {
            pos,
            message: e.to_string(),
        })?;
        Ok(RawEntry { pos, payload })
    }

    /// Decodes the payload.
    pub fn decode(&self) -> Result<BlockStateWithAttachment, PipelineError> {
        ciborium::from_reader(self.payload.as_slice()).map_err(|e| PipelineError::Decode {
            pos: self.pos,
            message: e.to_string(),
        })
    }
}

/// Transform for the clearing stage.
///
/// Yields an action writing air wherever the target holds something other
/// than air and other than the entry's own state.
pub fn clear_transform(
    target: Arc<dyn TargetState>,
) -> impl FnMut(RawEntry) -> Result<Option<PlaceAction<BlockStateWithAttachment>>, PipelineError> {
    move |entry| {
        let wanted = entry.decode()?;
        let current = target.read(entry.pos)?;
        if current.is_air() || current == wanted.state {
            return Ok(None);
        }
        let clear = BlockStateWithAttachment::plain(BlockState::air());
        let target = Arc::clone(&target);
        build_action(clear, BlockStatePlacer, AttachmentPlacer, target, entry.pos).map(Some)
    }
}

/// Transform for the placing stage.
///
/// Skips air entries and entries whose state is already in place, unless they
/// carry an attachment.
pub fn place_transform(
    target: Arc<dyn TargetState>,
) -> impl FnMut(RawEntry) -> Result<Option<PlaceAction<BlockStateWithAttachment>>, PipelineError> {
    move |entry| {
        let payload = entry.decode()?;
        if !payload.has_attachment()
            && (payload.state.is_air() || target.read(entry.pos)? == payload.state)
        {
            return Ok(None);
        }
        let target = Arc::clone(&target);
        build_action(payload, BlockStatePlacer, AttachmentPlacer, target, entry.pos).map(Some)
    }
}

/// Builds the two-stage pipeline for a structure: clear, then place.
///
/// The place stage is created only when the clear stage hands over, so its
/// skip decisions see the cleared target.
pub fn structure_pipeline(
    entries: Vec<RawEntry>,
    target: Arc<dyn TargetState>,
) -> BoxedStage<'static, BlockStateWithAttachment> {
    let place_entries = entries.clone();
    let place_target = Arc::clone(&target);
    ActionIterator::try_new(entries, clear_transform(target))
        .with_successor(move || {
            ActionIterator::try_new(place_entries, place_transform(place_target)).boxed()
        })
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Attachment;
    use crate::resource::ResourceId;
    use crate::stage::{ActionStage, FastIterator};
    use crate::target::MemoryTarget;

    fn entry(pos: BlockPos, name: &str) -> RawEntry {
        RawEntry::encode(pos, &BlockState::parse(name).unwrap().into()).unwrap()
    }

    #[test]
    fn decode_reports_position() {
        let pos = BlockPos::new(4, 5, 6);
        let raw = RawEntry {
            pos,
            payload: vec![0xff, 0x00],
        };
        assert!(matches!(raw.decode(), Err(PipelineError::Decode { pos: p, .. }) if p == pos));
    }

    #[test]
    fn encode_decode_keeps_attachment() {
        let value = BlockStateWithAttachment::with_attachment(
            BlockState::parse("barrel").unwrap().with_property("facing", "up"),
            Attachment::new(ResourceId::parse("barrel").unwrap())
                .with_item(ResourceId::parse("apple").unwrap(), 2)
                .with_data("lock", "key"),
        );
        let raw = RawEntry::encode(BlockPos::ORIGIN, &value).unwrap();
        assert_eq!(raw.decode().unwrap(), value);
    }

    #[test]
    fn place_skips_air_and_unchanged() {
        let target = Arc::new(MemoryTarget::new());
        let done = BlockPos::new(1, 0, 0);
        target.write(done, &BlockState::parse("stone").unwrap()).unwrap();

        let entries = vec![
            entry(BlockPos::ORIGIN, "air"),
            entry(done, "stone"),
            entry(BlockPos::new(2, 0, 0), "stone"),
        ];
        let mut stage = ActionIterator::try_new(entries, place_transform(target));

        assert_eq!(stage.pull().unwrap().pos(), BlockPos::new(2, 0, 0));
        assert!(!stage.has_next());
    }

    #[test]
    fn place_keeps_unchanged_state_with_attachment() {
        let target = Arc::new(MemoryTarget::new());
        let chest = BlockState::parse("chest").unwrap();
        target.write(BlockPos::ORIGIN, &chest).unwrap();

        let value = BlockStateWithAttachment::with_attachment(
            chest,
            Attachment::new(ResourceId::parse("chest").unwrap()),
        );
        let entries = vec![RawEntry::encode(BlockPos::ORIGIN, &value).unwrap()];
        let mut stage = ActionIterator::try_new(entries, place_transform(target));

        let action = stage.pull().unwrap();
        assert_eq!(action.requirements().unwrap(), Vec::new());
    }

    #[test]
    fn clear_only_touches_conflicting_blocks() {
        let target = Arc::new(MemoryTarget::new());
        target.write(BlockPos::new(0, 0, 0), &BlockState::parse("dirt").unwrap()).unwrap();
        target.write(BlockPos::new(1, 0, 0), &BlockState::parse("stone").unwrap()).unwrap();

        let entries = vec![
            entry(BlockPos::new(0, 0, 0), "stone"),
            entry(BlockPos::new(1, 0, 0), "stone"),
            entry(BlockPos::new(2, 0, 0), "stone"),
        ];
        let positions: Vec<BlockPos> = ActionIterator::try_new(entries, clear_transform(target))
            .map(|action| action.unwrap().pos())
            .collect();

        assert_eq!(positions, vec![BlockPos::new(0, 0, 0)]);
    }

    #[test]
    fn pipeline_clears_then_places() {
        let target = Arc::new(MemoryTarget::new());
        target.write(BlockPos::new(0, 0, 0), &BlockState::parse("dirt").unwrap()).unwrap();
        target.write(BlockPos::new(1, 0, 0), &BlockState::parse("dirt").unwrap()).unwrap();

        let entries = vec![
            entry(BlockPos::new(0, 0, 0), "stone"),
            entry(BlockPos::new(1, 0, 0), "air"),
        ];
        let mut clear = structure_pipeline(entries, target.clone());

        let mut cleared = Vec::new();
        while clear.has_next() {
            if let Ok(action) = clear.pull() {
                cleared.push(action.pos());
                clear.fast_consume(action).unwrap();
            }
        }
        assert_eq!(cleared, vec![BlockPos::new(0, 0, 0), BlockPos::new(1, 0, 0)]);
        assert!(target.is_empty());

        let mut place = clear.successor().unwrap();
        let action = place.pull().unwrap();
        assert_eq!(action.pos(), BlockPos::new(0, 0, 0));
        place.fast_consume(action).unwrap();
        assert!(matches!(place.pull(), Err(PipelineError::Exhausted)));
        assert!(!place.has_next());
        assert!(place.successor().is_none());

        assert_eq!(target.read(BlockPos::ORIGIN).unwrap(), BlockState::parse("stone").unwrap());
    }
}
