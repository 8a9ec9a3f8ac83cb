use crate::block::{Attachment, BlockState};
use crate::error::TargetError;
use crate::pos::BlockPos;
use crate::requirement::Requirement;
use crate::target::TargetState;

/// Costs and applies one kind of payload against a target.
///
/// Placers are stateless strategies: any number of actions may hold the same
/// placer. `requirements` must not mutate the target; it may read it, in which
/// case a backend fault is returned as an error rather than as an empty list.
pub trait ComponentPlacer<P: ?Sized>: Send + Sync {
    fn requirements(
        &self,
        payload: &P,
        target: &dyn TargetState,
        pos: BlockPos,
    ) -> Result<Vec<Requirement>, TargetError>;

    fn place(
        &self,
        payload: &P,
        target: &dyn TargetState,
        pos: BlockPos,
    ) -> Result<(), TargetError>;
}

/// Places plain block states.
///
/// Costs one unit of the block itself, or nothing when the state is air or
/// the target already holds an equal state.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockStatePlacer;

impl ComponentPlacer<BlockState> for BlockStatePlacer {
    fn requirements(
        &self,
        state: &BlockState,
        target: &dyn TargetState,
        pos: BlockPos,
    ) -> Result<Vec<Requirement>, TargetError> {
        if state.is_air() || target.read(pos)? == *state {
            return Ok(Vec::new());
        }
        Ok(vec![Requirement::single(state.name.clone())])
    }

    fn place(
        &self,
        state: &BlockState,
        target: &dyn TargetState,
        pos: BlockPos,
    ) -> Result<(), TargetError> {
        target.write(pos, state)
    }
}

/// Places attached data. The base block must already be in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttachmentPlacer;

impl ComponentPlacer<Attachment> for AttachmentPlacer {
    fn requirements(
        &self,
        attachment: &Attachment,
        _target: &dyn TargetState,
        _pos: BlockPos,
    ) -> Result<Vec<Requirement>, TargetError> {
        Ok(attachment.contents.clone())
    }

    fn place(
        &self,
        attachment: &Attachment,
        target: &dyn TargetState,
        pos: BlockPos,
    ) -> Result<(), TargetError> {
        target.attach(pos, attachment)
    }
}
