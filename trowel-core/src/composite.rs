use std::sync::Arc;

use crate::action::PlaceAction;
use crate::block::{Attachment, BlockState, BlockStateWithAttachment};
use crate::error::{PipelineError, TargetError};
use crate::placer::ComponentPlacer;
use crate::pos::BlockPos;
use crate::requirement::merge;
use crate::target::TargetState;

/// Order in which the two components of a composite payload are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachOrder {
    /// Write the base state, then attach. The base block hosts the attachment.
    #[default]
    BaseFirst,
    AttachmentFirst,
}

/// Builds one action placing a base state and its optional attachment.
///
/// See [`build_action_ordered`].
pub fn build_action<B, A>(
    payload: BlockStateWithAttachment,
    base: B,
    attached: A,
    target: Arc<dyn TargetState>,
    pos: BlockPos,
) -> Result<PlaceAction<BlockStateWithAttachment>, PipelineError>
where
    B: ComponentPlacer<BlockState> + Clone + 'static,
    A: ComponentPlacer<Attachment> + Clone + 'static,
{
    build_action_ordered(payload, base, attached, target, pos, AttachOrder::BaseFirst)
}

/// Builds one action placing a base state and its optional attachment.
///
/// Without an attachment the action is exactly the base placer's. With one,
/// requirements are the base list followed by the attachment list, and both
/// writes happen inside a single perform in the given order; if the first
/// write fails the second is not attempted.
///
/// An attachment on an air base state is rejected here rather than dropped.
pub fn build_action_ordered<B, A>(
    payload: BlockStateWithAttachment,
    base: B,
    attached: A,
    target: Arc<dyn TargetState>,
    pos: BlockPos,
    order: AttachOrder,
) -> Result<PlaceAction<BlockStateWithAttachment>, PipelineError>
where
    B: ComponentPlacer<BlockState> + Clone + 'static,
    A: ComponentPlacer<Attachment> + Clone + 'static,
{
    if let Some(attachment) = &payload.attachment {
        if payload.state.is_air() {
            return Err(PipelineError::Malformed {
                pos,
                reason: format!("attachment {} has no base block to attach to", attachment.kind),
            });
        }
    }

    let registry_name = Some(payload.state.name.clone());
    let object = Arc::new(payload);

    let (req_object, req_target) = (Arc::clone(&object), Arc::clone(&target));
    let (req_base, req_attached) = (base.clone(), attached.clone());
    let requirements = move || {
        let base_reqs = req_base.requirements(&req_object.state, req_target.as_ref(), pos)?;
        match &req_object.attachment {
            None => Ok(base_reqs),
            Some(attachment) => Ok(merge(
                base_reqs,
                req_attached.requirements(attachment, req_target.as_ref(), pos)?,
            )),
        }
    };

    let (act_object, act_target) = (Arc::clone(&object), Arc::clone(&target));
    let action = move || -> Result<(), TargetError> {
        let target = act_target.as_ref();
        let Some(attachment) = &act_object.attachment else {
            return base.place(&act_object.state, target, pos);
        };
        match order {
            AttachOrder::BaseFirst => {
                base.place(&act_object.state, target, pos)?;
                attached.place(attachment, target, pos)
            }
            AttachOrder::AttachmentFirst => {
                attached.place(attachment, target, pos)?;
                base.place(&act_object.state, target, pos)
            }
        }
    };

    Ok(PlaceAction::new(requirements, action, object, registry_name, target, pos))
}
