use std::fmt;
use std::sync::Arc;

use crate::error::TargetError;
use crate::placer::ComponentPlacer;
use crate::pos::BlockPos;
use crate::requirement::Requirement;
use crate::resource::ResourceId;
use crate::target::TargetState;

type RequirementsFn = dyn Fn() -> Result<Vec<Requirement>, TargetError> + Send + Sync;
type PerformFn = dyn Fn() -> Result<(), TargetError> + Send + Sync;

/// A deferred placement of one payload at one position.
///
/// The requirement query and the mutation are both closures bound at
/// construction time to the same payload, target and position. Requirements
/// are recomputed on every call, so they reflect the target as it is when
/// asked, not when the action was built.
///
/// `perform` is not idempotent. Perform each action at most once
/// successfully; a failed perform leaves the action usable for a retry.
pub struct PlaceAction<T> {
    requirements: Box<RequirementsFn>,
    action: Box<PerformFn>,
    object: Arc<T>,
    registry_name: Option<ResourceId>,
    target: Arc<dyn TargetState>,
    pos: BlockPos,
}

impl<T> PlaceAction<T> {
    /// Creates an action from its two closures and its binding.
    ///
    /// The closures are expected to close over clones of `object` and
    /// `target`; they are never re-bound.
    pub fn new<R, A>(
        requirements: R,
        action: A,
        object: Arc<T>,
        registry_name: Option<ResourceId>,
        target: Arc<dyn TargetState>,
        pos: BlockPos,
    ) -> Self
    where
        R: Fn() -> Result<Vec<Requirement>, TargetError> + Send + Sync + 'static,
        A: Fn() -> Result<(), TargetError> + Send + Sync + 'static,
    {
        PlaceAction {
            requirements: Box::new(requirements),
            action: Box::new(action),
            object,
            registry_name,
            target,
            pos,
        }
    }

    /// Computes what performing this action would consume right now.
    pub fn requirements(&self) -> Result<Vec<Requirement>, TargetError> {
        (self.requirements)()
    }

    /// Applies the mutation to the bound target.
    pub fn perform(&self) -> Result<(), TargetError> {
        (self.action)()
    }

    pub fn object_to_place(&self) -> &T {
        &self.object
    }

    pub fn registry_name(&self) -> Option<&ResourceId> {
        self.registry_name.as_ref()
    }

    pub fn target(&self) -> &Arc<dyn TargetState> {
        &self.target
    }

    pub fn pos(&self) -> BlockPos {
        self.pos
    }
}

impl<T: Send + Sync + 'static> PlaceAction<T> {
    /// Creates an action driven by a single component placer.
    pub fn from_placer<P>(
        object: T,
        placer: P,
        registry_name: Option<ResourceId>,
        target: Arc<dyn TargetState>,
        pos: BlockPos,
    ) -> Self
    where
        P: ComponentPlacer<T> + Clone + 'static,
    {
        let object = Arc::new(object);

        let (req_object, req_target) = (Arc::clone(&object), Arc::clone(&target));
        let req_placer = placer.clone();
        let requirements = move || req_placer.requirements(&req_object, req_target.as_ref(), pos);

        let (act_object, act_target) = (Arc::clone(&object), Arc::clone(&target));
        let action = move || placer.place(&act_object, act_target.as_ref(), pos);

        PlaceAction::new(requirements, action, object, registry_name, target, pos)
    }
}

impl<T: fmt::Debug> fmt::Debug for PlaceAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaceAction")
            .field("object", &self.object)
            .field("registry_name", &self.registry_name)
            .field("pos", &self.pos)
            .finish_non_exhaustive()
    }
}
