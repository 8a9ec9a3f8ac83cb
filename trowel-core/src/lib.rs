//! Trowel turns a structure description into a lazy, resumable sequence of
//! placement actions.
//!
//! Core concepts:
//! - **PlaceAction**: one deferred placement; its cost can be queried before it
//!   is performed, and performing it mutates the target
//! - **ComponentPlacer**: a stateless strategy that costs and applies one kind
//!   of payload (a block state, or data attached to a block)
//! - **Composite action**: a block state and its optional attachment merged
//!   into one action, base first
//! - **ActionIterator**: a stage that maps raw source items to actions on
//!   demand, skipping items that need no action, and may name a successor stage
//! - **PipelineDriver**: performs a bounded number of actions per tick across
//!   chained stages, consulting a requirement sink
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use trowel_core::{
//!     ActionStage, BlockPos, BlockState, BlockStateWithAttachment, FastIterator, MemoryTarget,
//!     RawEntry, TargetState, structure_pipeline,
//! };
//!
//! let target = Arc::new(MemoryTarget::new());
//! let stone = BlockStateWithAttachment::plain(BlockState::parse("stone").unwrap());
//! let entries = vec![RawEntry::encode(BlockPos::new(0, 64, 0), &stone).unwrap()];
//!
//! // Nothing to clear on an empty target; the successor stage places the block.
//! let mut clear = structure_pipeline(entries, target.clone());
//! assert!(clear.pull().is_err());
//! let mut place = clear.successor().unwrap();
//!
//! let action = place.pull().unwrap();
//! println!("needs {:?}", action.requirements().unwrap());
//! place.fast_consume(action).unwrap();
//!
//! assert_eq!(target.read(BlockPos::new(0, 64, 0)).unwrap(), stone.state);
//! ```

mod action;
mod admission;
mod block;
mod composite;
mod config;
mod driver;
mod error;
mod placer;
mod pos;
mod requirement;
mod resource;
mod source;
mod stage;
mod target;

pub use action::PlaceAction;
pub use admission::{RequirementSink, Stockpile, Unlimited};
pub use block::{Attachment, BlockState, BlockStateWithAttachment};
pub use composite::{AttachOrder, build_action, build_action_ordered};
pub use config::DriverConfig;
pub use driver::{PipelineDriver, TickOutcome, TickReport};
pub use error::{ConfigError, PipelineError, TargetError};
pub use placer::{AttachmentPlacer, BlockStatePlacer, ComponentPlacer};
pub use pos::BlockPos;
pub use requirement::{Requirement, merge, summarize};
pub use resource::{DEFAULT_NAMESPACE, ResourceId};
pub use source::{RawEntry, clear_transform, place_transform, structure_pipeline};
pub use stage::{ActionIterator, ActionStage, BoxedStage, FastIterator, build_stage};
pub use target::{MemoryTarget, TargetState};
