use std::iter::Peekable;

use crate::action::PlaceAction;
use crate::error::PipelineError;

/// A pull sequence whose items can be consumed in place.
///
/// Callers check [`has_next`](FastIterator::has_next) before every
/// [`pull`](FastIterator::pull); pulling past the end is a protocol error,
/// reported as [`PipelineError::Exhausted`].
pub trait FastIterator {
    type Item;

    /// True while the underlying source has items left. A `true` result does
    /// not promise that `pull` will find an item among them.
    fn has_next(&mut self) -> bool;

    /// Returns the next item.
    fn pull(&mut self) -> Result<Self::Item, PipelineError>;

    /// Consumes an item produced by this iterator on the spot.
    fn fast_consume(&self, item: Self::Item) -> Result<(), PipelineError>;
}

/// A boxed pipeline stage.
pub type BoxedStage<'a, T> = Box<dyn ActionStage<'a, T> + 'a>;

/// One stage of a placement pipeline.
pub trait ActionStage<'a, T>: FastIterator<Item = PlaceAction<T>> {
    /// Returns the stage that follows this one, if any.
    ///
    /// A stage never moves into its successor by itself; the owner of the
    /// stage decides when to switch. The successor can be taken only once.
    fn successor(&mut self) -> Option<BoxedStage<'a, T>> {
        None
    }
}

type Transform<'a, R, T> = Box<dyn FnMut(R) -> Result<Option<PlaceAction<T>>, PipelineError> + 'a>;
type SuccessorFn<'a, T> = Box<dyn FnOnce() -> BoxedStage<'a, T> + 'a>;

/// Lazily maps a backing sequence of raw items to placement actions.
///
/// Each pull advances the backing iterator until the transform yields an
/// action, skipping every raw item the transform maps to `None`. Nothing is
/// materialized beyond the one raw item peeked by `has_next`, so a stage can be
/// left alone between any two pulls and resumed later with the same results.
pub struct ActionIterator<'a, I: Iterator, T> {
    backing: Peekable<I>,
    transform: Transform<'a, I::Item, T>,
    successor: Option<SuccessorFn<'a, T>>,
}

impl<'a, I: Iterator, T> ActionIterator<'a, I, T> {
    /// Creates a stage from an infallible transform.
    pub fn new<S, F>(backing: S, mut transform: F) -> Self
    where
        S: IntoIterator<IntoIter = I>,
        F: FnMut(I::Item) -> Option<PlaceAction<T>> + 'a,
    {
        Self::try_new(backing, move |raw| Ok(transform(raw)))
    }

    /// Creates a stage from a transform that may reject a raw item.
    ///
    /// A transform error is returned from the pull that hit it. Target faults
    /// leave the raw item in place, so the next pull tries it again; any other
    /// error consumes the item and the next pull continues after it.
    pub fn try_new<S, F>(backing: S, transform: F) -> Self
    where
        S: IntoIterator<IntoIter = I>,
        F: FnMut(I::Item) -> Result<Option<PlaceAction<T>>, PipelineError> + 'a,
    {
        ActionIterator {
            backing: backing.into_iter().peekable(),
            transform: Box::new(transform),
            successor: None,
        }
    }

    /// Chains a stage to follow this one. The factory runs when the successor
    /// is requested, so the next stage sees the target as this one left it.
    pub fn with_successor<F>(mut self, factory: F) -> Self
    where
        F: FnOnce() -> BoxedStage<'a, T> + 'a,
    {
        self.successor = Some(Box::new(factory));
        self
    }

    pub fn boxed(self) -> BoxedStage<'a, T>
    where
        I: 'a,
        I::Item: Clone,
        T: 'a,
    {
        Box::new(self)
    }
}

/// Builds a stage over `backing`, mapping each raw item through `transform`.
pub fn build_stage<'a, S, F, T>(backing: S, transform: F) -> ActionIterator<'a, S::IntoIter, T>
where
    S: IntoIterator,
    F: FnMut(S::Item) -> Option<PlaceAction<T>> + 'a,
{
    ActionIterator::new(backing, transform)
}

impl<I, T> FastIterator for ActionIterator<'_, I, T>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = PlaceAction<T>;

    fn has_next(&mut self) -> bool {
        self.backing.peek().is_some()
    }

    fn pull(&mut self) -> Result<PlaceAction<T>, PipelineError> {
        while let Some(raw) = self.backing.peek() {
            match (self.transform)(raw.clone()) {
                // The target may recover; keep the item for the next pull.
                Err(err @ PipelineError::Target(_)) => return Err(err),
                result => {
                    self.backing.next();
                    if let Some(action) = result? {
                        return Ok(action);
                    }
                }
            }
        }
        Err(PipelineError::Exhausted)
    }

    fn fast_consume(&self, action: PlaceAction<T>) -> Result<(), PipelineError> {
        action.perform()?;
        Ok(())
    }
}

impl<'a, I, T> ActionStage<'a, T> for ActionIterator<'a, I, T>
where
    I: Iterator,
    I::Item: Clone,
{
    fn successor(&mut self) -> Option<BoxedStage<'a, T>> {
        self.successor.take().map(|factory| factory())
    }
}

impl<I, T> Iterator for ActionIterator<'_, I, T>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = Result<PlaceAction<T>, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.pull() {
            Ok(action) => Some(Ok(action)),
            Err(PipelineError::Exhausted) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
