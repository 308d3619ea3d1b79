//! Cursor-based pages over a commit walk.
//!
//! Walk order is topological, so there is no offset to seek to. A page is
//! found by replaying the walk from the top until the start commit, while
//! remembering the last `limit` commits passed over: the oldest of those
//! starts the previous page. The commit after the last one emitted starts
//! the next page.

use gitscope_git::{Commit, ObjectId, Walk};

use crate::error::{Error, Result};
use crate::ring_buffer::RingBuffer;

/// One page of a configured walk.
///
/// Iterating yields at most `limit` commits. [`Paginator::next_cursor`] is
/// only meaningful once iteration has finished.
#[derive(Debug)]
pub struct Paginator<W: Walk> {
    walk: W,
    limit: usize,
    previous: Option<ObjectId>,
    first: Option<Commit>,
    emitted: usize,
    next: Option<ObjectId>,
    done: bool,
}

impl<W: Walk> Paginator<W> {
    /// Position a page of `limit` commits at `start`, or at the top of the
    /// walk if `start` is `None`.
    ///
    /// # Errors
    /// Returns `InvalidLimit` if `limit` is zero, `StartNotFound` if the
    /// walk ends without reaching `start`, or a git error from the walk.
    pub fn new(mut walk: W, limit: usize, start: Option<ObjectId>) -> Result<Self> {
        if limit == 0 {
            return Err(Error::InvalidLimit);
        }

        let mut lookback = RingBuffer::with_capacity(if start.is_some() { limit } else { 0 });
        let mut first = None;
        while let Some(commit) = walk.next_commit()? {
            if start.is_none_or(|s| s == commit.id) {
                first = Some(commit);
                break;
            }
            lookback.push(commit.id);
        }

        if first.is_none() {
            if let Some(start) = start {
                return Err(Error::StartNotFound(start));
            }
        }

        Ok(Self {
            walk,
            limit,
            previous: lookback.pop_oldest(),
            done: first.is_none(),
            first,
            emitted: 0,
            next: None,
        })
    }

    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Start of the previous page, if this page is not the first.
    #[must_use]
    pub const fn previous_cursor(&self) -> Option<ObjectId> {
        self.previous
    }

    /// Start of the next page, if there is more history.
    #[must_use]
    pub const fn next_cursor(&self) -> Option<ObjectId> {
        self.next
    }

    /// Whether the page has been fully emitted.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// Give the walk back, e.g. to dispose of it early.
    pub fn into_walk(self) -> W {
        self.walk
    }

    fn advance(&mut self) -> Result<Option<Commit>> {
        if self.done {
            return Ok(None);
        }

        let commit = match self.first.take() {
            Some(commit) => commit,
            None => match self.walk.next_commit()? {
                Some(commit) => commit,
                None => {
                    self.done = true;
                    return Ok(None);
                }
            },
        };

        self.emitted += 1;
        if self.emitted >= self.limit {
            self.next = self.walk.next_commit()?.map(|c| c.id);
            self.done = true;
        }
        Ok(Some(commit))
    }
}

impl<W: Walk> Iterator for Paginator<W> {
    type Item = Result<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(commit) => commit.map(Ok),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
