//! Mock implementations for testing.
//!
//! `MockRepo` implements `ObjectReader` over an in-memory object graph and
//! hands out `MockWalk`s, so parser, gate and paginator logic can be tested
//! without real git repositories.

#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use gitscope_git::{
    Commit, Error as GitError, ObjectId, ObjectKind, ObjectReader, RefEntry,
    Result as GitResult, Walk, WalkOrder,
};

#[derive(Debug, Clone)]
enum MockObject {
    Commit { parents: Vec<ObjectId>, seq: usize },
    Tree,
    Blob,
    Tag { target: ObjectId },
}

/// In-memory repository.
#[derive(Debug)]
pub struct MockRepo {
    name: String,
    next_id: AtomicUsize,
    objects: Mutex<HashMap<ObjectId, MockObject>>,
    refs: Mutex<Vec<RefEntry>>,
    aliases: Mutex<HashMap<String, ObjectId>>,
    pub reachability_calls: AtomicUsize,
    pub reachability_limit: AtomicUsize,
}

impl MockRepo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            next_id: AtomicUsize::new(1),
            objects: Mutex::new(HashMap::new()),
            refs: Mutex::new(Vec::new()),
            aliases: Mutex::new(HashMap::new()),
            reachability_calls: AtomicUsize::new(0),
            reachability_limit: AtomicUsize::new(usize::MAX),
        }
    }

    fn alloc(&self, object: MockObject) -> ObjectId {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&(n as u64).to_be_bytes());
        let id = ObjectId::from_bytes(&bytes).unwrap();
        self.objects.lock().unwrap().insert(id, object);
        id
    }

    pub fn commit(&self, parents: &[ObjectId]) -> ObjectId {
        let seq = self.next_id.load(Ordering::SeqCst);
        self.alloc(MockObject::Commit {
            parents: parents.to_vec(),
            seq,
        })
    }

    /// Linear history of `n` commits on top of `base`, oldest first.
    pub fn chain(&self, base: Option<ObjectId>, n: usize) -> Vec<ObjectId> {
        let mut ids = Vec::with_capacity(n);
        let mut parent = base;
        for _ in 0..n {
            let id = self.commit(&parent.into_iter().collect::<Vec<_>>());
            ids.push(id);
            parent = Some(id);
        }
        ids
    }

    pub fn tree(&self) -> ObjectId {
        self.alloc(MockObject::Tree)
    }

    pub fn blob(&self) -> ObjectId {
        self.alloc(MockObject::Blob)
    }

    pub fn tag(&self, target: ObjectId) -> ObjectId {
        self.alloc(MockObject::Tag { target })
    }

    /// Point a ref at an object, recording the peeled id for tags.
    pub fn set_ref(&self, name: &str, target: ObjectId) {
        let entry = if self.kind_of(target) == Some(ObjectKind::Tag) {
            RefEntry::peeled(name, target, self.peel(target))
        } else {
            RefEntry::new(name, target)
        };
        let mut refs = self.refs.lock().unwrap();
        refs.retain(|r| r.name != name);
        refs.push(entry);
    }

    pub fn delete_ref(&self, name: &str) {
        self.refs.lock().unwrap().retain(|r| r.name != name);
    }

    /// Make `name` resolve to `id`, like an abbreviated id or `HEAD~2`.
    pub fn alias(&self, name: &str, id: ObjectId) {
        self.aliases.lock().unwrap().insert(name.to_string(), id);
    }

    pub fn set_reachability_limit(&self, limit: usize) {
        self.reachability_limit.store(limit, Ordering::SeqCst);
    }

    pub fn reachability_calls(&self) -> usize {
        self.reachability_calls.load(Ordering::SeqCst)
    }

    pub fn walk(&self) -> MockWalk<'_> {
        MockWalk {
            repo: self,
            starts: Vec::new(),
            hidden: Vec::new(),
            queue: None,
        }
    }

    fn object(&self, id: ObjectId) -> Option<MockObject> {
        self.objects.lock().unwrap().get(&id).cloned()
    }

    fn kind_of(&self, id: ObjectId) -> Option<ObjectKind> {
        self.object(id).map(|o| match o {
            MockObject::Commit { .. } => ObjectKind::Commit,
            MockObject::Tree => ObjectKind::Tree,
            MockObject::Blob => ObjectKind::Blob,
            MockObject::Tag { .. } => ObjectKind::Tag,
        })
    }

    fn peel(&self, mut id: ObjectId) -> ObjectId {
        while let Some(MockObject::Tag { target }) = self.object(id) {
            id = target;
        }
        id
    }

    fn commit_view(&self, id: ObjectId) -> Option<(Commit, usize)> {
        match self.object(id)? {
            MockObject::Commit { parents, seq } => Some((Commit::bare(id, parents), seq)),
            _ => None,
        }
    }

    fn ancestors(&self, starts: &[ObjectId]) -> HashSet<ObjectId> {
        let mut seen = HashSet::new();
        let mut queue: VecDeque<ObjectId> = starts.iter().copied().collect();
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            if let Some((commit, _)) = self.commit_view(id) {
                queue.extend(commit.parents);
            }
        }
        seen
    }
}

impl ObjectReader for MockRepo {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, name: &str) -> GitResult<Option<ObjectId>> {
        if let Some(id) = self.aliases.lock().unwrap().get(name) {
            return Ok(Some(*id));
        }
        let refs = self.refs.lock().unwrap();
        for candidate in [
            name.to_string(),
            format!("refs/{name}"),
            format!("refs/tags/{name}"),
            format!("refs/heads/{name}"),
        ] {
            if let Some(r) = refs.iter().find(|r| r.name == candidate) {
                return Ok(Some(r.target));
            }
        }
        drop(refs);
        if name.len() == 40 {
            if let Ok(id) = ObjectId::from_str(name) {
                if self.object(id).is_some() {
                    return Ok(Some(id));
                }
            }
        }
        Ok(None)
    }

    fn object_kind(&self, id: ObjectId) -> GitResult<Option<ObjectKind>> {
        Ok(self.kind_of(id))
    }

    fn tag_target(&self, id: ObjectId) -> GitResult<Option<(ObjectId, ObjectKind)>> {
        match self.object(id) {
            Some(MockObject::Tag { target }) => Ok(self.kind_of(target).map(|k| (target, k))),
            _ => Ok(None),
        }
    }

    fn list_refs(&self) -> GitResult<Vec<RefEntry>> {
        Ok(self.refs.lock().unwrap().clone())
    }
}

/// Walk over a `MockRepo`, newest commit first.
#[derive(Debug)]
pub struct MockWalk<'a> {
    repo: &'a MockRepo,
    starts: Vec<ObjectId>,
    hidden: Vec<ObjectId>,
    queue: Option<VecDeque<Commit>>,
}

impl Walk for MockWalk<'_> {
    fn mark_start(&mut self, id: ObjectId) -> GitResult<()> {
        self.starts.push(self.repo.peel(id));
        Ok(())
    }

    fn mark_uninteresting(&mut self, id: ObjectId) -> GitResult<()> {
        self.hidden.push(self.repo.peel(id));
        Ok(())
    }

    fn next_commit(&mut self) -> GitResult<Option<Commit>> {
        if self.queue.is_none() {
            let hidden = self.repo.ancestors(&self.hidden);
            let mut commits: Vec<(Commit, usize)> = self
                .repo
                .ancestors(&self.starts)
                .into_iter()
                .filter(|id| !hidden.contains(id))
                .filter_map(|id| self.repo.commit_view(id))
                .collect();
            // Children are always created after their parents.
            commits.sort_by(|a, b| b.1.cmp(&a.1));
            self.queue = Some(commits.into_iter().map(|(c, _)| c).collect());
        }
        Ok(self.queue.as_mut().and_then(VecDeque::pop_front))
    }

    fn reset(&mut self) -> GitResult<()> {
        self.starts.clear();
        self.hidden.clear();
        self.queue = None;
        Ok(())
    }

    fn set_order(&mut self, _order: WalkOrder) -> GitResult<()> {
        Ok(())
    }

    fn parse_commit(&mut self, id: ObjectId) -> GitResult<Commit> {
        if self.repo.object(id).is_none() {
            return Err(GitError::ObjectNotFound(id));
        }
        self.repo
            .commit_view(self.repo.peel(id))
            .map(|(c, _)| c)
            .ok_or(GitError::NotACommit(id))
    }

    fn is_reachable(&mut self, target: &Commit, from: &[Commit]) -> GitResult<bool> {
        self.repo.reachability_calls.fetch_add(1, Ordering::SeqCst);
        let limit = self.repo.reachability_limit.load(Ordering::SeqCst);

        let mut seen = HashSet::new();
        let mut queue: VecDeque<ObjectId> = from.iter().map(|c| c.id).collect();
        while let Some(id) = queue.pop_front() {
            if id == target.id {
                return Ok(true);
            }
            if !seen.insert(id) {
                continue;
            }
            if seen.len() >= limit {
                return Err(GitError::WalkLimitExceeded(limit));
            }
            if let Some((commit, _)) = self.repo.commit_view(id) {
                queue.extend(commit.parents);
            }
        }
        Ok(false)
    }
}
