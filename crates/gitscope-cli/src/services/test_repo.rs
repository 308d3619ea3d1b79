//! Throwaway repositories for service tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use git2::{Oid, Signature};
use gitscope_git::Repository;
use tempfile::TempDir;

pub struct TestRepo {
    _temp: TempDir,
    pub repo: Repository,
}

impl TestRepo {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        git2::Repository::init(temp.path()).expect("Failed to init git repo");
        let repo = Repository::open_named(temp.path(), "test").expect("Failed to open repo");
        Self { _temp: temp, repo }
    }

    pub fn commit(&self, msg: &str, parents: &[Oid]) -> Oid {
        let git = self.repo.inner();
        let sig = Signature::now("Test User", "test@example.com").unwrap();
        let tree_id = git.index().unwrap().write_tree().unwrap();
        let tree = git.find_tree(tree_id).unwrap();
        let parents: Vec<_> = parents.iter().map(|p| git.find_commit(*p).unwrap()).collect();
        let parent_refs: Vec<_> = parents.iter().collect();
        git.commit(None, &sig, &sig, msg, &tree, &parent_refs)
            .unwrap()
    }

    /// Linear history, oldest first.
    pub fn chain(&self, n: usize) -> Vec<Oid> {
        let mut ids: Vec<Oid> = Vec::new();
        for i in 0..n {
            let parents: Vec<Oid> = ids.last().copied().into_iter().collect();
            ids.push(self.commit(&format!("commit {i}"), &parents));
        }
        ids
    }

    pub fn set_ref(&self, name: &str, id: Oid) {
        self.repo.inner().reference(name, id, true, "test").unwrap();
    }
}
