//! In-memory issue store.
//!
//! Maps each project name to its issues in insertion order. Every operation
//! takes the store-wide lock for its full duration, so a request's read or
//! mutation is atomic with respect to every other request.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::issue::{self, Issue, IssuePatch, NewIssue};
use crate::model::IssueFilter;
use crate::validate;

/// Process-wide issue storage, keyed by project name.
#[derive(Debug, Default)]
pub struct IssueStore {
    projects: RwLock<HashMap<String, Vec<Issue>>>,
}

impl IssueStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store ready to be shared between request handlers.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Issues of `project` that satisfy `filter`, in insertion order.
    ///
    /// An unknown project is an empty collection.
    pub async fn list(&self, project: &str, filter: &IssueFilter) -> Vec<Issue> {
        let projects = self.projects.read().await;
        projects
            .get(project)
            .map(|issues| {
                issues
                    .iter()
                    .filter(|issue| filter.matches(issue))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Append a new open issue to `project` and return it.
    pub async fn create(&self, project: &str, input: NewIssue) -> Issue {
        let mut projects = self.projects.write().await;
        let issues = projects.entry(project.to_string()).or_default();

        let now = issue::now();
        let mut id = issue::generate_id(now);
        while issues.iter().any(|existing| existing.id == id) {
            debug!(project, id = %id, "Issue id collision, regenerating");
            id = issue::generate_id(now);
        }

        let created = Issue::new(id, input, now);
        issues.push(created.clone());
        debug!(project, id = %created.id, "Created issue");
        created
    }

    /// Apply `patch` to the issue whose id matches `id` (compared as strings).
    ///
    /// # Errors
    ///
    /// Returns [`Error::CouldNotUpdate`] if no such issue exists in `project`.
    pub async fn update(&self, project: &str, id: &Value, patch: &IssuePatch) -> Result<Issue> {
        let mut projects = self.projects.write().await;
        let issues = projects.entry(project.to_string()).or_default();

        let Some(target) = issues
            .iter_mut()
            .find(|issue| validate::id_matches(&issue.id, id))
        else {
            return Err(Error::CouldNotUpdate { id: id.clone() });
        };

        patch.apply(target, issue::now());
        debug!(project, id = %target.id, "Updated issue");
        Ok(target.clone())
    }

    /// Remove the issue whose id matches `id`, keeping the order of the rest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CouldNotDelete`] if no such issue exists in `project`.
    pub async fn delete(&self, project: &str, id: &Value) -> Result<Issue> {
        let mut projects = self.projects.write().await;
        let issues = projects.entry(project.to_string()).or_default();

        let Some(index) = issues
            .iter()
            .position(|issue| validate::id_matches(&issue.id, id))
        else {
            return Err(Error::CouldNotDelete { id: id.clone() });
        };

        let removed = issues.remove(index);
        debug!(project, id = %removed.id, "Deleted issue");
        Ok(removed)
    }

    /// Number of issues in `project`.
    pub async fn count(&self, project: &str) -> usize {
        self.projects.read().await.get(project).map_or(0, Vec::len)
    }

    /// Number of projects that have been written to, including emptied ones.
    pub async fn project_count(&self) -> usize {
        self.projects.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_issue(title: &str, created_by: &str) -> NewIssue {
        NewIssue {
            issue_title: title.to_string(),
            issue_text: "Text".to_string(),
            created_by: created_by.to_string(),
            assigned_to: String::new(),
            status_text: String::new(),
        }
    }

    #[tokio::test]
    async fn test_unknown_project_is_empty() {
        let store = IssueStore::new();
        assert!(store.list("nothing", &IssueFilter::default()).await.is_empty());
        assert_eq!(store.count("nothing").await, 0);
        assert_eq!(store.project_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_preserves_insertion_order() {
        let store = IssueStore::new();
        let first = store.create("p", new_issue("first", "A")).await;
        let second = store.create("p", new_issue("second", "A")).await;
        let third = store.create("p", new_issue("third", "B")).await;

        let listed = store.list("p", &IssueFilter::default()).await;
        let ids: Vec<_> = listed.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec![first.id.as_str(), second.id.as_str(), third.id.as_str()]);
        assert!(first.open);
        assert_eq!(first.created_on, first.updated_on);
    }

    #[tokio::test]
    async fn test_ids_are_unique_within_project() {
        let store = IssueStore::new();
        let mut ids = std::collections::HashSet::new();
        for n in 0..200 {
            let created = store.create("p", new_issue(&format!("t{n}"), "A")).await;
            assert!(ids.insert(created.id));
        }
    }

    #[tokio::test]
    async fn test_list_applies_filter() {
        let store = IssueStore::new();
        store.create("p", new_issue("one", "A")).await;
        store.create("p", new_issue("two", "B")).await;

        let filter = IssueFilter::from_pairs([("created_by", "B")]);
        let listed = store.list("p", &filter).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].issue_title, "two");
    }

    #[tokio::test]
    async fn test_update_in_place() {
        let store = IssueStore::new();
        store.create("p", new_issue("one", "A")).await;
        let target = store.create("p", new_issue("two", "A")).await;

        let patch = IssuePatch {
            status_text: Some("In QA".to_string()),
            open: Some(false),
            ..IssuePatch::default()
        };
        let updated = store.update("p", &json!(target.id), &patch).await.unwrap();
        assert_eq!(updated.status_text, "In QA");
        assert!(!updated.open);
        assert!(updated.updated_on >= target.updated_on);
        assert_eq!(updated.created_on, target.created_on);

        let listed = store.list("p", &IssueFilter::default()).await;
        assert_eq!(listed[1].id, target.id);
        assert_eq!(listed[1].status_text, "In QA");
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let store = IssueStore::new();
        let patch = IssuePatch {
            issue_text: Some("x".to_string()),
            ..IssuePatch::default()
        };
        let err = store.update("p", &json!("NOPE"), &patch).await.unwrap_err();
        assert!(matches!(err, Error::CouldNotUpdate { ref id } if id == "NOPE"));
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let store = IssueStore::new();
        let a = store.create("p", new_issue("a", "A")).await;
        let b = store.create("p", new_issue("b", "A")).await;
        let c = store.create("p", new_issue("c", "A")).await;

        let removed = store.delete("p", &json!(b.id)).await.unwrap();
        assert_eq!(removed.id, b.id);
        assert_eq!(store.count("p").await, 2);

        let ids: Vec<_> = store
            .list("p", &IssueFilter::default())
            .await
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![a.id, c.id]);

        let err = store.delete("p", &json!(b.id)).await.unwrap_err();
        assert!(matches!(err, Error::CouldNotDelete { .. }));
    }

    #[tokio::test]
    async fn test_emptied_project_still_exists() {
        let store = IssueStore::new();
        let only = store.create("p", new_issue("only", "A")).await;
        store.delete("p", &json!(only.id)).await.unwrap();
        assert_eq!(store.count("p").await, 0);
        assert_eq!(store.project_count().await, 1);
    }

    #[tokio::test]
    async fn test_projects_are_isolated() {
        let store = IssueStore::new();
        let p1 = store.create("p1", new_issue("one", "A")).await;
        store.create("p2", new_issue("two", "A")).await;

        let err = store.delete("p2", &json!(p1.id)).await.unwrap_err();
        assert!(matches!(err, Error::CouldNotDelete { .. }));
        assert_eq!(store.count("p1").await, 1);
        assert_eq!(store.count("p2").await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_mutations_are_atomic() {
        let store = IssueStore::shared();
        let mut seeded = Vec::new();
        for i in 0..100 {
            seeded.push(store.create("p", new_issue(&format!("seed {i}"), "A")).await);
        }

        let mut tasks = Vec::new();
        for i in 0..100 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store.create("p", new_issue(&format!("new {i}"), "B")).await;
            }));
        }
        for target in &seeded[..50] {
            let store = Arc::clone(&store);
            let id = json!(target.id);
            tasks.push(tokio::spawn(async move {
                let patch = IssuePatch {
                    status_text: Some("touched".to_string()),
                    ..IssuePatch::default()
                };
                store.update("p", &id, &patch).await.unwrap();
            }));
        }
        for target in &seeded[50..] {
            let store = Arc::clone(&store);
            let id = json!(target.id);
            tasks.push(tokio::spawn(async move {
                store.delete("p", &id).await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let issues = store.list("p", &IssueFilter::default()).await;
        assert_eq!(issues.len(), 150);

        let ids: std::collections::HashSet<_> = issues.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), issues.len());

        let touched = issues.iter().filter(|i| i.status_text == "touched").count();
        assert_eq!(touched, 50);
        assert_eq!(issues.iter().filter(|i| i.created_by == "B").count(), 100);
        assert!(seeded[50..].iter().all(|gone| !ids.contains(gone.id.as_str())));
    }
}
