//! Per-post comment storage.
//!
//! Comments are kept flat, keyed by id, with a parent back-reference and a
//! parent -> children index. The whole table lives inside its post's lock,
//! so resolving a parent and appending to it is a single critical section.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use forum_types::models::Comment;

use crate::{Engine, EngineError, EntityKind, Result, read, write};

struct CommentNode {
    id: Uuid,
    parent_id: Option<Uuid>,
    content: String,
    author: String,
    votes: i64,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
pub(crate) struct CommentTable {
    nodes: HashMap<Uuid, CommentNode>,
    roots: Vec<Uuid>,
    children: HashMap<Uuid, Vec<Uuid>>,
}

impl CommentTable {
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    fn insert(&mut self, node: CommentNode) -> Result<()> {
        match node.parent_id {
            None => self.roots.push(node.id),
            Some(parent) => {
                if !self.nodes.contains_key(&parent) {
                    return Err(EngineError::not_found(EntityKind::ParentComment, parent));
                }
                self.children.entry(parent).or_default().push(node.id);
            }
        }
        self.nodes.insert(node.id, node);
        Ok(())
    }

    /// Top-level comments with their replies nested, in insertion order.
    fn tree(&self, post_id: Uuid) -> Vec<Comment> {
        self.roots
            .iter()
            .filter_map(|id| self.subtree(post_id, *id))
            .collect()
    }

    fn subtree(&self, post_id: Uuid, id: Uuid) -> Option<Comment> {
        let node = self.nodes.get(&id)?;
        let children = self
            .children
            .get(&id)
            .map(|ids| ids.iter().filter_map(|c| self.subtree(post_id, *c)).collect())
            .unwrap_or_default();
        Some(snapshot(post_id, node, children))
    }
}

fn snapshot(post_id: Uuid, node: &CommentNode, children: Vec<Comment>) -> Comment {
    Comment {
        id: node.id,
        post_id,
        parent_id: node.parent_id,
        content: node.content.clone(),
        author: node.author.clone(),
        votes: node.votes,
        created_at: node.created_at,
        children,
    }
}

impl Engine {
    /// Adds a comment under `post_id`. `None` parent means top-level;
    /// otherwise the parent may be anywhere in the post's tree.
    pub fn add_comment(
        &self,
        content: &str,
        author: &str,
        post_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> Result<Comment> {
        let post = self.post_record(post_id)?;

        let node = CommentNode {
            id: Uuid::new_v4(),
            parent_id,
            content: content.to_string(),
            author: author.to_string(),
            votes: 0,
            created_at: Utc::now(),
        };
        let comment = snapshot(post_id, &node, Vec::new());

        write(&post).comments.insert(node)?;

        debug!(comment_id = %comment.id, post_id = %post_id, author = %author, "added comment");
        Ok(comment)
    }

    /// Top-level comments of a post; replies are reachable via `children`.
    pub fn get_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let post = self.post_record(post_id)?;
        let tree = read(&post).comments.tree(post_id);
        Ok(tree)
    }
}
