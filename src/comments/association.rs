//! Comment to node association
//!
//! A terminal node owns at most two comments:
//!
//! - the prefix comment: the comment whose span ends on the line right above the node
//!   (`following_line == node.start_line`, captured blank lines included)
//! - the inline comment: a trailing comment that starts on the node's last line
//!
//! Only line positions decide the prefix. A trailing comment on `a: 1 # one` is also the
//! prefix of a node that starts on the next line.

use super::comment::Comment;
use super::span::NodeSpan;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Association<'a> {
    pub prefix: Option<&'a Comment>,
    pub inline: Option<&'a Comment>,
}

impl<'a> Association<'a> {
    pub fn is_empty(&self) -> bool {
        self.prefix.is_none() && self.inline.is_none()
    }

    /// Prefix lines followed by inline lines, the order a node's origin comments are read.
    pub fn comment_lines(&self) -> Vec<&'a str> {
        self.prefix
            .into_iter()
            .chain(self.inline)
            .flat_map(|comment| comment.lines().iter().map(String::as_str))
            .collect()
    }
}

/// Find the comments that belong to `node` by a linear search over `comments`.
///
/// `comments` must all come from the node's resource. For repeated queries build a
/// [`CommentIndex`] instead.
pub fn associate<'a>(comments: &'a [Comment], node: &NodeSpan) -> Association<'a> {
    Association {
        prefix: comments
            .iter()
            .find(|comment| comment.following_line() == node.start_line),
        inline: comments
            .iter()
            .find(|comment| comment.is_inline() && comment.start_line() == node.end_line),
    }
}

/// The comments of one resource, indexed for per-node lookups.
#[derive(Debug, Clone, Default)]
pub struct CommentIndex {
    comments: Vec<Comment>,
    prefix_by_line: HashMap<usize, usize>,
    inline_by_line: HashMap<usize, usize>,
}

impl CommentIndex {
    pub fn new(mut comments: Vec<Comment>) -> Self {
        comments.sort();
        let mut prefix_by_line = HashMap::new();
        let mut inline_by_line = HashMap::new();
        for (position, comment) in comments.iter().enumerate() {
            prefix_by_line.entry(comment.following_line()).or_insert(position);
            if comment.is_inline() {
                inline_by_line.entry(comment.start_line()).or_insert(position);
            }
        }
        Self {
            comments,
            prefix_by_line,
            inline_by_line,
        }
    }

    pub fn associate(&self, node: &NodeSpan) -> Association<'_> {
        Association {
            prefix: self
                .prefix_by_line
                .get(&node.start_line)
                .map(|&position| &self.comments[position]),
            inline: self
                .inline_by_line
                .get(&node.end_line)
                .map(|&position| &self.comments[position]),
        }
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn into_comments(self) -> Vec<Comment> {
        self.comments
    }
}

impl From<Vec<Comment>> for CommentIndex {
    fn from(comments: Vec<Comment>) -> Self {
        Self::new(comments)
    }
}
