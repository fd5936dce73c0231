//! Comment tree construction
//!
//! Stores return comments as a flat list. [`build_comment_tree`] turns that
//! list into a forest: comments with `parent_id == 0` become roots and every
//! other comment is placed under its parent's `replies`.
//!
//! The walk uses an explicit work list instead of recursion, so thread depth
//! is bounded only by memory.

use news_common::Comment;
use std::collections::HashMap;

/// Build the reply forest for one post.
///
/// Siblings keep their relative input order. A comment whose parent is not
/// in `comments` is unreachable from any root and is dropped. The result
/// depends only on the input, so repeated calls give equal forests.
pub fn build_comment_tree(comments: Vec<Comment>) -> Vec<Comment> {
    let mut roots = Vec::new();
    let mut children: HashMap<i64, Vec<Comment>> = HashMap::new();

    for comment in comments {
        if comment.is_root() {
            roots.push(comment);
        } else {
            children.entry(comment.parent_id).or_default().push(comment);
        }
    }

    let mut pending: Vec<&mut Comment> = roots.iter_mut().collect();
    while let Some(node) = pending.pop() {
        // Each group is removed once, so no comment can be placed twice.
        node.replies = children.remove(&node.id).unwrap_or_default();
        pending.extend(node.replies.iter_mut());
    }

    roots
}

/// Total number of comments in a forest, counted without recursion.
pub fn count_comments(forest: &[Comment]) -> usize {
    let mut count = 0;
    let mut pending: Vec<&Comment> = forest.iter().collect();
    while let Some(node) = pending.pop() {
        count += 1;
        pending.extend(node.replies.iter());
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: i64, parent_id: i64) -> Comment {
        Comment {
            id,
            post_id: 1,
            parent_id,
            content: format!("comment {}", id),
            add_time: 1_700_000_000 + id,
            replies: Vec::new(),
        }
    }

    fn ids(forest: &[Comment]) -> Vec<i64> {
        forest.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_two_roots_one_reply() {
        let forest = build_comment_tree(vec![comment(2, 0), comment(3, 2), comment(4, 0)]);

        assert_eq!(ids(&forest), vec![2, 4]);
        assert_eq!(ids(&forest[0].replies), vec![3]);
        assert!(forest[0].replies[0].replies.is_empty());
        assert!(forest[1].replies.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(build_comment_tree(Vec::new()).is_empty());
    }

    #[test]
    fn test_children_listed_before_parent() {
        // Store order is arbitrary; a reply may arrive before its parent.
        let forest = build_comment_tree(vec![comment(5, 1), comment(6, 5), comment(1, 0)]);

        assert_eq!(ids(&forest), vec![1]);
        assert_eq!(ids(&forest[0].replies), vec![5]);
        assert_eq!(ids(&forest[0].replies[0].replies), vec![6]);
    }

    #[test]
    fn test_sibling_order_is_preserved() {
        let forest = build_comment_tree(vec![
            comment(1, 0),
            comment(9, 1),
            comment(3, 1),
            comment(7, 1),
        ]);

        assert_eq!(ids(&forest[0].replies), vec![9, 3, 7]);
    }

    #[test]
    fn test_orphans_are_dropped() {
        let input = vec![
            comment(1, 0),
            comment(2, 1),
            comment(10, 99), // parent missing
            comment(11, 10), // reply to the orphan
        ];
        let forest = build_comment_tree(input);

        assert_eq!(ids(&forest), vec![1]);
        assert_eq!(ids(&forest[0].replies), vec![2]);
        assert_eq!(count_comments(&forest), 2);
    }

    #[test]
    fn test_self_parent_is_unreachable() {
        let forest = build_comment_tree(vec![comment(1, 0), comment(4, 4)]);
        assert_eq!(count_comments(&forest), 1);
    }

    #[test]
    fn test_every_reachable_comment_appears_once() {
        let mut input = Vec::new();
        for id in 1..=200 {
            // ids divisible by 7 are roots; others reply to id / 2
            let parent = if id % 7 == 0 { 0 } else { id / 2 };
            input.push(comment(id, parent));
        }
        let n = input.len();

        let forest = build_comment_tree(input);
        let total = count_comments(&forest);
        assert!(total <= n);

        let mut seen = Vec::new();
        let mut pending: Vec<&Comment> = forest.iter().collect();
        while let Some(node) = pending.pop() {
            seen.push(node.id);
            pending.extend(node.replies.iter());
        }
        seen.sort_unstable();
        let before = seen.len();
        seen.dedup();
        assert_eq!(before, seen.len(), "a comment was placed twice");
    }

    #[test]
    fn test_build_is_deterministic() {
        let input = vec![
            comment(1, 0),
            comment(2, 1),
            comment(3, 1),
            comment(4, 2),
            comment(5, 0),
            comment(6, 5),
        ];

        let first = build_comment_tree(input.clone());
        let second = build_comment_tree(input);
        assert_eq!(first, second);
    }

    #[test]
    fn test_deep_thread_does_not_overflow() {
        const DEPTH: i64 = 50_000;

        let input: Vec<Comment> = (1..=DEPTH).map(|id| comment(id, id - 1)).collect();
        let mut forest = build_comment_tree(input);

        assert_eq!(forest.len(), 1);
        assert_eq!(count_comments(&forest), DEPTH as usize);

        // Dismantle iteratively; a recursive drop of this chain would overflow.
        let mut depth = 0;
        let mut next = forest.pop();
        while let Some(mut node) = next {
            depth += 1;
            next = node.replies.pop();
        }
        assert_eq!(depth, DEPTH);
    }
}
