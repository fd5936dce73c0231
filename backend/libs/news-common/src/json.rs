//! JSON encoding for values that may nest arbitrarily deep
//!
//! Comment forests carry one level of nesting per reply, and thread depth is
//! unbounded. These helpers lift serde_json's recursion limit and grow the
//! stack on demand, so a deep thread costs heap instead of aborting the
//! worker thread.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Decode `bytes` as JSON with no nesting limit.
pub fn from_slice<T>(bytes: &[u8]) -> serde_json::Result<T>
where
    T: DeserializeOwned,
{
    let mut de = serde_json::Deserializer::from_slice(bytes);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// Encode `value` as JSON with no nesting limit.
pub fn to_vec<T>(value: &T) -> serde_json::Result<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    let mut ser = serde_json::Serializer::new(Vec::with_capacity(256));
    value.serialize(serde_stacker::Serializer::new(&mut ser))?;
    Ok(ser.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{dismantle_forest, Comment};
    use std::thread;

    /// Actix workers run on 2 MiB stacks.
    const WORKER_STACK: usize = 2 * 1024 * 1024;

    fn chain(depth: i64) -> Vec<Comment> {
        let mut node = Comment {
            id: depth,
            parent_id: depth - 1,
            ..Default::default()
        };
        for id in (1..depth).rev() {
            node = Comment {
                id,
                parent_id: id - 1,
                replies: vec![node],
                ..Default::default()
            };
        }
        vec![node]
    }

    fn depth_of(forest: &[Comment]) -> usize {
        let mut depth = 0;
        let mut level = forest;
        while let Some(node) = level.first() {
            depth += 1;
            level = &node.replies;
        }
        depth
    }

    #[test]
    fn test_deep_thread_survives_worker_stack() {
        let handle = thread::Builder::new()
            .stack_size(WORKER_STACK)
            .spawn(|| {
                let forest = chain(20_000);
                let bytes = to_vec(&forest).unwrap();
                dismantle_forest(forest);

                let decoded: Vec<Comment> = from_slice(&bytes).unwrap();
                let depth = depth_of(&decoded);
                dismantle_forest(decoded);
                depth
            })
            .unwrap();

        assert_eq!(handle.join().unwrap(), 20_000);
    }

    #[test]
    fn test_output_matches_serde_json() {
        let forest = chain(3);
        assert_eq!(to_vec(&forest).unwrap(), serde_json::to_vec(&forest).unwrap());
    }

    #[test]
    fn test_trailing_garbage_is_rejected() {
        let result = from_slice::<Vec<Comment>>(b"[] trailing");
        assert!(result.is_err());
    }
}
