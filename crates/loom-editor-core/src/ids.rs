//! Node id minting.
//!
//! Ids come from an injected [`IdSource`] so tests can use a deterministic
//! counter while the browser uses random UUIDs.

use std::collections::HashSet;

use smol_str::{SmolStr, ToSmolStr, format_smolstr};

use crate::document::NodeId;

/// A source of fresh node ids.
pub trait IdSource {
    /// Produce the next candidate id.
    fn next_id(&mut self) -> NodeId;

    /// Produce an id not contained in `taken`.
    fn mint_unique(&mut self, taken: &HashSet<NodeId>) -> NodeId {
        loop {
            let id = self.next_id();
            if !taken.contains(&id) {
                return id;
            }
            tracing::trace!(target: "loom::ids", %id, "minted id already taken, drawing again");
        }
    }
}

impl<T: IdSource + ?Sized> IdSource for &mut T {
    fn next_id(&mut self) -> NodeId {
        (**self).next_id()
    }
}

impl<T: IdSource + ?Sized> IdSource for Box<T> {
    fn next_id(&mut self) -> NodeId {
        (**self).next_id()
    }
}

/// Monotonic counter ids: `n0`, `n1`, ...
#[derive(Clone, Debug)]
pub struct SequentialIds {
    prefix: SmolStr,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<SmolStr>) -> Self {
        Self::starting_at(prefix, 0)
    }

    pub fn starting_at(prefix: impl Into<SmolStr>, next: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("n")
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> NodeId {
        let id = format_smolstr!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Random v4 UUID ids.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&mut self) -> NodeId {
        uuid::Uuid::new_v4().to_smolstr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::default();
        assert_eq!(ids.next_id(), "n0");
        assert_eq!(ids.next_id(), "n1");

        let mut ids = SequentialIds::starting_at("block-", 41);
        assert_eq!(ids.next_id(), "block-41");
    }

    #[test]
    fn test_mint_unique_skips_taken() {
        let mut ids = SequentialIds::default();
        let taken: HashSet<NodeId> = ["n0", "n1"].into_iter().map(NodeId::from).collect();
        assert_eq!(ids.mint_unique(&taken), "n2");
    }

    #[test]
    fn test_uuid_ids_differ() {
        let mut ids = UuidIds;
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }
}
