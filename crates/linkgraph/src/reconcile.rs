//! Pure updates of the outbound-link sequence.
//!
//! Links are keyed by `(target, namespace)`; after any of these functions
//! runs, at most one link per key remains.

use chrono::{DateTime, Utc};
use linkgraph_core::OutboundLink;
use linkgraph_store::StoreError;

/// Upsert the link for `(target, namespace)`.
///
/// An existing link has its `createdAt` refreshed to `now` and keeps its
/// alias unless a new one is supplied.
pub fn apply_connect(
    links: &mut Vec<OutboundLink>,
    target: &str,
    namespace: &str,
    alias: Option<&str>,
    now: DateTime<Utc>,
) {
    let mut found = false;
    links.retain_mut(|link| {
        if !link.matches(target, namespace) {
            return true;
        }
        if found {
            return false;
        }
        found = true;
        link.created_at = now;
        if let Some(alias) = alias {
            link.alias = alias.to_string();
        }
        true
    });
    if !found {
        links.push(OutboundLink::follow(
            target,
            namespace,
            alias.unwrap_or_default(),
            now,
        ));
    }
}

/// Remove every link for `(target, namespace)`. Returns how many were removed.
pub fn apply_disconnect(links: &mut Vec<OutboundLink>, target: &str, namespace: &str) -> usize {
    let before = links.len();
    links.retain(|link| !link.matches(target, namespace));
    before - links.len()
}

/// Set the alias of the link for `(target, namespace)`.
pub fn apply_set_alias(
    links: &mut [OutboundLink],
    target: &str,
    namespace: &str,
    alias: &str,
) -> Result<(), StoreError> {
    let mut found = false;
    for link in links.iter_mut().filter(|l| l.matches(target, namespace)) {
        link.alias = alias.to_string();
        found = true;
    }
    if found {
        Ok(())
    } else {
        Err(StoreError::TargetNotFound {
            target: target.to_string(),
            namespace: namespace.to_string(),
        })
    }
}
