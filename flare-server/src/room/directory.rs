use flare_core::{PeerId, RoomId};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use tracing::info;

#[derive(Default)]
struct DirectoryInner {
    rooms: HashMap<RoomId, HashSet<PeerId>>,
    /// Reverse index so disconnect cleanup does not scan every room.
    joined: HashMap<PeerId, HashSet<RoomId>>,
}

/// Room membership table. A room exists exactly while it has members;
/// the entry is pruned the moment the last member leaves.
///
/// Both maps sit behind one lock so every operation sees a consistent
/// snapshot (one writer at a time across the table).
pub struct RoomDirectory {
    inner: Mutex<DirectoryInner>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(DirectoryInner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DirectoryInner> {
        self.inner.lock().expect("room directory lock poisoned")
    }

    /// Add `peer` to `room`, creating the room if absent. Idempotent:
    /// a repeated join leaves membership untouched and reports `false`.
    /// Also returns the other members, snapshotted under the same lock
    /// as the insertion, for the presence fan-out.
    pub fn join(&self, room: &RoomId, peer: PeerId) -> (bool, Vec<PeerId>) {
        let mut inner = self.lock();

        let members = inner.rooms.entry(room.clone()).or_default();
        let others: Vec<PeerId> = members.iter().filter(|id| **id != peer).copied().collect();
        let newly_added = members.insert(peer);

        if newly_added {
            inner.joined.entry(peer).or_default().insert(room.clone());
            info!("Peer {peer} joined room '{room}'");
        }

        (newly_added, others)
    }

    /// Remove `peer` from `room`. Returns the remaining members if the
    /// peer actually was one, `None` otherwise.
    pub fn leave(&self, room: &RoomId, peer: &PeerId) -> Option<Vec<PeerId>> {
        let mut inner = self.lock();
        Self::remove_membership(&mut inner, room, peer)
    }

    /// Current members of `room` other than `peer`.
    pub fn members_excluding(&self, room: &RoomId, peer: &PeerId) -> Vec<PeerId> {
        let inner = self.lock();
        inner
            .rooms
            .get(room)
            .map(|members| members.iter().filter(|id| *id != peer).copied().collect())
            .unwrap_or_default()
    }

    /// Remove `peer` from every room it is in. Returns, per departed room,
    /// the members left behind so the caller can notify each of them.
    pub fn remove_everywhere(&self, peer: &PeerId) -> Vec<(RoomId, Vec<PeerId>)> {
        let mut inner = self.lock();

        let rooms: Vec<RoomId> = inner
            .joined
            .get(peer)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();

        rooms
            .into_iter()
            .filter_map(|room| {
                Self::remove_membership(&mut inner, &room, peer).map(|remaining| (room, remaining))
            })
            .collect()
    }

    pub fn contains_room(&self, room: &RoomId) -> bool {
        self.lock().rooms.contains_key(room)
    }

    fn remove_membership(
        inner: &mut DirectoryInner,
        room: &RoomId,
        peer: &PeerId,
    ) -> Option<Vec<PeerId>> {
        let members = inner.rooms.get_mut(room)?;
        if !members.remove(peer) {
            return None;
        }

        let remaining: Vec<PeerId> = members.iter().copied().collect();
        if remaining.is_empty() {
            inner.rooms.remove(room);
            info!("Room '{room}' is empty, pruning");
        }

        if let Some(joined) = inner.joined.get_mut(peer) {
            joined.remove(room);
            if joined.is_empty() {
                inner.joined.remove(peer);
            }
        }

        Some(remaining)
    }
}

impl Default for RoomDirectory {
    fn default() -> Self {
        Self::new()
    }
}
