//! The world collection store.
//!
//! Owns the ordered list of tracked worlds, mirrors it to a single durable
//! storage slot, and notifies observers after every mutation. Every mutation
//! rewrites the whole collection.

use std::fmt;

use tracing::{debug, info, warn};
use worldlog_core::error::DomainError;
use worldlog_core::id::IdGenerator;
use worldlog_core::storage::KeyValueStorage;

use crate::domain::world::{NewWorld, Progress, World, WorldId};

/// Storage key the collection is persisted under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "worlds";

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Slot holding the serialized collection.
    pub storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
        }
    }
}

/// Callback invoked with the full collection.
pub type Observer = Box<dyn FnMut(&[World]) + Send>;

/// Handle returned by [`WorldStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Authoritative, observable collection of worlds.
///
/// Mutators take `&mut self`, so each read-modify-persist-notify step runs to
/// completion before the next one starts.
pub struct WorldStore {
    worlds: Vec<World>,
    storage: Option<Box<dyn KeyValueStorage>>,
    ids: Box<dyn IdGenerator>,
    config: StoreConfig,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl fmt::Debug for WorldStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldStore")
            .field("worlds", &self.worlds)
            .field("persistent", &self.storage.is_some())
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl WorldStore {
    /// Opens the store, loading any collection persisted under
    /// `config.storage_key`.
    ///
    /// With no `storage`, or an empty slot, the store starts empty and later
    /// writes are skipped.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MalformedPayload` if the persisted payload is not
    /// a valid world collection, or the storage's own error if the slot
    /// cannot be read.
    pub fn open(
        config: StoreConfig,
        storage: Option<Box<dyn KeyValueStorage>>,
        ids: Box<dyn IdGenerator>,
    ) -> Result<Self, DomainError> {
        let worlds = match &storage {
            Some(storage) => load(storage.as_ref(), &config.storage_key)?,
            None => {
                debug!("no durable storage; starting with an empty collection");
                Vec::new()
            }
        };

        Ok(Self {
            worlds,
            storage,
            ids,
            config,
            observers: Vec::new(),
            next_subscription: 0,
        })
    }

    /// The current collection, in insertion order.
    #[must_use]
    pub fn worlds(&self) -> &[World] {
        &self.worlds
    }

    /// Looks up a world by id.
    #[must_use]
    pub fn get(&self, id: &WorldId) -> Option<&World> {
        self.worlds.iter().find(|world| &world.id == id)
    }

    /// Number of worlds in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    /// Whether the collection holds no worlds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }

    /// Whether writes reach durable storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }

    /// Adds a world under a freshly generated id and returns that id.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the collection cannot be persisted; the
    /// store is left unchanged.
    pub fn add(&mut self, world: NewWorld) -> Result<WorldId, DomainError> {
        let id = self.fresh_id();
        let mut next = self.worlds.clone();
        next.push(world.with_id(id.clone()));

        self.commit(next)?;
        debug!(world_id = %id, "world added");
        Ok(id)
    }

    /// Removes every world with `id`. Unknown ids are not an error.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the collection cannot be persisted; the
    /// store is left unchanged.
    pub fn delete(&mut self, id: &WorldId) -> Result<(), DomainError> {
        let next: Vec<World> = self
            .worlds
            .iter()
            .filter(|world| &world.id != id)
            .cloned()
            .collect();
        let removed = self.worlds.len() - next.len();

        self.commit(next)?;
        debug!(world_id = %id, removed, "world deleted");
        Ok(())
    }

    /// Replaces the world with `id` by `world`, as given. Unknown ids are not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the collection cannot be persisted; the
    /// store is left unchanged.
    pub fn replace(&mut self, id: &WorldId, world: World) -> Result<(), DomainError> {
        let next: Vec<World> = self
            .worlds
            .iter()
            .map(|existing| {
                if &existing.id == id {
                    world.clone()
                } else {
                    existing.clone()
                }
            })
            .collect();

        self.commit(next)?;
        debug!(world_id = %id, "world replaced");
        Ok(())
    }

    /// Records whether `boss_key` is defeated in the world with `world_id`.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the collection cannot be persisted; the
    /// store is left unchanged.
    pub fn set_boss_defeated(
        &mut self,
        world_id: &WorldId,
        boss_key: &str,
        defeated: bool,
    ) -> Result<(), DomainError> {
        self.update_progress(world_id, |progress| {
            progress
                .defeated_bosses
                .insert(boss_key.to_owned(), defeated);
        })?;
        debug!(world_id = %world_id, boss = boss_key, defeated, "boss progress updated");
        Ok(())
    }

    /// Records whether `npc_key` is available in the world with `world_id`.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the collection cannot be persisted; the
    /// store is left unchanged.
    pub fn set_npc_available(
        &mut self,
        world_id: &WorldId,
        npc_key: &str,
        available: bool,
    ) -> Result<(), DomainError> {
        self.update_progress(world_id, |progress| {
            progress.npcs.insert(npc_key.to_owned(), available);
        })?;
        debug!(world_id = %world_id, npc = npc_key, available, "npc progress updated");
        Ok(())
    }

    /// Records how many of `upgrade_key` the world with `world_id` has used.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the collection cannot be persisted; the
    /// store is left unchanged.
    pub fn set_upgrade_count(
        &mut self,
        world_id: &WorldId,
        upgrade_key: &str,
        count: u32,
    ) -> Result<(), DomainError> {
        self.update_progress(world_id, |progress| {
            progress.upgrades.insert(upgrade_key.to_owned(), count);
        })?;
        debug!(world_id = %world_id, upgrade = upgrade_key, count, "upgrade progress updated");
        Ok(())
    }

    /// Registers `observer`, calling it at once with the current collection
    /// and again after every mutation.
    pub fn subscribe(
        &mut self,
        mut observer: impl FnMut(&[World]) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;

        observer(&self.worlds);
        let observer: Observer = Box::new(observer);
        self.observers.push((id, observer));
        id
    }

    /// Removes an observer. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Drops every observer. The collection and storage are untouched.
    pub fn teardown(&mut self) {
        debug!(observers = self.observers.len(), "tearing down world store");
        self.observers.clear();
    }

    fn update_progress(
        &mut self,
        world_id: &WorldId,
        apply: impl Fn(&mut Progress),
    ) -> Result<(), DomainError> {
        let next: Vec<World> = self
            .worlds
            .iter()
            .map(|world| {
                let mut world = world.clone();
                if &world.id == world_id {
                    apply(&mut world.progress);
                }
                world
            })
            .collect();

        self.commit(next)
    }

    /// Generates an id not already used in the collection.
    fn fresh_id(&mut self) -> WorldId {
        loop {
            let id = WorldId::from(self.ids.next_id());
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    /// Persists `next`, then makes it current and notifies observers.
    fn commit(&mut self, next: Vec<World>) -> Result<(), DomainError> {
        self.persist(&next)?;
        self.worlds = next;
        for (_, observer) in &mut self.observers {
            observer(&self.worlds);
        }
        Ok(())
    }

    fn persist(&self, worlds: &[World]) -> Result<(), DomainError> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };

        let payload = serde_json::to_string(worlds)
            .map_err(|e| DomainError::Infrastructure(format!("failed to serialize worlds: {e}")))?;
        storage
            .set_item(&self.config.storage_key, &payload)
            .inspect_err(|e| warn!(error = %e, "failed to persist worlds"))
    }
}

fn load(storage: &dyn KeyValueStorage, key: &str) -> Result<Vec<World>, DomainError> {
    let Some(payload) = storage.get_item(key)? else {
        debug!(key, "storage slot empty; starting with an empty collection");
        return Ok(Vec::new());
    };
    if payload.is_empty() {
        return Ok(Vec::new());
    }

    let worlds: Vec<World> = serde_json::from_str(&payload)
        .map_err(|e| DomainError::MalformedPayload(e.to_string()))?;
    info!(key, count = worlds.len(), "loaded persisted worlds");
    Ok(worlds)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use uuid::Uuid;
    use worldlog_test_support::{
        FailingStorage, FixedClock, MemoryStorage, SequenceIdGenerator, init_tracing,
    };

    use super::*;
    use crate::domain::world::{Difficulty, Evil, WorldSize};

    fn new_world(name: &str, evil: Evil) -> NewWorld {
        NewWorld::new(
            name,
            Difficulty::Classic,
            WorldSize::Medium,
            evil,
            &FixedClock::default_instant(),
        )
    }

    fn open_with(storage: &MemoryStorage) -> WorldStore {
        WorldStore::open(
            StoreConfig::default(),
            Some(Box::new(storage.clone())),
            Box::new(SequenceIdGenerator::starting_at(1)),
        )
        .unwrap()
    }

    fn open_detached() -> WorldStore {
        WorldStore::open(
            StoreConfig::default(),
            None,
            Box::new(SequenceIdGenerator::starting_at(1)),
        )
        .unwrap()
    }

    fn recorded(store: &mut WorldStore) -> Arc<Mutex<Vec<Vec<World>>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |worlds| sink.lock().unwrap().push(worlds.to_vec()));
        seen
    }

    #[test]
    fn test_open_without_storage_starts_empty() {
        let store = open_detached();

        assert!(store.is_empty());
        assert!(!store.is_persistent());
    }

    #[test]
    fn test_open_with_empty_slot_starts_empty() {
        let store = open_with(&MemoryStorage::new());

        assert!(store.is_empty());
        assert!(store.is_persistent());
    }

    #[test]
    fn test_open_with_empty_string_payload_starts_empty() {
        let storage = MemoryStorage::with_item(DEFAULT_STORAGE_KEY, "");

        let store = open_with(&storage);

        assert!(store.is_empty());
    }

    #[test]
    fn test_open_with_malformed_payload_fails() {
        // Arrange
        let storage = MemoryStorage::with_item(DEFAULT_STORAGE_KEY, "{not json");

        // Act
        let result = WorldStore::open(
            StoreConfig::default(),
            Some(Box::new(storage)),
            Box::new(SequenceIdGenerator::default()),
        );

        // Assert
        match result.unwrap_err() {
            DomainError::MalformedPayload(_) => {}
            other => panic!("expected MalformedPayload, got {other:?}"),
        }
    }

    #[test]
    fn test_open_reads_configured_key() {
        // Arrange
        let storage = MemoryStorage::new();
        let mut first = open_with(&storage);
        first.add(new_world("Default Slot", Evil::Crimson)).unwrap();

        // Act
        let other = WorldStore::open(
            StoreConfig {
                storage_key: "other-worlds".to_owned(),
            },
            Some(Box::new(storage)),
            Box::new(SequenceIdGenerator::default()),
        )
        .unwrap();

        // Assert
        assert!(other.is_empty());
    }

    #[test]
    fn test_add_assigns_id_appends_and_persists() {
        // Arrange
        init_tracing();
        let storage = MemoryStorage::new();
        let mut store = open_with(&storage);

        // Act
        let first = store.add(new_world("Alpha", Evil::Corruption)).unwrap();
        let second = store.add(new_world("Beta", Evil::Crimson)).unwrap();

        // Assert
        assert_eq!(first, WorldId::from(Uuid::from_u128(1)));
        assert_eq!(second, WorldId::from(Uuid::from_u128(2)));
        let names: Vec<&str> = store.worlds().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Beta"]);

        let writes = storage.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[1].0, DEFAULT_STORAGE_KEY);
        let persisted: Vec<World> = serde_json::from_str(&writes[1].1).unwrap();
        assert_eq!(persisted, store.worlds());
    }

    #[test]
    fn test_add_skips_ids_already_in_collection() {
        // Arrange
        let storage = MemoryStorage::new();
        let mut seeded = open_with(&storage);
        let taken = seeded.add(new_world("Seeded", Evil::Crimson)).unwrap();

        // Reopen with a generator that will first yield the taken id again.
        let mut store = open_with(&storage);

        // Act
        let id = store.add(new_world("Fresh", Evil::Crimson)).unwrap();

        // Assert
        assert_ne!(id, taken);
        let ids: HashSet<&WorldId> = store.worlds().iter().map(|w| &w.id).collect();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_add_without_storage_updates_memory_and_notifies() {
        // Arrange
        let mut store = open_detached();
        let seen = recorded(&mut store);

        // Act
        store.add(new_world("Offline", Evil::Corruption)).unwrap();

        // Assert
        assert_eq!(store.len(), 1);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].is_empty());
        assert_eq!(seen[1][0].name, "Offline");
    }

    #[test]
    fn test_delete_removes_world() {
        // Arrange
        let storage = MemoryStorage::new();
        let mut store = open_with(&storage);
        let keep = store.add(new_world("Keep", Evil::Crimson)).unwrap();
        let gone = store.add(new_world("Gone", Evil::Crimson)).unwrap();

        // Act
        store.delete(&gone).unwrap();

        // Assert
        assert_eq!(store.len(), 1);
        assert!(store.get(&keep).is_some());
        assert!(store.get(&gone).is_none());
        let persisted: Vec<World> =
            serde_json::from_str(&storage.item(DEFAULT_STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(persisted.len(), 1);
    }

    #[test]
    fn test_delete_then_replace_unknown_id_is_noop() {
        // Arrange
        let mut store = open_with(&MemoryStorage::new());
        let id = store.add(new_world("Short Lived", Evil::Crimson)).unwrap();
        let snapshot = store.get(&id).unwrap().clone();
        store.delete(&id).unwrap();

        // Act
        let result = store.replace(&id, snapshot);

        // Assert
        assert!(result.is_ok());
        assert!(store.is_empty());
    }

    #[test]
    fn test_replace_swaps_record_verbatim() {
        // Arrange
        let mut store = open_with(&MemoryStorage::new());
        let target = store.add(new_world("Before", Evil::Corruption)).unwrap();
        let other = store.add(new_world("Untouched", Evil::Crimson)).unwrap();
        let other_before = store.get(&other).unwrap().clone();

        let mut replacement = store.get(&target).unwrap().clone();
        replacement.name = "After".to_owned();
        replacement.difficulty = Difficulty::Master;
        replacement.progress = Progress::default();
        replacement
            .progress
            .npcs
            .insert("guide".to_owned(), true);

        // Act
        store.replace(&target, replacement.clone()).unwrap();

        // Assert
        assert_eq!(store.get(&target), Some(&replacement));
        assert_eq!(store.get(&other), Some(&other_before));
        assert_eq!(store.worlds()[0].id, target);
    }

    #[test]
    fn test_set_boss_defeated_touches_only_target_key() {
        // Arrange
        let mut store = open_with(&MemoryStorage::new());
        let target = store.add(new_world("Target", Evil::Crimson)).unwrap();
        let other = store.add(new_world("Other", Evil::Crimson)).unwrap();
        store.set_npc_available(&target, "guide", true).unwrap();
        store.set_upgrade_count(&target, "lifeCrystal", 3).unwrap();
        store.set_boss_defeated(&target, "kingSlime", true).unwrap();
        let other_before = store.get(&other).unwrap().clone();
        let target_before = store.get(&target).unwrap().clone();

        // Act
        store
            .set_boss_defeated(&target, "eyeOfCthulhu", true)
            .unwrap();

        // Assert
        let target_after = store.get(&target).unwrap();
        assert_eq!(store.get(&other), Some(&other_before));
        assert_eq!(target_after.progress.npcs, target_before.progress.npcs);
        assert_eq!(target_after.progress.upgrades, target_before.progress.upgrades);
        assert!(target_after.progress.is_defeated("kingSlime"));
        assert!(target_after.progress.is_defeated("eyeOfCthulhu"));
        assert_eq!(target_after.progress.defeated_bosses.len(), 2);
        assert_eq!(target_after.name, target_before.name);
    }

    #[test]
    fn test_set_boss_defeated_can_flip_back() {
        let mut store = open_detached();
        let id = store.add(new_world("Flip", Evil::Corruption)).unwrap();

        store.set_boss_defeated(&id, "skeletron", true).unwrap();
        store.set_boss_defeated(&id, "skeletron", false).unwrap();

        let world = store.get(&id).unwrap();
        assert_eq!(world.progress.defeated_bosses.get("skeletron"), Some(&false));
    }

    #[test]
    fn test_set_boss_defeated_on_unknown_world_is_noop() {
        // Arrange
        let mut store = open_with(&MemoryStorage::new());
        store.add(new_world("Only", Evil::Crimson)).unwrap();
        let before = store.worlds().to_vec();

        // Act
        let result = store.set_boss_defeated(&WorldId::new("missing"), "golem", true);

        // Assert
        assert!(result.is_ok());
        assert_eq!(store.worlds(), before.as_slice());
    }

    #[test]
    fn test_mutations_on_unknown_world_still_persist_and_notify() {
        // Arrange
        let storage = MemoryStorage::new();
        let mut store = open_with(&storage);
        let known = store.add(new_world("Known", Evil::Corruption)).unwrap();
        let replacement = store.get(&known).unwrap().clone();
        let before = store.worlds().to_vec();
        let seen = recorded(&mut store);
        let writes_before = storage.writes().len();
        let missing = WorldId::new("missing");

        // Act
        store.delete(&missing).unwrap();
        store.replace(&missing, replacement).unwrap();
        store.set_boss_defeated(&missing, "golem", true).unwrap();
        store.set_npc_available(&missing, "guide", true).unwrap();
        store.set_upgrade_count(&missing, "lifeFruit", 20).unwrap();

        // Assert
        assert_eq!(store.worlds(), before.as_slice());
        let writes = storage.writes();
        assert_eq!(writes.len(), writes_before + 5);
        for (key, payload) in &writes[writes_before..] {
            assert_eq!(key, DEFAULT_STORAGE_KEY);
            let persisted: Vec<World> = serde_json::from_str(payload).unwrap();
            assert_eq!(persisted, before);
        }
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1 + 5);
        assert!(seen.iter().all(|worlds| worlds == &before));
    }

    #[test]
    fn test_open_with_null_progress_mapping_loads_world() {
        // Arrange
        let payload = r#"[{"id":"w","name":"Nulls","createdAt":"2025-06-01T12:00:00Z","difficulty":"Classic","worldSize":"Small","evil":"Crimson","progress":{"defeatedBosses":null,"npcs":{},"upgrades":{}}}]"#;
        let storage = MemoryStorage::with_item(DEFAULT_STORAGE_KEY, payload);

        // Act
        let store = open_with(&storage);

        // Assert
        assert_eq!(store.len(), 1);
        assert!(store.worlds()[0].progress.defeated_bosses.is_empty());
    }

    #[test]
    fn test_failed_write_leaves_store_and_observers_untouched() {
        // Arrange
        let mut store = WorldStore::open(
            StoreConfig::default(),
            Some(Box::new(FailingStorage)),
            Box::new(SequenceIdGenerator::default()),
        )
        .unwrap();
        let seen = recorded(&mut store);

        // Act
        let result = store.add(new_world("Doomed", Evil::Crimson));

        // Assert
        match result.unwrap_err() {
            DomainError::Infrastructure(msg) => assert_eq!(msg, "quota exceeded"),
            other => panic!("expected Infrastructure, got {other:?}"),
        }
        assert!(store.is_empty());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_subscribe_receives_current_and_subsequent_collections() {
        // Arrange
        let mut store = open_detached();
        let id = store.add(new_world("Existing", Evil::Crimson)).unwrap();

        // Act
        let seen = recorded(&mut store);
        store.set_boss_defeated(&id, "queenBee", true).unwrap();
        store.delete(&id).unwrap();

        // Assert
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].len(), 1);
        assert!(seen[1][0].progress.is_defeated("queenBee"));
        assert!(seen[2].is_empty());
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        // Arrange
        let mut store = open_detached();
        let count = Arc::new(Mutex::new(0_usize));
        let sink = Arc::clone(&count);
        let subscription = store.subscribe(move |_| *sink.lock().unwrap() += 1);

        // Act
        let removed = store.unsubscribe(subscription);
        store.add(new_world("Quiet", Evil::Crimson)).unwrap();

        // Assert
        assert!(removed);
        assert!(!store.unsubscribe(subscription));
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_teardown_drops_all_observers() {
        // Arrange
        let mut store = open_detached();
        let first = recorded(&mut store);
        let second = recorded(&mut store);

        // Act
        store.teardown();
        store.add(new_world("Unobserved", Evil::Corruption)).unwrap();

        // Assert
        assert_eq!(first.lock().unwrap().len(), 1);
        assert_eq!(second.lock().unwrap().len(), 1);
        assert_eq!(store.len(), 1);
    }
}
