//! Quick-add items and the storage they are handed to.

use anyhow::{Result, bail};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use strum_macros::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ItemKind {
    Todo,
    Event,
}

/// When in its day an item happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    AllDay,
    /// A to-do due at a time of day.
    At(NaiveTime),
    /// An event; `end` wraps past midnight like a wall clock.
    Span { start: NaiveTime, end: NaiveTime },
}

impl Schedule {
    pub fn is_all_day(&self) -> bool {
        matches!(self, Schedule::AllDay)
    }
}

/// An item ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub content: String,
    pub date: NaiveDateTime,
    pub kind: ItemKind,
    pub schedule: Schedule,
    pub completed: bool,
}

/// A stored item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub user_id: String,
    pub created_at: NaiveDateTime,
    pub data: NewItem,
}

/// Where quick-add items end up. Keyed by user and date.
pub trait ItemStore {
    fn create(&mut self, user_id: &str, item: NewItem) -> Result<Item>;
    fn update(&mut self, id: &str, item: NewItem) -> Result<Item>;
    fn delete(&mut self, id: &str) -> Result<()>;
    /// Items of `user_id` dated from `start` to `end` inclusive, earliest first.
    fn query_range(&self, user_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Item>>;
}

/// In-process [`ItemStore`]. Newest items are kept first.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Vec<Item>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }
}

impl ItemStore for MemoryStore {
    fn create(&mut self, user_id: &str, item: NewItem) -> Result<Item> {
        self.next_id += 1;
        let stored = Item {
            id: format!("item-{}", self.next_id),
            user_id: user_id.to_string(),
            created_at: Local::now().naive_local(),
            data: item,
        };
        self.items.insert(0, stored.clone());
        Ok(stored)
    }

    fn update(&mut self, id: &str, item: NewItem) -> Result<Item> {
        let Some(i) = self.position(id) else {
            bail!("no item with id {id}");
        };
        self.items[i].data = item;
        Ok(self.items[i].clone())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let Some(i) = self.position(id) else {
            bail!("no item with id {id}");
        };
        self.items.remove(i);
        Ok(())
    }

    fn query_range(&self, user_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Item>> {
        let mut found: Vec<Item> = self
            .items
            .iter()
            .filter(|item| item.user_id == user_id)
            .filter(|item| (start..=end).contains(&item.data.date.date()))
            .cloned()
            .collect();
        found.sort_by_key(|item| item.data.date);
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::common::{at, day};

    fn todo(content: &str, date: NaiveDateTime) -> NewItem {
        NewItem {
            content: content.to_string(),
            date,
            kind: ItemKind::Todo,
            schedule: Schedule::AllDay,
            completed: false,
        }
    }

    #[test]
    fn kind_parses_from_lowercase_name() {
        assert_eq!("event".parse::<ItemKind>().unwrap(), ItemKind::Event);
        assert_eq!(ItemKind::Todo.as_ref(), "todo");
        assert!("memo".parse::<ItemKind>().is_err());
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let mut store = MemoryStore::new();
        let a = store.create("u1", todo("a", at(2025, 12, 22, 0, 0))).unwrap();
        let b = store.create("u1", todo("b", at(2025, 12, 22, 0, 0))).unwrap();
        assert_eq!(a.id, "item-1");
        assert_eq!(b.id, "item-2");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn query_range_is_inclusive_sorted_and_per_user() {
        let mut store = MemoryStore::new();
        store.create("u1", todo("late", at(2025, 12, 24, 18, 0))).unwrap();
        store.create("u1", todo("early", at(2025, 12, 22, 9, 0))).unwrap();
        store.create("u1", todo("outside", at(2025, 12, 25, 0, 0))).unwrap();
        store.create("u2", todo("other user", at(2025, 12, 23, 0, 0))).unwrap();

        let found = store
            .query_range("u1", day(2025, 12, 22), day(2025, 12, 24))
            .unwrap();
        let contents: Vec<&str> = found.iter().map(|i| i.data.content.as_str()).collect();
        assert_eq!(contents, vec!["early", "late"]);
    }

    #[test]
    fn update_replaces_data_and_keeps_identity() {
        let mut store = MemoryStore::new();
        let created = store.create("u1", todo("draft", at(2025, 12, 22, 0, 0))).unwrap();
        let mut changed = created.data.clone();
        changed.completed = true;
        let updated = store.update(&created.id, changed).unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.data.completed);
    }

    #[test]
    fn unknown_ids_are_errors() {
        let mut store = MemoryStore::new();
        assert!(store.update("item-9", todo("x", at(2025, 1, 1, 0, 0))).is_err());
        assert!(store.delete("item-9").is_err());
    }

    #[test]
    fn delete_removes() {
        let mut store = MemoryStore::new();
        let created = store.create("u1", todo("x", at(2025, 12, 22, 0, 0))).unwrap();
        store.delete(&created.id).unwrap();
        assert!(store.is_empty());
    }
}
