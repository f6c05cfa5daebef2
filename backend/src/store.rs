//! In-memory store for events, vendors and guests.
//!
//! Each collection keeps insertion order and owns an id sequence that only
//! moves forward, so ids freed by a delete are never handed out again.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use planner_shared::{Event, Guest, Record, Task, Vendor};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::error::{ApiError, ApiResult};
use crate::patch::merge;

/// Store handle shared by all handlers.
pub type SharedStore = Arc<RwLock<PlannerStore>>;

#[derive(Debug, Default, Clone, Copy)]
struct IdSequence {
    last: u64,
}

impl IdSequence {
    fn next(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    /// Records an id assigned elsewhere so `next` never returns it.
    fn observe(&mut self, id: u64) {
        self.last = self.last.max(id);
    }
}

/// Whether a stored `event_id` names `event_id`, counting `1.0` as `1`.
fn refers_to(value: Option<&Value>, event_id: i64) -> bool {
    match value {
        Some(Value::Number(n)) => {
            n.as_i64() == Some(event_id) || (!n.is_i64() && n.as_f64() == Some(event_id as f64))
        }
        _ => false,
    }
}

#[derive(Debug, Default)]
pub struct PlannerStore {
    events: Vec<Event>,
    vendors: Vec<Vendor>,
    guests: Vec<Guest>,
    event_ids: IdSequence,
    vendor_ids: IdSequence,
    guest_ids: IdSequence,
}

impl PlannerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn vendors(&self) -> &[Vendor] {
        &self.vendors
    }

    pub fn guests(&self) -> &[Guest] {
        &self.guests
    }

    pub fn event(&self, id: u64) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    fn event_mut(&mut self, id: u64) -> ApiResult<&mut Event> {
        self.events
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or(ApiError::NotFound("Event"))
    }

    /// Appends a fully formed event, keeping its id.
    pub fn insert_event(&mut self, event: Event) {
        self.event_ids.observe(event.id);
        self.events.push(event);
    }

    pub fn insert_vendor(&mut self, vendor: Vendor) {
        self.vendor_ids.observe(vendor.id);
        self.vendors.push(vendor);
    }

    pub fn insert_guest(&mut self, guest: Guest) {
        self.guest_ids.observe(guest.id);
        self.guests.push(guest);
    }

    pub fn create_event(&mut self, body: &Map<String, Value>, now: DateTime<Utc>) -> Event {
        let event = Event::new(self.event_ids.next(), body, now);
        self.events.push(event.clone());
        event
    }

    pub fn update_event(&mut self, id: u64, patch: Map<String, Value>) -> ApiResult<Event> {
        let event = self.event_mut(id)?;
        merge(event.fields_mut(), patch);
        Ok(event.clone())
    }

    /// Removes every event with `id` and returns how many went.
    pub fn delete_event(&mut self, id: u64) -> usize {
        let before = self.events.len();
        self.events.retain(|event| event.id != id);
        before - self.events.len()
    }

    /// Vendors whose category is exactly the string `category`, or all.
    pub fn list_vendors(&self, category: Option<&str>) -> Vec<Vendor> {
        match category {
            Some(category) => self
                .vendors
                .iter()
                .filter(|vendor| vendor.text("category") == Some(category))
                .cloned()
                .collect(),
            None => self.vendors.clone(),
        }
    }

    pub fn create_vendor(&mut self, body: &Map<String, Value>) -> Vendor {
        let vendor = Vendor::new(self.vendor_ids.next(), body);
        self.vendors.push(vendor.clone());
        vendor
    }

    pub fn list_guests(&self, event_id: Option<i64>) -> Vec<Guest> {
        match event_id {
            Some(event_id) => self
                .guests
                .iter()
                .filter(|guest| refers_to(guest.field("event_id"), event_id))
                .cloned()
                .collect(),
            None => self.guests.clone(),
        }
    }

    pub fn create_guest(&mut self, body: &Map<String, Value>) -> Guest {
        let guest = Guest::new(self.guest_ids.next(), body);
        self.guests.push(guest.clone());
        guest
    }

    pub fn update_guest(&mut self, id: u64, patch: Map<String, Value>) -> ApiResult<Guest> {
        let guest = self
            .guests
            .iter_mut()
            .find(|guest| guest.id == id)
            .ok_or(ApiError::NotFound("Guest"))?;
        merge(guest.fields_mut(), patch);
        Ok(guest.clone())
    }

    /// Appends a task to the event's `tasks` array, creating the array when
    /// the field is absent or null.
    pub fn add_task(&mut self, event_id: u64, body: &Map<String, Value>) -> ApiResult<Task> {
        let event = self.event_mut(event_id)?;
        let task = Task::new(event.next_task_id(), body);

        let tasks = event
            .fields
            .entry("tasks")
            .or_insert_with(|| Value::Array(Vec::new()));
        if tasks.is_null() {
            *tasks = Value::Array(Vec::new());
        }
        let Value::Array(tasks) = tasks else {
            return Err(ApiError::malformed(event_id, "tasks", "not a list"));
        };
        tasks.push(task.to_stored());
        Ok(task)
    }

    pub fn update_task(
        &mut self,
        event_id: u64,
        task_id: u64,
        patch: Map<String, Value>,
    ) -> ApiResult<Task> {
        let event = self.event_mut(event_id)?;
        let stored = event
            .fields
            .get_mut("tasks")
            .and_then(Value::as_array_mut)
            .and_then(|tasks| {
                tasks
                    .iter_mut()
                    .find(|task| task.get("id").and_then(Value::as_u64) == Some(task_id))
            })
            .ok_or(ApiError::NotFound("Task"))?;
        if let Value::Object(fields) = &mut *stored {
            merge(fields, patch);
        }
        Task::from_stored(stored).ok_or(ApiError::NotFound("Task"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    fn titled(title: &str) -> Map<String, Value> {
        object(json!({ "title": title }))
    }

    #[test]
    fn event_ids_are_not_reused_after_delete() {
        let mut store = PlannerStore::new();
        let first = store.create_event(&titled("a"), Utc::now());
        let second = store.create_event(&titled("b"), Utc::now());
        assert_eq!((first.id, second.id), (1, 2));

        assert_eq!(store.delete_event(first.id), 1);
        let third = store.create_event(&titled("c"), Utc::now());
        assert_eq!(third.id, 3);
        assert_eq!(store.events().len(), 2);
    }

    #[test]
    fn deleting_a_missing_event_removes_nothing() {
        let mut store = PlannerStore::new();
        store.create_event(&titled("a"), Utc::now());
        assert_eq!(store.delete_event(42), 0);
        assert_eq!(store.events().len(), 1);
    }

    #[test]
    fn inserted_records_advance_the_sequence() {
        let mut store = PlannerStore::new();
        store.insert_vendor(Vendor::new(5, &object(json!({"category": "venue"}))));

        let created = store.create_vendor(&Map::new());
        assert_eq!(created.id, 6);
        assert_eq!(created.field("rating"), Some(&json!(0)));
    }

    #[test]
    fn vendor_category_filter_is_exact() {
        let mut store = PlannerStore::new();
        for category in [json!("catering"), json!("Catering"), json!("catering-plus"), json!(3)] {
            store.create_vendor(&object(json!({ "category": category })));
        }
        let matches = store.list_vendors(Some("catering"));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, 1);
        assert!(store.list_vendors(Some("florist")).is_empty());
        assert_eq!(store.list_vendors(None).len(), 4);
    }

    #[test]
    fn guests_filter_by_event_in_creation_order() {
        let mut store = PlannerStore::new();
        for (name, event_id) in [("a", json!(1)), ("b", json!(2)), ("c", json!(1.0)), ("d", json!("1"))] {
            store.create_guest(&object(json!({ "name": name, "event_id": event_id })));
        }
        let names: Vec<String> = store
            .list_guests(Some(1))
            .iter()
            .filter_map(|guest| guest.text("name").map(str::to_string))
            .collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn update_guest_reports_missing_guest() {
        let mut store = PlannerStore::new();
        let err = store.update_guest(9, Map::new()).unwrap_err();
        assert!(matches!(err, ApiError::NotFound("Guest")));
    }

    #[test]
    fn update_guest_accepts_null_status() {
        let mut store = PlannerStore::new();
        let guest = store.create_guest(&titled("a"));
        let updated = store
            .update_guest(guest.id, object(json!({"status": null})))
            .unwrap();
        assert_eq!(updated.field("status"), Some(&Value::Null));
    }

    #[test]
    fn tasks_are_numbered_per_event() {
        let mut store = PlannerStore::new();
        let a = store.create_event(&titled("a"), Utc::now());
        let b = store.create_event(&titled("b"), Utc::now());

        let first = store.add_task(a.id, &Map::new()).unwrap();
        let second = store.add_task(a.id, &Map::new()).unwrap();
        let other = store.add_task(b.id, &Map::new()).unwrap();

        assert_eq!((first.id, second.id, other.id), (1, 2, 1));
        assert_eq!(first.field("completed"), Some(&json!(false)));
        assert_eq!(store.event(a.id).unwrap().field("tasks").unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn add_task_recreates_a_cleared_task_list() {
        let mut store = PlannerStore::new();
        let event = store.create_event(&titled("a"), Utc::now());
        store.update_event(event.id, object(json!({"tasks": null}))).unwrap();

        let task = store.add_task(event.id, &Map::new()).unwrap();
        assert_eq!(task.id, 1);
    }

    #[test]
    fn add_task_fails_when_tasks_is_not_a_list() {
        let mut store = PlannerStore::new();
        let event = store.create_event(&titled("a"), Utc::now());
        store.update_event(event.id, object(json!({"tasks": "none yet"}))).unwrap();

        let err = store.add_task(event.id, &Map::new()).unwrap_err();
        assert!(matches!(err, ApiError::MalformedRecord { field: "tasks", .. }));
    }

    #[test]
    fn update_task_distinguishes_missing_event_and_task() {
        let mut store = PlannerStore::new();
        let event = store.create_event(&titled("a"), Utc::now());

        let err = store.update_task(99, 1, Map::new()).unwrap_err();
        assert!(matches!(err, ApiError::NotFound("Event")));
        let err = store.update_task(event.id, 1, Map::new()).unwrap_err();
        assert!(matches!(err, ApiError::NotFound("Task")));
    }

    #[test]
    fn update_task_marks_completed() {
        let mut store = PlannerStore::new();
        let event = store.create_event(&titled("a"), Utc::now());
        let task = store.add_task(event.id, &Map::new()).unwrap();

        let updated = store
            .update_task(event.id, task.id, object(json!({"id": 7, "completed": true})))
            .unwrap();
        assert_eq!(updated.id, task.id);
        assert_eq!(updated.field("completed"), Some(&json!(true)));
        assert_eq!(
            store.event(event.id).unwrap().field("tasks"),
            Some(&json!([{"id": 1, "title": null, "due_date": null, "completed": true}]))
        );
    }

    #[test]
    fn update_event_keeps_id_and_accepts_any_type() {
        let mut store = PlannerStore::new();
        let event = store.create_event(&titled("a"), Utc::now());

        let updated = store
            .update_event(event.id, object(json!({"id": 50, "date": 20240315})))
            .unwrap();
        assert_eq!(updated.id, event.id);
        assert_eq!(updated.field("date"), Some(&json!(20240315)));
        assert_eq!(updated.field("created_at"), event.field("created_at"));
    }
}
