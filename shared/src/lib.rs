//! Wire model shared by the planner API and its clients.
//!
//! Records are an integer id plus an open set of top-level JSON fields. The
//! API never checks field types on write; readers that need a particular
//! shape (the dashboard, task numbering) check it themselves.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Number, Value};

pub const DEFAULT_EVENT_STATUS: &str = "planning";
pub const DEFAULT_GUEST_STATUS: &str = "pending";
pub const DEFAULT_DIETARY_RESTRICTIONS: &str = "None";

/// Field access shared by every record type.
pub trait Record {
    fn id(&self) -> u64;

    fn fields(&self) -> &Map<String, Value>;

    fn fields_mut(&mut self) -> &mut Map<String, Value>;

    fn field(&self, key: &str) -> Option<&Value> {
        self.fields().get(key)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }
}

macro_rules! record {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            pub id: u64,
            #[serde(flatten)]
            pub fields: Map<String, Value>,
        }

        impl Record for $name {
            fn id(&self) -> u64 {
                self.id
            }

            fn fields(&self) -> &Map<String, Value> {
                &self.fields
            }

            fn fields_mut(&mut self) -> &mut Map<String, Value> {
                &mut self.fields
            }
        }
    };
}

record! {
    /// A planned event. Its tasks live in the `tasks` field as JSON objects.
    Event
}

record! {
    /// A task inside an event. The id is unique within that event only.
    Task
}

record! {
    Vendor
}

record! {
    Guest
}

/// Copies `keys` out of a create body, `null` for any that are absent.
fn pick(body: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    keys.iter()
        .map(|key| (key.to_string(), body.get(*key).cloned().unwrap_or(Value::Null)))
        .collect()
}

/// Like `pick` for one key, with a fallback when the key is absent.
fn pick_or(body: &Map<String, Value>, key: &str, default: Value) -> Value {
    body.get(key).cloned().unwrap_or(default)
}

/// Timestamps use a fixed width so string order matches time order.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl Event {
    pub fn new(id: u64, body: &Map<String, Value>, created_at: DateTime<Utc>) -> Self {
        let mut fields = pick(
            body,
            &["title", "description", "date", "time", "venue", "organizer"],
        );
        fields.insert("budget".into(), pick_or(body, "budget", json!(0)));
        fields.insert("guest_count".into(), pick_or(body, "guest_count", json!(0)));
        fields.insert("status".into(), json!(DEFAULT_EVENT_STATUS));
        fields.insert("created_at".into(), json!(timestamp(created_at)));
        fields.insert("vendors".into(), json!([]));
        fields.insert("tasks".into(), json!([]));
        Self { id, fields }
    }

    /// Id for the next task added to this event: one past the highest
    /// integer task id present.
    pub fn next_task_id(&self) -> u64 {
        self.field("tasks")
            .and_then(Value::as_array)
            .map(|tasks| {
                tasks
                    .iter()
                    .filter_map(|task| task.get("id").and_then(Value::as_u64))
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
            + 1
    }
}

impl Task {
    pub fn new(id: u64, body: &Map<String, Value>) -> Self {
        let mut fields = pick(body, &["title", "due_date"]);
        fields.insert("completed".into(), json!(false));
        Self { id, fields }
    }

    /// Reads a task stored inside an event. `None` unless it is an object
    /// with an integer id.
    pub fn from_stored(stored: &Value) -> Option<Self> {
        let mut fields = stored.as_object()?.clone();
        let id = fields.remove("id")?.as_u64()?;
        Some(Self { id, fields })
    }

    /// The form a task takes inside its event's `tasks` array.
    pub fn to_stored(&self) -> Value {
        let mut object = self.fields.clone();
        object.insert("id".into(), json!(self.id));
        Value::Object(object)
    }
}

impl Vendor {
    pub fn new(id: u64, body: &Map<String, Value>) -> Self {
        let mut fields = pick(
            body,
            &["name", "category", "contact", "phone", "price_range", "description"],
        );
        fields.insert("rating".into(), pick_or(body, "rating", json!(0)));
        Self { id, fields }
    }
}

impl Guest {
    /// A `status` in the body is ignored; new guests are always pending.
    pub fn new(id: u64, body: &Map<String, Value>) -> Self {
        let mut fields = pick(body, &["name", "email", "phone", "event_id"]);
        fields.insert("status".into(), json!(DEFAULT_GUEST_STATUS));
        fields.insert(
            "dietary_restrictions".into(),
            pick_or(body, "dietary_restrictions", json!(DEFAULT_DIETARY_RESTRICTIONS)),
        );
        Self { id, fields }
    }
}

/// Aggregates served by `GET /api/dashboard/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_events: usize,
    pub upcoming_events: usize,
    pub total_guests: usize,
    pub confirmed_guests: usize,
    /// Integer when every budget is an integer.
    pub total_budget: Number,
    pub recent_events: Vec<Event>,
    pub upcoming_tasks: Vec<UpcomingTask>,
}

/// An open task flattened out of its event for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingTask {
    pub event_title: Value,
    pub task_title: Value,
    pub due_date: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
