//! Dashboard aggregates, recomputed from the whole store on every request.
//!
//! Records accept any JSON on write, so this is where field shapes get
//! checked. One event that cannot be read fails the whole computation.

use std::cmp::Ordering;

use chrono::NaiveDate;
use planner_shared::{DashboardStats, Event, Record, UpcomingTask};
use serde_json::{Number, Value};

use crate::error::{ApiError, ApiResult};
use crate::store::PlannerStore;

const RECENT_EVENTS: usize = 5;
const UPCOMING_TASKS: usize = 5;
const DATE_FORMAT: &str = "%Y-%m-%d";

fn event_date(event: &Event) -> ApiResult<NaiveDate> {
    let raw = match event.field("date") {
        Some(Value::String(raw)) => raw,
        Some(other) => {
            return Err(ApiError::malformed(event.id, "date", format!("{other} is not a date")))
        }
        None => return Err(ApiError::malformed(event.id, "date", "missing")),
    };
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|err| ApiError::malformed(event.id, "date", format!("{raw:?}: {err}")))
}

fn created_at(event: &Event) -> ApiResult<&str> {
    event
        .text("created_at")
        .ok_or_else(|| ApiError::malformed(event.id, "created_at", "not a timestamp string"))
}

/// Running budget total that stays an integer until a fractional budget
/// shows up.
#[derive(Debug)]
struct BudgetTotal {
    integer: Option<i64>,
    float: f64,
}

impl BudgetTotal {
    fn new() -> Self {
        Self {
            integer: Some(0),
            float: 0.0,
        }
    }

    fn add(&mut self, event: &Event) -> ApiResult<()> {
        let amount = match event.field("budget") {
            None => return Ok(()),
            Some(Value::Number(amount)) => amount,
            Some(other) => {
                return Err(ApiError::malformed(event.id, "budget", format!("{other} is not a number")))
            }
        };
        self.integer = match (self.integer, amount.as_i64()) {
            (Some(total), Some(amount)) => total.checked_add(amount),
            _ => None,
        };
        self.float += amount.as_f64().unwrap_or(0.0);
        Ok(())
    }

    fn finish(self) -> ApiResult<Number> {
        match self.integer {
            Some(total) => Ok(Number::from(total)),
            None => Number::from_f64(self.float)
                .ok_or_else(|| ApiError::malformed(0, "budget", "total is not finite")),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Open tasks of one event, flattened for the dashboard.
fn open_tasks(event: &Event, into: &mut Vec<UpcomingTask>) -> ApiResult<()> {
    let tasks = match event.field("tasks") {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Array(tasks)) => tasks,
        Some(_) => return Err(ApiError::malformed(event.id, "tasks", "not a list")),
    };
    for task in tasks {
        let task = task
            .as_object()
            .ok_or_else(|| ApiError::malformed(event.id, "tasks", "task is not an object"))?;
        let completed = task
            .get("completed")
            .ok_or_else(|| ApiError::malformed(event.id, "tasks", "task has no completed flag"))?;
        if is_truthy(completed) {
            continue;
        }
        let due_date = task.get("due_date").cloned().unwrap_or(Value::Null);
        if !(due_date.is_null() || due_date.is_string()) {
            return Err(ApiError::malformed(event.id, "tasks", format!("due_date {due_date} is not text")));
        }
        into.push(UpcomingTask {
            event_title: event.field("title").cloned().unwrap_or(Value::Null),
            task_title: task.get("title").cloned().unwrap_or(Value::Null),
            due_date,
        });
    }
    Ok(())
}

/// Plain string order on due dates, not calendar order. Tasks with no due
/// date come first.
fn by_due_date(a: &UpcomingTask, b: &UpcomingTask) -> Ordering {
    a.due_date.as_str().cmp(&b.due_date.as_str())
}

/// Builds the dashboard relative to `today`.
pub fn compute_stats(store: &PlannerStore, today: NaiveDate) -> ApiResult<DashboardStats> {
    let events = store.events();
    let guests = store.guests();

    let mut upcoming_events = 0;
    for event in events {
        if event_date(event)? >= today {
            upcoming_events += 1;
        }
    }

    let confirmed_guests = guests
        .iter()
        .filter(|guest| guest.text("status") == Some("confirmed"))
        .count();

    let mut budget = BudgetTotal::new();
    for event in events {
        budget.add(event)?;
    }
    let total_budget = budget.finish()?;

    let mut recent_events = Vec::with_capacity(events.len());
    for event in events {
        recent_events.push((created_at(event)?, event));
    }
    recent_events.sort_by(|(a, _), (b, _)| b.cmp(a));
    let recent_events = recent_events
        .into_iter()
        .take(RECENT_EVENTS)
        .map(|(_, event)| event.clone())
        .collect();

    let mut upcoming_tasks = Vec::new();
    for event in events {
        open_tasks(event, &mut upcoming_tasks)?;
    }
    upcoming_tasks.sort_by(by_due_date);
    upcoming_tasks.truncate(UPCOMING_TASKS);

    Ok(DashboardStats {
        total_events: events.len(),
        upcoming_events,
        total_guests: guests.len(),
        confirmed_guests,
        total_budget,
        recent_events,
        upcoming_tasks,
    })
}
