//! Demonstration records loaded at startup.

use chrono::{DateTime, Utc};
use planner_shared::{timestamp, Event, Guest, Vendor};
use serde_json::{json, Map, Value};

use crate::store::PlannerStore;

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Fills `store` with three vendors, two events and two guests.
pub fn load_sample_data(store: &mut PlannerStore, now: DateTime<Utc>) {
    let vendors = [
        json!({
            "name": "Elite Catering Services",
            "category": "catering",
            "contact": "contact@elitecatering.com",
            "phone": "+1-555-0123",
            "rating": 4.8,
            "price_range": "$$$",
            "description": "Premium catering services for corporate and private events",
        }),
        json!({
            "name": "Harmony Music Group",
            "category": "entertainment",
            "contact": "bookings@harmonymusic.com",
            "phone": "+1-555-0456",
            "rating": 4.6,
            "price_range": "$$",
            "description": "Professional musicians and DJs for all types of events",
        }),
        json!({
            "name": "Perfect Venues",
            "category": "venue",
            "contact": "info@perfectvenues.com",
            "phone": "+1-555-0789",
            "rating": 4.9,
            "price_range": "$$$$",
            "description": "Luxury event venues in prime locations",
        }),
    ];
    for (id, vendor) in (1..).zip(vendors) {
        store.insert_vendor(Vendor {
            id,
            fields: fields(vendor),
        });
    }

    let created_at = timestamp(now);
    store.insert_event(Event {
        id: 1,
        fields: fields(json!({
            "title": "Annual Company Gala",
            "description": "Celebrating 10 years of excellence with employees and partners",
            "date": "2024-03-15",
            "time": "18:00",
            "venue": "Grand Ballroom, Downtown Hotel",
            "budget": 50000,
            "guest_count": 200,
            "status": "planning",
            "organizer": "Sarah Johnson",
            "created_at": created_at,
            "vendors": [1, 2, 3],
            "tasks": [
                {"id": 1, "title": "Book venue", "completed": true, "due_date": "2024-01-15"},
                {"id": 2, "title": "Send invitations", "completed": false, "due_date": "2024-02-01"},
                {"id": 3, "title": "Finalize menu", "completed": false, "due_date": "2024-02-15"},
            ],
        })),
    });
    store.insert_event(Event {
        id: 2,
        fields: fields(json!({
            "title": "Product Launch Event",
            "description": "Introducing our latest innovation to key stakeholders",
            "date": "2024-02-28",
            "time": "14:00",
            "venue": "Tech Conference Center",
            "budget": 25000,
            "guest_count": 150,
            "status": "confirmed",
            "organizer": "Mike Chen",
            "created_at": created_at,
            "vendors": [1, 2],
            "tasks": [
                {"id": 4, "title": "Prepare presentation", "completed": true, "due_date": "2024-02-20"},
                {"id": 5, "title": "Setup AV equipment", "completed": false, "due_date": "2024-02-27"},
            ],
        })),
    });

    let guests = [
        json!({
            "name": "John Smith",
            "email": "john.smith@company.com",
            "phone": "+1-555-1234",
            "event_id": 1,
            "status": "confirmed",
            "dietary_restrictions": "Vegetarian",
        }),
        json!({
            "name": "Emily Davis",
            "email": "emily.davis@partner.com",
            "phone": "+1-555-5678",
            "event_id": 1,
            "status": "pending",
            "dietary_restrictions": "None",
        }),
    ];
    for (id, guest) in (1..).zip(guests) {
        store.insert_guest(Guest {
            id,
            fields: fields(guest),
        });
    }

    tracing::info!(
        events = store.events().len(),
        vendors = store.vendors().len(),
        guests = store.guests().len(),
        "loaded sample data"
    );
}
