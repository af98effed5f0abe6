//! Sample households and blank drafts.

use crate::derive::ensure_derived_fields;
use crate::entities::{Address, Guest, Household};
use crate::enums::{GuestType, InvitedBy, RsvpStatus};
use crate::ids::{PREFIX_GUEST, PREFIX_HOUSEHOLD, generate_id};

/// A new guest with defaults for its type.
#[must_use]
pub fn new_guest(guest_type: GuestType) -> Guest {
    let (name, role) = match guest_type {
        GuestType::PlusOne => ("Plus One (TBD)", ""),
        GuestType::Child => ("New guest", "Child"),
        GuestType::Primary => ("New guest", ""),
    };
    Guest {
        id: generate_id(PREFIX_GUEST),
        name: name.to_string(),
        role: role.to_string(),
        guest_type,
        dietary: "None".to_string(),
        ..Guest::default()
    }
}

/// A draft household with one primary guest.
#[must_use]
pub fn blank_household() -> Household {
    let primary = Guest {
        name: "Primary guest".to_string(),
        ..new_guest(GuestType::Primary)
    };
    ensure_derived_fields(Household {
        id: generate_id(PREFIX_HOUSEHOLD),
        envelope_name: "New household".to_string(),
        custom_slug: Some(String::new()),
        dietary_restrictions: "None".to_string(),
        guests: vec![primary],
        ..Household::default()
    })
}

fn guest(name: &str, role: &str, guest_type: GuestType, rsvp: RsvpStatus, dietary: &str) -> Guest {
    Guest {
        id: generate_id(PREFIX_GUEST),
        name: name.to_string(),
        role: role.to_string(),
        guest_type,
        rsvp_status: rsvp,
        dietary: dietary.to_string(),
        ..Guest::default()
    }
}

/// Sample data shown when the local cache is empty and the remote list has
/// not loaded yet.
#[must_use]
pub fn seed_households() -> Vec<Household> {
    let samples = vec![
        Household {
            id: generate_id(PREFIX_HOUSEHOLD),
            envelope_name: "The Lindqvist Family".into(),
            invited_by: InvitedBy::Groom,
            address: Address {
                line1: "12 Orchard Row".into(),
                city: "Brookline".into(),
                state: "MA".into(),
                postal_code: "02445".into(),
                country: "USA".into(),
            },
            email: "lindqvist@example.com".into(),
            phone: "(617) 555-0142".into(),
            save_the_date_sent: true,
            tisch_invited: true,
            table: "Family".into(),
            dietary_restrictions: "None".into(),
            notes: "Seat near the dance floor.".into(),
            guests: vec![
                guest("Nils Lindqvist", "Uncle", GuestType::Primary, RsvpStatus::BothEvents, "None"),
                guest("Greta Lindqvist", "Aunt", GuestType::Primary, RsvpStatus::BothEvents, "Vegetarian"),
            ],
            ..Household::default()
        },
        Household {
            id: generate_id(PREFIX_HOUSEHOLD),
            envelope_name: "Sam & Priya Okafor".into(),
            invited_by: InvitedBy::Both,
            address: Address {
                line1: "88 Harbor Street Apt 3B".into(),
                city: "Boston".into(),
                state: "MA".into(),
                postal_code: "02110".into(),
                country: "USA".into(),
            },
            email: "okafor@example.com".into(),
            phone: "(617) 555-0199".into(),
            save_the_date_sent: true,
            invitation_sent: true,
            plus_one_allowed: true,
            table: "TBD".into(),
            dietary_restrictions: "None".into(),
            notes: "Follow up after the first of the month.".into(),
            guests: vec![
                guest("Sam Okafor", "College friend", GuestType::Primary, RsvpStatus::AwaitingResponse, "None"),
                guest("Priya Okafor", "Partner", GuestType::Primary, RsvpStatus::AwaitingResponse, "Gluten free"),
                guest("Plus One (TBD)", "Optional guest", GuestType::PlusOne, RsvpStatus::AwaitingResponse, "None"),
            ],
            ..Household::default()
        },
        Household {
            id: generate_id(PREFIX_HOUSEHOLD),
            envelope_name: "Dana Whitfield & Family".into(),
            invited_by: InvitedBy::Bride,
            address: Address {
                line1: "301 Birch Lane".into(),
                city: "Hartford".into(),
                state: "CT".into(),
                postal_code: "06105".into(),
                country: "USA".into(),
            },
            email: "dana.w@example.com".into(),
            phone: "(860) 555-0107".into(),
            table: "Kids table?".into(),
            dietary_restrictions: "Kosher style".into(),
            notes: "Driving in the day of; needs a parking pass.".into(),
            guests: vec![
                guest("Dana Whitfield", "Cousin", GuestType::Primary, RsvpStatus::AwaitingResponse, "Kosher style"),
                guest("Morgan Whitfield", "Spouse", GuestType::Primary, RsvpStatus::AwaitingResponse, "None"),
                guest("Jesse Whitfield", "Child", GuestType::Child, RsvpStatus::AwaitingResponse, "Peanut allergy"),
            ],
            ..Household::default()
        },
    ];
    samples.into_iter().map(ensure_derived_fields).collect()
}
